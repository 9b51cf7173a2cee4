//! Error types.
//!
//! Three distinct failure classes, because the orchestrator treats them
//! differently:
//!
//! - [`AppError`]: startup problems (missing env, bind failure); fatal,
//!   carries the process exit code.
//! - [`FetchError`]: a report fetch failed; recovered by falling back to an
//!   older report date.
//! - [`StageError`]: a chart publish stage returned something unexpected;
//!   halts the stage chain for this run, never retried.

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// A daily report fetch failed (non-2xx status or transport error).
///
/// Both cases surface uniformly: the caller's only recovery is to try an
/// older report date, and that decision does not depend on which kind of
/// failure occurred.
#[derive(Debug, Clone)]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FetchError {}

/// A chart publish stage failed (unexpected status or body).
#[derive(Debug, Clone)]
pub struct StageError {
    stage: &'static str,
    message: String,
}

impl StageError {
    pub fn new(stage: &'static str, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }

    pub fn stage(&self) -> &'static str {
        self.stage
    }
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} stage failed: {}", self.stage, self.message)
    }
}

impl std::error::Error for StageError {}
