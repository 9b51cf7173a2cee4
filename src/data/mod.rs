//! Remote report retrieval.
//!
//! - `jhu`: fetches the Johns Hopkins CSSE daily US report by date, plus the
//!   `ReportSource` seam the orchestrator (and its tests) work against.

pub mod jhu;

pub use jhu::*;
