//! Environment configuration.
//!
//! All configuration comes from the environment (a `.env` file is honored
//! for local development). There is deliberately no CLI surface: the service
//! is meant to run unattended.

use std::time::Duration;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Datawrapper API bearer token.
    pub api_key: String,
    /// Identifier of the chart this service owns.
    pub chart_id: String,
    /// Bind host for the embed server.
    pub host: String,
    /// Bind port for the embed server.
    pub port: u16,
    /// Per-request timeout applied to every outbound HTTP call.
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("DATAWRAPPER_KEY")
            .map_err(|_| AppError::new(2, "Missing DATAWRAPPER_KEY in environment (.env)."))?;
        let chart_id = std::env::var("DATAWRAPPER_CHART_ID")
            .map_err(|_| AppError::new(2, "Missing DATAWRAPPER_CHART_ID in environment (.env)."))?;

        let host = std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::new(2, format!("Invalid PORT value '{raw}'.")))?,
            Err(_) => DEFAULT_PORT,
        };

        let timeout_secs = match std::env::var("HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| AppError::new(2, format!("Invalid HTTP_TIMEOUT_SECS value '{raw}'.")))?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            chart_id,
            host,
            port,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
