//! Top-level application wiring.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - loads environment configuration
//! - builds the shared HTTP client and chart state
//! - spawns the sync task (one run at startup, then on the fixed schedule)
//! - serves the embed page until shutdown

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::chart::ChartClient;
use crate::config::Config;
use crate::data::ReportClient;
use crate::domain::ChartState;
use crate::error::AppError;
use crate::web::SharedChartState;

pub mod pipeline;

/// Entry point for the `covid-map` binary.
pub async fn run() -> Result<(), AppError> {
    init_tracing();

    let config = Config::from_env()?;
    info!(chart_id = %config.chart_id, "starting covid map sync");

    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|e| AppError::new(3, format!("Failed to build HTTP client: {e}")))?;

    let reports = ReportClient::new(http.clone());
    let chart = ChartClient::new(http, config.api_key.clone(), config.chart_id.clone());
    let state: SharedChartState = Arc::new(RwLock::new(ChartState::new(config.chart_id.clone())));

    // One task owns both the startup run and the schedule loop, so sync runs
    // are serialized by construction: a fire time that arrives while a run is
    // still in flight waits for it.
    {
        let state = state.clone();
        tokio::spawn(async move {
            pipeline::run_routine(&reports, &chart, &state).await;
            loop {
                let wait = crate::schedule::until_next_run(chrono::Local::now());
                info!(secs = wait.as_secs(), "next sync run scheduled");
                tokio::time::sleep(wait).await;
                pipeline::run_routine(&reports, &chart, &state).await;
            }
        });
    }

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::new(3, format!("Failed to bind {addr}: {e}")))?;
    info!("embed server listening on http://{addr}");

    axum::serve(listener, crate::web::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::new(3, format!("Embed server error: {e}")))?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn shutdown_signal() {
    // Serve until interrupted; if signal handling fails we have no way to be
    // told to stop, so keep serving.
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
