//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use docscan_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    docscan_infra::init_telemetry(&config.service_name, &config.environment)?;

    tracing::info!("Configuration loaded and validated successfully");

    let recognizer = services::setup_recognizer(&config)?;
    let state = Arc::new(AppState::new(config.clone(), recognizer));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
