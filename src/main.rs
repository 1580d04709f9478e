// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CarbonCal API Server
//!
//! Serves the activity ledger and the estimate/analyze endpoints backed by
//! an external chat-completions service.

use carbon_cal::{config::Config, db::FileStore, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        development = config.development,
        "Starting CarbonCal API"
    );

    if config.completion.api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY is not set; estimate and analyze requests will fail");
    }

    // Open the ledger store
    let store = FileStore::new(&config.data_dir);
    tracing::info!(path = %store.dir().display(), "Using file ledger store");

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), Arc::new(store))?);

    // Build router
    let app = carbon_cal::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("carbon_cal=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
