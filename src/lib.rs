// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! CarbonCal: a personal "carbon calorie" tracker
//!
//! This crate provides the activity ledger, the aggregation engine and the
//! completion-service adapters that estimate an activity's footprint and
//! write short narrative insights, served over a small JSON API.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::LedgerStore;
use error::AppError;
use services::{CompletionClient, EstimationAdapter, InsightsAdapter, Ledger};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Single-writer ledger; every mutation holds the lock until persisted.
    pub ledger: Mutex<Ledger>,
    pub estimator: EstimationAdapter,
    pub insights: InsightsAdapter,
}

impl AppState {
    /// Open the ledger from `store` and build the completion adapters.
    pub fn new(config: Config, store: Arc<dyn LedgerStore>) -> Result<Self, AppError> {
        let ledger = Ledger::open(store)?;
        let client = CompletionClient::new(&config.completion)?;

        Ok(Self {
            config,
            ledger: Mutex::new(ledger),
            estimator: EstimationAdapter::new(client.clone()),
            insights: InsightsAdapter::new(client),
        })
    }
}
