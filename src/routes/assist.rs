// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Estimate and analyze routes backed by the completion service.
//!
//! Day analysis either takes the day in the request body or reads it from
//! the ledger.
//!
//! Any adapter failure other than bad input is collapsed into a generic
//! message; the cause is only attached in development mode.

use crate::error::{AppError, Result};
use crate::models::{ActivityDescription, DateKey, EstimateResult, InsightsRequest, InsightsResult};
use crate::routes::json_body;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::post,
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

const ESTIMATE_FAILED: &str = "Failed to estimate carbon footprint.";
const ANALYZE_FAILED: &str = "Failed to analyze activity.";
const MAX_DAY_ENTRIES: usize = 500;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/estimate", post(estimate))
        .route("/api/analyze", post(analyze))
        .route("/api/days/{date}/analyze", post(analyze_day))
}

/// Enforce request limits before anything reaches the completion service.
fn check_request(request: &InsightsRequest) -> Result<()> {
    match request {
        InsightsRequest::Single(single) => single
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string())),
        InsightsRequest::Day { entries, .. } if entries.len() > MAX_DAY_ENTRIES => Err(
            AppError::BadRequest(format!("at most {} entries can be analyzed", MAX_DAY_ENTRIES)),
        ),
        InsightsRequest::Day { .. } => Ok(()),
    }
}

/// Estimate one activity's footprint.
async fn estimate(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<ActivityDescription>, JsonRejection>,
) -> Result<Json<EstimateResult>> {
    let body = json_body(body)
        .map_err(|_| AppError::BadRequest("Missing or invalid 'description'".to_string()))?;
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let estimate = state
        .estimator
        .estimate(&body.description)
        .await
        .map_err(|e| AppError::from_adapter(e, ESTIMATE_FAILED, state.config.development))?;

    Ok(Json(estimate))
}

/// Narrative insights for one activity or a caller-supplied day.
async fn analyze(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<InsightsRequest>, JsonRejection>,
) -> Result<Json<InsightsResult>> {
    let request = json_body(body)?;
    run_analysis(&state, request).await
}

/// Narrative insights for a day already in the ledger.
async fn analyze_day(
    State(state): State<Arc<AppState>>,
    Path(date): Path<DateKey>,
) -> Result<Json<InsightsResult>> {
    // Snapshot the bucket so the lock is not held across the upstream call.
    let request = {
        let ledger = state.ledger.lock().await;
        InsightsRequest::for_day(date, ledger.goal(), ledger.entries(date))
    };
    run_analysis(&state, request).await
}

async fn run_analysis(state: &AppState, request: InsightsRequest) -> Result<Json<InsightsResult>> {
    check_request(&request)?;

    let insights = state
        .insights
        .analyze(&request)
        .await
        .map_err(|e| AppError::from_adapter(e, ANALYZE_FAILED, state.config.development))?;

    Ok(Json(insights))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_description_rejected() {
        let ok = InsightsRequest::Single(ActivityDescription::new("took the bus"));
        assert!(check_request(&ok).is_ok());

        let long = InsightsRequest::Single(ActivityDescription::new("a".repeat(2001)));
        assert!(matches!(check_request(&long), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_day_entry_cap() {
        let entries = |n| InsightsRequest::Day {
            date: "2024-01-15".parse().unwrap(),
            goal: 5000.0,
            entries: vec![
                crate::models::DayEntryView {
                    label: "Tea".to_string(),
                    category: "food".to_string(),
                    amount: 20.0,
                    notes: String::new(),
                };
                n
            ],
        };

        assert!(check_request(&entries(MAX_DAY_ENTRIES)).is_ok());
        assert!(matches!(
            check_request(&entries(MAX_DAY_ENTRIES + 1)),
            Err(AppError::BadRequest(_))
        ));
    }
}
