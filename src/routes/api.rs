// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ledger routes: entries, daily goal, day summaries and the trend.

use crate::error::Result;
use crate::models::{DateKey, Entry, EntryDraft};
use crate::routes::json_body;
use crate::services::{aggregate, DaySummary};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Ledger routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/days", get(list_days))
        .route("/api/entries", post(log_entry))
        .route(
            "/api/days/{date}/entries",
            get(get_entries).post(add_entry),
        )
        .route("/api/days/{date}/entries/{id}", delete(delete_entry))
        .route("/api/days/{date}/summary", get(get_summary))
        .route("/api/goal", get(get_goal).put(put_goal))
        .route("/api/today", get(get_today))
        .route("/api/trend", get(get_trend))
}

// ─── Entries ─────────────────────────────────────────────────

/// Days that have at least one entry, oldest first.
async fn list_days(State(state): State<Arc<AppState>>) -> Json<Vec<DateKey>> {
    Json(state.ledger.lock().await.date_keys())
}

async fn get_entries(
    State(state): State<Arc<AppState>>,
    Path(date): Path<DateKey>,
) -> Json<Vec<Entry>> {
    Json(state.ledger.lock().await.entries(date).to_vec())
}

/// Validate and append an entry to a day.
async fn add_entry(
    State(state): State<Arc<AppState>>,
    Path(date): Path<DateKey>,
    body: std::result::Result<Json<EntryDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Entry>)> {
    let draft = json_body(body)?;
    let entry = state.ledger.lock().await.add_entry(date, draft)?;

    tracing::info!(%date, id = %entry.id, category = %entry.category, "Entry logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Log an entry under the UTC day it was created.
async fn log_entry(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<EntryDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Entry>)> {
    let draft = json_body(body)?;
    let (date, entry) = state.ledger.lock().await.log_entry(draft)?;

    tracing::info!(%date, id = %entry.id, category = %entry.category, "Entry logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Delete an entry. Unknown ids still answer 204.
async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path((date, id)): Path<(DateKey, Uuid)>,
) -> Result<StatusCode> {
    let removed = state.ledger.lock().await.delete_entry(date, id)?;
    tracing::debug!(%date, %id, removed, "Delete requested");
    Ok(StatusCode::NO_CONTENT)
}

// ─── Summary & Trend ─────────────────────────────────────────

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Path(date): Path<DateKey>,
) -> Json<DaySummary> {
    let ledger = state.ledger.lock().await;
    Json(DaySummary::compute(date, ledger.entries(date), ledger.goal()))
}

/// Summary for the current UTC day.
async fn get_today(State(state): State<Arc<AppState>>) -> Json<DaySummary> {
    let date = DateKey::today();
    let ledger = state.ledger.lock().await;
    Json(DaySummary::compute(date, ledger.entries(date), ledger.goal()))
}

async fn get_trend(State(state): State<Arc<AppState>>) -> Json<Vec<aggregate::TrendPoint>> {
    Json(aggregate::trend(state.ledger.lock().await.days()))
}

// ─── Goal ────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GoalBody {
    pub goal: f64,
}

async fn get_goal(State(state): State<Arc<AppState>>) -> Json<GoalBody> {
    Json(GoalBody {
        goal: state.ledger.lock().await.goal(),
    })
}

async fn put_goal(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<GoalBody>, JsonRejection>,
) -> Result<Json<GoalBody>> {
    let GoalBody { goal } = json_body(body)?;
    state.ledger.lock().await.set_goal(goal)?;

    tracing::info!(goal, "Daily goal changed");
    Ok(Json(GoalBody { goal }))
}
