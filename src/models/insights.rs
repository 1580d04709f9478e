// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Narrative insights requests and best-effort results.

use crate::error::ValidationError;
use crate::models::{DateKey, Entry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// What to analyze: one free-text activity, or one day of the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum InsightsRequest {
    Single(ActivityDescription),
    Day {
        date: DateKey,
        goal: f64,
        entries: Vec<DayEntryView>,
    },
}

/// Free-text description of one activity.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ActivityDescription {
    #[validate(length(max = 2000, message = "description is too long"))]
    pub description: String,
}

impl ActivityDescription {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Read-only projection of a ledger entry sent to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayEntryView {
    pub label: String,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub notes: String,
}

impl From<&Entry> for DayEntryView {
    fn from(entry: &Entry) -> Self {
        Self {
            label: entry.label.clone(),
            category: entry.category.as_str().to_string(),
            amount: entry.amount,
            notes: entry.notes.clone(),
        }
    }
}

impl InsightsRequest {
    /// Day-mode request over a ledger bucket.
    pub fn for_day(date: DateKey, goal: f64, entries: &[Entry]) -> Self {
        InsightsRequest::Day {
            date,
            goal,
            entries: entries.iter().map(DayEntryView::from).collect(),
        }
    }

    /// Reject requests that have nothing to analyze.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            InsightsRequest::Single(single) if single.description.trim().is_empty() => {
                Err(ValidationError::EmptyDescription)
            }
            InsightsRequest::Day { entries, .. } if entries.is_empty() => {
                Err(ValidationError::NoEntries)
            }
            _ => Ok(()),
        }
    }
}

/// Narrative produced by the model. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct InsightsResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_insights: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_actions: Option<Vec<String>>,
}

impl InsightsResult {
    /// Keep whatever fields have the right type and drop the rest.
    pub fn from_payload(payload: &Map<String, Value>) -> Self {
        let text = |key: &str| payload.get(key).and_then(Value::as_str).map(str::to_string);
        let list = |key: &str| {
            payload.get(key).and_then(Value::as_array).map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
        };

        Self {
            headline: text("headline"),
            summary: text("summary"),
            top_insights: list("top_insights"),
            suggested_actions: list("suggested_actions"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
