// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Structured emissions estimates returned by the estimation adapter.

use crate::error::AdapterError;
use crate::models::entry::{Category, EntryDraft};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A sanitized estimate: both figures are non-negative whole numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EstimateResult {
    pub category: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub carbon_grams: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub carbon_calories: u64,
    pub assumptions: String,
    pub explanation: String,
}

/// Shape the model is instructed to produce, decoded strictly.
#[derive(Debug, Deserialize)]
struct RawEstimate {
    category: String,
    carbon_grams: f64,
    carbon_calories: f64,
    #[serde(default)]
    assumptions: Value,
    #[serde(default)]
    explanation: Value,
}

impl EstimateResult {
    /// Decode and sanitize a completion payload.
    ///
    /// `category` must be a string and both carbon figures numbers; anything
    /// else is a `MalformedResponse`.
    pub fn from_payload(payload: Map<String, Value>) -> Result<Self, AdapterError> {
        let raw: RawEstimate = serde_json::from_value(Value::Object(payload))
            .map_err(|e| AdapterError::MalformedResponse(e.to_string()))?;

        Ok(Self {
            category: raw.category,
            carbon_grams: sanitize_amount(raw.carbon_grams),
            carbon_calories: sanitize_amount(raw.carbon_calories),
            assumptions: raw.assumptions.as_str().unwrap_or_default().to_string(),
            explanation: raw.explanation.as_str().unwrap_or_default().to_string(),
        })
    }

    /// Category as a ledger category, falling back to `other` for anything
    /// the model invented.
    pub fn ledger_category(&self) -> Category {
        self.category.parse().unwrap_or(Category::Other)
    }

    /// Pre-fill an entry from this estimate.
    pub fn into_draft(self, label: impl Into<String>) -> EntryDraft {
        EntryDraft::new(
            self.ledger_category(),
            label,
            self.carbon_calories as f64,
        )
        .with_notes(self.explanation)
    }
}

/// Floor at zero and round to the nearest whole gram.
fn sanitize_amount(value: f64) -> u64 {
    value.max(0.0).round() as u64
}
