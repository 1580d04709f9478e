// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity entries and the validator that admits them into the ledger.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Label stored when the caller submits a blank one.
pub const UNTITLED_LABEL: &str = "Untitled activity";

/// Closed set of activity categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Category {
    Transport,
    Food,
    Home,
    Shopping,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Transport,
        Category::Food,
        Category::Home,
        Category::Shopping,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Transport => "transport",
            Category::Food => "food",
            Category::Home => "home",
            Category::Shopping => "shopping",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

/// A stored activity. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Entry {
    pub id: Uuid,
    pub category: Category,
    pub label: String,
    /// Carbon calories (grams CO₂e), always > 0
    pub amount: f64,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Unvalidated entry as submitted by a caller.
///
/// `amount` accepts JSON numbers and numeric strings; anything else decodes
/// to `None` so that the validator, not the decoder, rejects it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl EntryDraft {
    pub fn new(category: Category, label: impl Into<String>, amount: f64) -> Self {
        Self {
            category: Some(category.as_str().to_string()),
            label: label.into(),
            amount: Some(amount),
            ..Default::default()
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Check structural invariants and produce a storable entry.
    ///
    /// `now` is used for `created_at` when the caller did not supply one.
    pub fn validate(self, now: DateTime<Utc>) -> Result<Entry, ValidationError> {
        let amount = self
            .amount
            .filter(|a| a.is_finite() && *a > 0.0)
            .ok_or(ValidationError::NonPositiveAmount)?;

        let category = match self.category.as_deref() {
            Some(raw) => raw.parse()?,
            None => Category::Other,
        };

        let label = match self.label.trim() {
            "" => UNTITLED_LABEL.to_string(),
            trimmed => trimmed.to_string(),
        };

        let notes = self
            .notes
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        Ok(Entry {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            category,
            label,
            amount,
            notes,
            created_at: self.created_at.unwrap_or(now),
        })
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2024-01-15T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let draft = EntryDraft::new(Category::Food, "Lunch", amount);
            assert_eq!(
                draft.validate(now()).unwrap_err(),
                ValidationError::NonPositiveAmount,
                "amount {} should be rejected",
                amount
            );
        }

        let missing = EntryDraft {
            label: "Lunch".to_string(),
            ..Default::default()
        };
        assert_eq!(
            missing.validate(now()).unwrap_err(),
            ValidationError::NonPositiveAmount
        );
    }

    #[test]
    fn test_non_numeric_amount_decodes_to_none() {
        let draft: EntryDraft =
            serde_json::from_str(r#"{"label":"Bus","category":"transport","amount":"lots"}"#)
                .unwrap();
        assert_eq!(draft.amount, None);
        assert!(draft.validate(now()).is_err());

        let draft: EntryDraft =
            serde_json::from_str(r#"{"label":"Bus","category":"transport","amount":"250"}"#)
                .unwrap();
        assert_eq!(draft.amount, Some(250.0));
    }

    #[test]
    fn test_label_and_notes_normalized() {
        let entry = EntryDraft::new(Category::Home, "   ", 12.5)
            .with_notes("  left the heater on  ")
            .validate(now())
            .unwrap();

        assert_eq!(entry.label, UNTITLED_LABEL);
        assert_eq!(entry.notes, "left the heater on");
        assert_eq!(entry.created_at, now());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut draft = EntryDraft::new(Category::Food, "Snack", 10.0);
        draft.category = Some("spaceflight".to_string());
        assert_eq!(
            draft.validate(now()).unwrap_err(),
            ValidationError::UnknownCategory("spaceflight".to_string())
        );
    }

    #[test]
    fn test_missing_category_defaults_to_other() {
        let draft = EntryDraft {
            label: "Something".to_string(),
            amount: Some(5.0),
            ..Default::default()
        };
        assert_eq!(draft.validate(now()).unwrap().category, Category::Other);
    }

    #[test]
    fn test_supplied_id_is_kept() {
        let id = Uuid::new_v4();
        let entry = EntryDraft::new(Category::Shopping, "Shoes", 8000.0)
            .with_id(id)
            .validate(now())
            .unwrap();
        assert_eq!(entry.id, id);
    }

    #[test]
    fn test_entry_uses_camel_case_on_disk() {
        let entry = EntryDraft::new(Category::Transport, "Bike", 20.0)
            .validate(now())
            .unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["category"], "transport");
    }
}
