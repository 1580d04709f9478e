// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity ledger: the system of record for a session's history.
//!
//! Handles:
//! - Validating and appending entries to a day bucket, either one named by
//!   the caller or the UTC day the entry was created
//! - Idempotent deletion by id
//! - The daily goal
//! - Writing a full snapshot to the store after every mutation
//!
//! A failed write is reported as `LedgerError::Persistence` but the in-memory
//! change stays applied; memory is the source of truth for the session.

use crate::db::{DayBuckets, LedgerStore};
use crate::error::{LedgerError, ValidationError};
use crate::models::{DateKey, Entry, EntryDraft};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Goal used until the user sets one, in carbon calories per day.
pub const DEFAULT_DAILY_GOAL: f64 = 5000.0;

/// Date-partitioned entry store plus the daily goal.
pub struct Ledger {
    store: Arc<dyn LedgerStore>,
    days: DayBuckets,
    goal: f64,
}

impl Ledger {
    /// Load both records from `store`. Absent records mean an empty history
    /// and the default goal.
    pub fn open(store: Arc<dyn LedgerStore>) -> Result<Self, LedgerError> {
        let mut days = store.load_entries()?.unwrap_or_default();
        days.retain(|_, entries| !entries.is_empty());

        let goal = store
            .load_goal()?
            .filter(|g| g.is_finite())
            .unwrap_or(DEFAULT_DAILY_GOAL);

        tracing::info!(
            days = days.len(),
            entries = days.values().map(Vec::len).sum::<usize>(),
            goal,
            "Ledger loaded"
        );

        Ok(Self { store, days, goal })
    }

    /// Validate `draft` and append it to the bucket for `date`.
    pub fn add_entry(&mut self, date: DateKey, draft: EntryDraft) -> Result<Entry, LedgerError> {
        let entry = draft.validate(Utc::now())?;
        self.insert(date, entry)
    }

    /// Validate `draft` and file it under the UTC day of its `created_at`.
    pub fn log_entry(&mut self, draft: EntryDraft) -> Result<(DateKey, Entry), LedgerError> {
        let entry = draft.validate(Utc::now())?;
        let date = DateKey::from_utc(entry.created_at);
        self.insert(date, entry).map(|entry| (date, entry))
    }

    /// Remove the entry with `id` from `date`'s bucket.
    ///
    /// Unknown ids are a no-op; returns whether anything was removed. The store
    /// is only written when the ledger actually changed.
    pub fn delete_entry(&mut self, date: DateKey, id: Uuid) -> Result<bool, LedgerError> {
        let Some(bucket) = self.days.get_mut(&date) else {
            return Ok(false);
        };

        let before = bucket.len();
        bucket.retain(|e| e.id != id);
        if bucket.len() == before {
            return Ok(false);
        }

        if bucket.is_empty() {
            self.days.remove(&date);
        }
        tracing::debug!(%date, %id, "Entry deleted");

        self.persist_entries()?;
        Ok(true)
    }

    /// Entries for `date` in insertion order; empty for unknown days.
    pub fn entries(&self, date: DateKey) -> &[Entry] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or_default()
    }

    /// Days with at least one entry, oldest first.
    pub fn date_keys(&self) -> Vec<DateKey> {
        self.days.keys().copied().collect()
    }

    pub fn days(&self) -> &DayBuckets {
        &self.days
    }

    pub fn goal(&self) -> f64 {
        self.goal
    }

    /// Replace the daily goal. Zero and negative goals are accepted.
    pub fn set_goal(&mut self, goal: f64) -> Result<(), LedgerError> {
        if !goal.is_finite() {
            return Err(ValidationError::InvalidGoal.into());
        }

        self.goal = goal;
        tracing::debug!(goal, "Daily goal updated");

        self.store.save_goal(goal).map_err(|e| {
            tracing::error!(error = %e, "Failed to persist daily goal");
            LedgerError::from(e)
        })
    }

    fn insert(&mut self, date: DateKey, entry: Entry) -> Result<Entry, LedgerError> {
        if self.contains_id(entry.id) {
            return Err(ValidationError::DuplicateId(entry.id).into());
        }

        self.days.entry(date).or_default().push(entry.clone());
        tracing::debug!(%date, id = %entry.id, amount = entry.amount, "Entry added");

        self.persist_entries()?;
        Ok(entry)
    }

    fn contains_id(&self, id: Uuid) -> bool {
        self.days.values().flatten().any(|e| e.id == id)
    }

    fn persist_entries(&self) -> Result<(), LedgerError> {
        self.store.save_entries(&self.days).map_err(|e| {
            tracing::error!(error = %e, "Failed to persist ledger");
            LedgerError::from(e)
        })
    }
}
