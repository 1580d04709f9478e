// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory ledger store for tests and ephemeral sessions.
//!
//! Records are kept as serialized JSON so that a reopened ledger goes through
//! the same decode path as the file store. Writes can be made to fail on
//! demand to exercise persistence error handling.

use crate::db::{records, DayBuckets, LedgerStore, StoreError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Records {
    entries: Option<String>,
    goal: Option<String>,
}

/// Memory-backed store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Records>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent save fail with [`StoreError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw JSON of the entries record, if written.
    pub fn raw_entries(&self) -> Option<String> {
        self.lock().ok().and_then(|r| r.entries.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Records>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

impl LedgerStore for MemoryStore {
    fn load_entries(&self) -> Result<Option<DayBuckets>, StoreError> {
        match self.lock()?.entries.as_deref() {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => serde_json::from_str(raw).map(Some).map_err(|source| {
                StoreError::Decode {
                    record: records::ENTRIES,
                    source,
                }
            }),
        }
    }

    fn save_entries(&self, days: &DayBuckets) -> Result<(), StoreError> {
        self.check_writable()?;
        let raw = serde_json::to_string(days).map_err(|source| StoreError::Decode {
            record: records::ENTRIES,
            source,
        })?;
        self.lock()?.entries = Some(raw);
        Ok(())
    }

    fn load_goal(&self) -> Result<Option<f64>, StoreError> {
        match self.lock()?.goal.as_deref() {
            None => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|source| StoreError::Decode {
                    record: records::GOAL,
                    source,
                }),
        }
    }

    fn save_goal(&self, goal: f64) -> Result<(), StoreError> {
        self.check_writable()?;
        self.lock()?.goal = Some(goal.to_string());
        Ok(())
    }
}
