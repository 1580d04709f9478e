// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON-file ledger store.
//!
//! Each record lives in `<data_dir>/<record>.json` and is replaced atomically
//! (write to a temp file, then rename) so a crash mid-write never leaves a
//! truncated snapshot behind.
//!
//! Reads and writes use blocking `std::fs` calls on the calling thread; see
//! [`LedgerStore`] for the blocking contract.

use crate::db::{records, DayBuckets, LedgerStore, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-backed store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store in `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, record: &str) -> PathBuf {
        self.dir.join(format!("{}.json", record))
    }

    fn read<T: DeserializeOwned>(&self, record: &'static str) -> Result<Option<T>, StoreError> {
        let content = match fs::read_to_string(self.path(record)) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { record, source }),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Decode { record, source })
    }

    fn write<T: Serialize>(&self, record: &'static str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|source| StoreError::Decode { record, source })?;
        write_atomic(&self.path(record), &bytes).map_err(|source| StoreError::Io { record, source })
    }
}

impl LedgerStore for FileStore {
    fn load_entries(&self) -> Result<Option<DayBuckets>, StoreError> {
        self.read(records::ENTRIES)
    }

    fn save_entries(&self, days: &DayBuckets) -> Result<(), StoreError> {
        self.write(records::ENTRIES, days)
    }

    fn load_goal(&self) -> Result<Option<f64>, StoreError> {
        self.read(records::GOAL)
    }

    fn save_goal(&self, goal: f64) -> Result<(), StoreError> {
        self.write(records::GOAL, &goal)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(tmp, path)
}
