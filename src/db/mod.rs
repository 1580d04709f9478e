//! Persistence port for the ledger.
//!
//! The ledger only talks to [`LedgerStore`]; the service wires in
//! [`FileStore`] and tests use [`MemoryStore`].

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::models::{DateKey, Entry};
use std::collections::BTreeMap;

/// Full ledger snapshot: date key to that day's entries in insertion order.
pub type DayBuckets = BTreeMap<DateKey, Vec<Entry>>;

/// Record names as constants.
pub mod records {
    /// Date key -> entries mapping
    pub const ENTRIES: &str = "carbon-cal-entries";
    /// Numeric daily goal
    pub const GOAL: &str = "carbon-cal-goal";
}

/// Durable storage for the two ledger records.
///
/// `load_*` returns `Ok(None)` when a record has never been written (or is
/// empty), which the ledger treats as "no history yet".
///
/// Methods are synchronous and are called from request handlers while the
/// ledger mutex is held, so a save blocks that runtime worker until it
/// returns. Snapshots are a few kilobytes for a single user's history; a
/// store backed by something slower than local disk should move its I/O onto
/// `tokio::task::spawn_blocking` behind this trait.
pub trait LedgerStore: Send + Sync {
    fn load_entries(&self) -> Result<Option<DayBuckets>, StoreError>;
    fn save_entries(&self, days: &DayBuckets) -> Result<(), StoreError>;
    fn load_goal(&self) -> Result<Option<f64>, StoreError>;
    fn save_goal(&self, goal: f64) -> Result<(), StoreError>;
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {record}: {source}")]
    Io {
        record: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt {record} record: {source}")]
    Decode {
        record: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
