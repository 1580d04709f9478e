// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod date_key;
pub mod entry;
pub mod estimate;
pub mod insights;

pub use date_key::DateKey;
pub use entry::{Category, Entry, EntryDraft};
pub use estimate::EstimateResult;
pub use insights::{ActivityDescription, DayEntryView, InsightsRequest, InsightsResult};
