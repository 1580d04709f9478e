// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod aggregate;
pub mod completion;
pub mod estimate;
pub mod insights;
pub mod ledger;

pub use aggregate::DaySummary;
pub use completion::CompletionClient;
pub use estimate::EstimationAdapter;
pub use insights::InsightsAdapter;
pub use ledger::Ledger;
