// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-side aggregation over ledger contents.
//!
//! Everything here is a pure function of its inputs.

use crate::db::DayBuckets;
use crate::models::{Category, DateKey, Entry};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Summed amount for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: f64,
}

/// One point of the multi-day trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrendPoint {
    pub date: DateKey,
    pub total: f64,
}

/// Sum of all amounts.
pub fn total(entries: &[Entry]) -> f64 {
    entries.iter().map(|e| e.amount).sum()
}

/// Per-category sums for categories that appear, in first-seen order.
pub fn breakdown(entries: &[Entry]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for entry in entries {
        match totals.iter_mut().find(|t| t.category == entry.category) {
            Some(t) => t.amount += entry.amount,
            None => totals.push(CategoryTotal {
                category: entry.category,
                amount: entry.amount,
            }),
        }
    }
    totals
}

/// Category with the strictly greatest sum. Ties keep the earliest in
/// `breakdown` order.
pub fn highest_category(breakdown: &[CategoryTotal]) -> Option<CategoryTotal> {
    breakdown.iter().fold(None, |best, candidate| match best {
        Some(b) if candidate.amount <= b.amount => Some(b),
        _ => Some(*candidate),
    })
}

pub fn remaining(goal: f64, total: f64) -> f64 {
    goal - total
}

/// Fraction of the goal used, capped at 1.
///
/// With a goal of zero or below any positive total counts as the whole
/// budget used and an empty day as none of it.
pub fn progress(goal: f64, total: f64) -> f64 {
    if goal > 0.0 {
        (total / goal).min(1.0)
    } else if total > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Daily totals for every non-empty day, oldest first.
pub fn trend(days: &DayBuckets) -> Vec<TrendPoint> {
    days.iter()
        .filter(|(_, entries)| !entries.is_empty())
        .map(|(date, entries)| TrendPoint {
            date: *date,
            total: total(entries),
        })
        .collect()
}

/// Everything the daily view shows, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DaySummary {
    pub date: DateKey,
    pub entry_count: usize,
    pub total: f64,
    pub goal: f64,
    pub remaining: f64,
    pub progress: f64,
    pub over_budget: bool,
    pub breakdown: Vec<CategoryTotal>,
    pub highest_category: Option<CategoryTotal>,
}

impl DaySummary {
    pub fn compute(date: DateKey, entries: &[Entry], goal: f64) -> Self {
        let total = total(entries);
        let breakdown = breakdown(entries);
        let highest_category = highest_category(&breakdown);
        let remaining = remaining(goal, total);

        Self {
            date,
            entry_count: entries.len(),
            total,
            goal,
            remaining,
            progress: progress(goal, total),
            over_budget: remaining < 0.0,
            breakdown,
            highest_category,
        }
    }
}
