// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Calendar-day keys that partition the ledger.
//!
//! Keys are always the UTC calendar day of the moment they are derived from,
//! so a session that crosses local midnight keeps writing to the same bucket
//! until UTC rolls over.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// A `YYYY-MM-DD` day key. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Key for the UTC calendar day containing `moment`.
    pub fn from_utc(moment: DateTime<Utc>) -> Self {
        Self(moment.date_naive())
    }

    /// Key for the current UTC day.
    pub fn today() -> Self {
        Self::from_utc(Utc::now())
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_utc_uses_utc_calendar_day() {
        // 23:30 UTC on Jan 15 is already Jan 16 in UTC+1, but the key stays Jan 15.
        let moment = Utc.with_ymd_and_hms(2024, 1, 15, 23, 30, 0).unwrap();
        assert_eq!(DateKey::from_utc(moment).to_string(), "2024-01-15");
    }

    #[test]
    fn test_parse_and_order() {
        let a: DateKey = "2024-01-09".parse().unwrap();
        let b: DateKey = "2024-01-10".parse().unwrap();
        assert!(a < b);
        assert!("2024-13-01".parse::<DateKey>().is_err());
        assert!("yesterday".parse::<DateKey>().is_err());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let key: DateKey = "2024-03-02".parse().unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-03-02\"");
        let back: DateKey = serde_json::from_str("\"2024-03-02\"").unwrap();
        assert_eq!(back, key);
    }
}
