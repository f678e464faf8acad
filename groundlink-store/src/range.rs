//! ## groundlink-store::range
//! Inclusive time windows over packet timestamps (Unix seconds).

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: u64,
    pub end: u64,
}

impl TimeRange {
    pub fn new(start: u64, end: u64) -> Result<Self, StoreError> {
        if start > end {
            return Err(StoreError::InvalidRange(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Builds a range from two RFC 3339 timestamps, e.g. `2025-05-01T00:00:00Z`.
    pub fn parse_rfc3339(start: &str, end: &str) -> Result<Self, StoreError> {
        Self::new(parse_seconds(start)?, parse_seconds(end)?)
    }

    #[inline]
    pub fn contains(&self, timestamp: u64) -> bool {
        (self.start..=self.end).contains(&timestamp)
    }
}

fn parse_seconds(value: &str) -> Result<u64, StoreError> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .map_err(|e| StoreError::InvalidRange(format!("{value:?}: {e}")))?;
    u64::try_from(parsed.timestamp())
        .map_err(|_| StoreError::InvalidRange(format!("{value:?} is before the Unix epoch")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let range = TimeRange::parse_rfc3339("1970-01-01T00:01:00Z", "1970-01-01T01:00:00+00:00")
            .unwrap();
        assert_eq!(range, TimeRange { start: 60, end: 3600 });
    }

    #[test]
    fn test_offsets_are_normalised() {
        let range =
            TimeRange::parse_rfc3339("1970-01-01T02:00:00+02:00", "1970-01-01T00:00:10Z").unwrap();
        assert_eq!(range.start, 0);
        assert_eq!(range.end, 10);
    }

    #[test]
    fn test_rejects_malformed_and_inverted() {
        for (start, end) in [
            ("yesterday", "1970-01-01T00:00:00Z"),
            ("1970-01-01T00:00:00Z", "2025-13-01T00:00:00Z"),
            ("1970-01-01T00:10:00Z", "1970-01-01T00:00:00Z"),
            ("1969-12-31T23:59:59Z", "1970-01-01T00:00:00Z"),
        ] {
            let err = TimeRange::parse_rfc3339(start, end).unwrap_err();
            assert!(err.is_client_error(), "{start}..{end}");
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let range = TimeRange::new(10, 20).unwrap();
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(9));
        assert!(!range.contains(21));
        assert!(TimeRange::new(5, 5).is_ok());
    }
}
