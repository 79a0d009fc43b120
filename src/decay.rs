//! Availability and name-decay facts derived from a summoner record.
//!
//! Nothing here is stored: every value is recomputed from the record and the
//! caller's `now`, so a long-lived page never shows a verdict that went stale.

use chrono::{DateTime, Utc};

use crate::models::SummonerRecord;

pub const MIN_DECAY_MONTHS: u32 = 6;
pub const MAX_DECAY_MONTHS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedStatus {
    pub available: bool,
    pub decay_months: u32,
}

impl DerivedStatus {
    pub fn derive(record: &SummonerRecord, now: DateTime<Utc>) -> Self {
        Self {
            available: is_available(record, now),
            decay_months: decay_months(record.level),
        }
    }
}

/// `min(30, max(6, level))`
pub fn decay_months(level: u32) -> u32 {
    level.clamp(MIN_DECAY_MONTHS, MAX_DECAY_MONTHS)
}

pub fn is_available(record: &SummonerRecord, now: DateTime<Utc>) -> bool {
    record.availability_date <= now
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn record(level: u32, availability_date: DateTime<Utc>) -> SummonerRecord {
        SummonerRecord {
            name: "Xyz".to_string(),
            level,
            revision_date: availability_date - Duration::days(180),
            availability_date,
        }
    }

    #[test]
    fn decay_is_clamped_between_six_and_thirty() {
        assert_eq!(decay_months(0), 6);
        assert_eq!(decay_months(1), 6);
        assert_eq!(decay_months(6), 6);
        assert_eq!(decay_months(18), 18);
        assert_eq!(decay_months(30), 30);
        assert_eq!(decay_months(99), 30);
        assert_eq!(decay_months(u32::MAX), 30);
    }

    #[test]
    fn decay_matches_min_max_formula_for_all_small_levels() {
        for level in 0..=500 {
            assert_eq!(decay_months(level), level.max(6).min(30), "level {level}");
        }
    }

    #[test]
    fn availability_boundary_is_inclusive() {
        let now = Utc::now();
        assert!(is_available(&record(10, now), now));
        assert!(!is_available(&record(10, now + Duration::milliseconds(1)), now));
    }

    #[test]
    fn availability_is_monotonic_in_now() {
        let freed_at = Utc::now();
        let record = record(40, freed_at);

        let mut seen_available = false;
        for offset in -50..50 {
            let available = is_available(&record, freed_at + Duration::hours(offset));
            if seen_available {
                assert!(available, "availability regressed at offset {offset}h");
            }
            seen_available |= available;
        }
        assert!(seen_available);
    }

    #[test]
    fn past_availability_date_yields_available_status() {
        let now = Utc::now();
        let record = SummonerRecord {
            name: "xyz".to_string(),
            level: 15,
            revision_date: now - Duration::milliseconds(2000),
            availability_date: now - Duration::milliseconds(1000),
        };

        let status = DerivedStatus::derive(&record, now);
        assert_eq!(
            status,
            DerivedStatus {
                available: true,
                decay_months: 15
            }
        );
    }

    #[test]
    fn deriving_twice_gives_identical_results() {
        let now = Utc::now();
        let record = record(3, now + Duration::days(30));

        let first = DerivedStatus::derive(&record, now);
        let second = DerivedStatus::derive(&record, now);
        assert_eq!(first, second);
        assert!(!first.available);
        assert_eq!(first.decay_months, 6);
    }
}
