//! Revenue trend bucketing.

use std::{fmt, str::FromStr};

use jiff::{Timestamp, ToSpan, civil::Date, tz::TimeZone};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::reports::models::RevenueBucket;

/// Most buckets a single trend may span.
pub const MAX_PERIODS: u32 = 366;

/// Width of a revenue bucket. Weeks start on Monday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

impl Granularity {
    /// `date_trunc` field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// First day of the bucket containing `date`.
    #[must_use]
    pub fn bucket_start(self, date: Date) -> Date {
        match self {
            Self::Day => date,
            Self::Week => {
                let offset = i64::from(date.weekday().to_monday_zero_offset());

                date.saturating_sub(offset.days())
            }
            Self::Month => date.first_of_month(),
        }
    }

    fn previous(self, start: Date) -> Date {
        match self {
            Self::Day => start.saturating_sub(1.day()),
            Self::Week => start.saturating_sub(1.week()),
            Self::Month => start.saturating_sub(1.month()),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown granularity: {0}")]
pub struct UnknownGranularity(pub String);

impl FromStr for Granularity {
    type Err = UnknownGranularity;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(UnknownGranularity(other.to_string())),
        }
    }
}

/// Clamp a requested bucket count to `1..=MAX_PERIODS`.
#[must_use]
pub fn clamp_periods(periods: u32) -> u32 {
    periods.clamp(1, MAX_PERIODS)
}

/// Start dates of the trailing `periods` buckets, oldest first, ending with
/// the bucket that contains `now` in UTC.
#[must_use]
pub fn bucket_starts(granularity: Granularity, periods: u32, now: Timestamp) -> Vec<Date> {
    let today = now.to_zoned(TimeZone::UTC).date();

    let mut current = granularity.bucket_start(today);
    let mut starts = vec![current];

    for _ in 1..clamp_periods(periods) {
        current = granularity.previous(current);
        starts.push(current);
    }

    starts.reverse();
    starts
}

/// Pair every bucket with its revenue, zero where storage returned nothing.
#[must_use]
pub fn fill_buckets(starts: &[Date], revenue: &[(Date, u64)]) -> Vec<RevenueBucket> {
    let by_start: FxHashMap<Date, u64> = revenue.iter().copied().collect();

    starts
        .iter()
        .map(|start| RevenueBucket {
            period_start: *start,
            revenue: by_start.get(start).copied().unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn at(text: &str) -> Timestamp {
        text.parse().expect("timestamp should parse")
    }

    #[test]
    fn week_buckets_start_on_monday() {
        assert_eq!(
            Granularity::Week.bucket_start(date(2026, 3, 5)),
            date(2026, 3, 2)
        );
        assert_eq!(
            Granularity::Week.bucket_start(date(2026, 3, 2)),
            date(2026, 3, 2)
        );
        assert_eq!(
            Granularity::Week.bucket_start(date(2026, 3, 8)),
            date(2026, 3, 2)
        );
    }

    #[test]
    fn daily_buckets_end_with_today() {
        let starts = bucket_starts(Granularity::Day, 3, at("2026-03-05T23:30:00Z"));

        assert_eq!(
            starts,
            vec![date(2026, 3, 3), date(2026, 3, 4), date(2026, 3, 5)]
        );
    }

    #[test]
    fn monthly_buckets_cross_year_boundary() {
        let starts = bucket_starts(Granularity::Month, 3, at("2026-01-15T00:00:00Z"));

        assert_eq!(
            starts,
            vec![date(2025, 11, 1), date(2025, 12, 1), date(2026, 1, 1)]
        );
    }

    #[test]
    fn periods_are_clamped() {
        let now = at("2026-03-05T12:00:00Z");

        assert_eq!(bucket_starts(Granularity::Day, 0, now).len(), 1);
        assert_eq!(bucket_starts(Granularity::Day, 10_000, now).len(), 366);
    }

    #[test]
    fn missing_buckets_are_zero_filled() {
        let starts = bucket_starts(Granularity::Week, 3, at("2026-03-05T12:00:00Z"));
        let revenue = [(date(2026, 2, 23), 1_500), (date(2026, 3, 2), 250)];

        let buckets = fill_buckets(&starts, &revenue);

        let values: Vec<(Date, u64)> = buckets
            .iter()
            .map(|bucket| (bucket.period_start, bucket.revenue))
            .collect();

        assert_eq!(
            values,
            vec![
                (date(2026, 2, 16), 0),
                (date(2026, 2, 23), 1_500),
                (date(2026, 3, 2), 250),
            ]
        );
    }

    #[test]
    fn granularity_parses_query_values() {
        assert_eq!("week".parse::<Granularity>(), Ok(Granularity::Week));
        assert!("year".parse::<Granularity>().is_err());
    }
}
