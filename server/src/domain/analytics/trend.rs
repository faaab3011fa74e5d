//! Dense per-day trend series
//!
//! Aggregation queries return one row per calendar day that had data. The
//! dashboard wants one value per day of the range, so [`fill`] expands the
//! sparse rows into a zero-filled series aligned on `YYYY-MM-DD` keys.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::period::TimeRange;

/// Format of bucket day keys
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

const DAY_KEY_LEN: usize = 10;

/// One value per calendar day, index 0 is the range's first day
pub type Trend = Vec<f64>;

/// A single aggregation row keyed by calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBucket {
    /// `YYYY-MM-DD`, possibly followed by time-of-day noise from the driver
    pub day: String,
    pub value: f64,
}

impl DailyBucket {
    pub fn new(day: impl Into<String>, value: f64) -> Self {
        Self {
            day: day.into(),
            value: if value.is_finite() { value } else { 0.0 },
        }
    }

    /// Build from a loosely typed driver value
    pub fn from_raw(day: impl Into<String>, raw: Option<&str>) -> Self {
        Self {
            day: day.into(),
            value: to_number_or_zero(raw),
        }
    }

    /// The calendar-day part of `day`
    pub fn day_key(&self) -> &str {
        self.day.get(..DAY_KEY_LEN).unwrap_or(&self.day)
    }
}

/// Coerce an aggregate value to a number; null, non-numeric and non-finite become 0
pub fn to_number_or_zero(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Expand sparse buckets into one value per day of `range`
///
/// Buckets outside the range are ignored; buckets sharing a day are summed.
pub fn fill(buckets: &[DailyBucket], range: &TimeRange) -> Trend {
    let mut by_day: HashMap<NaiveDate, f64> = HashMap::with_capacity(buckets.len());
    for bucket in buckets {
        match NaiveDate::parse_from_str(bucket.day_key(), DAY_KEY_FORMAT) {
            Ok(day) => *by_day.entry(day).or_insert(0.0) += bucket.value,
            Err(_) => tracing::trace!(day = %bucket.day, "Skipping bucket with unparseable day"),
        }
    }

    range
        .start()
        .date_naive()
        .iter_days()
        .take(range.day_count())
        .map(|day| by_day.get(&day).copied().unwrap_or(0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(first: &str, last: &str) -> TimeRange {
        TimeRange::from_days(
            NaiveDate::parse_from_str(first, "%Y-%m-%d").unwrap(),
            NaiveDate::parse_from_str(last, "%Y-%m-%d").unwrap(),
            "custom",
        )
    }

    #[test]
    fn test_fill_gaps_with_zero() {
        let buckets = vec![
            DailyBucket::new("2024-04-01", 3.0),
            DailyBucket::new("2024-04-03", 5.0),
        ];
        let trend = fill(&buckets, &range("2024-04-01", "2024-04-03"));
        assert_eq!(trend, vec![3.0, 0.0, 5.0]);
    }

    #[test]
    fn test_fill_empty_buckets_still_dense() {
        let r = range("2024-02-27", "2024-03-02");
        let trend = fill(&[], &r);
        // 2024 is a leap year: 27, 28, 29, 1, 2
        assert_eq!(trend, vec![0.0; 5]);
        assert_eq!(trend.len() as i64, r.days_between() + 1);
    }

    #[test]
    fn test_fill_single_day() {
        let trend = fill(
            &[DailyBucket::new("2024-04-10", 7.0)],
            &range("2024-04-10", "2024-04-10"),
        );
        assert_eq!(trend, vec![7.0]);
    }

    #[test]
    fn test_fill_ignores_out_of_range_buckets() {
        let buckets = vec![
            DailyBucket::new("2024-03-31", 100.0),
            DailyBucket::new("2024-04-02", 2.0),
            DailyBucket::new("2024-04-04", 100.0),
        ];
        let trend = fill(&buckets, &range("2024-04-01", "2024-04-03"));
        assert_eq!(trend, vec![0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_fill_uses_bucket_day_not_time_of_day() {
        let buckets = vec![
            DailyBucket::new("2024-04-01 23:00:00", 1.0),
            DailyBucket::new("2024-04-02T00:00:00.000Z", 4.0),
        ];
        let trend = fill(&buckets, &range("2024-04-01", "2024-04-02"));
        assert_eq!(trend, vec![1.0, 4.0]);
    }

    #[test]
    fn test_fill_skips_unparseable_days() {
        let buckets = vec![
            DailyBucket::new("", 9.0),
            DailyBucket::new("not-a-date", 9.0),
            DailyBucket::new("2024-02-30", 9.0),
            DailyBucket::new("2024-04-02", 2.0),
        ];
        let trend = fill(&buckets, &range("2024-04-01", "2024-04-02"));
        assert_eq!(trend, vec![0.0, 2.0]);
    }

    #[test]
    fn test_fill_sums_duplicate_days() {
        let buckets = vec![
            DailyBucket::new("2024-04-01", 1.5),
            DailyBucket::new("2024-04-01", 2.5),
        ];
        let trend = fill(&buckets, &range("2024-04-01", "2024-04-01"));
        assert_eq!(trend, vec![4.0]);
    }

    #[test]
    fn test_fill_length_matches_range_for_many_ranges() {
        let base = NaiveDate::from_ymd_opt(2023, 12, 20).unwrap();
        for span in 0..70 {
            let r = TimeRange::from_days(base, base + chrono::Duration::days(span), "custom");
            let buckets = vec![DailyBucket::new("2024-01-01", 1.0)];
            let trend = fill(&buckets, &r);
            assert_eq!(trend.len() as i64, span + 1);
            let in_range: f64 = if span >= 12 { 1.0 } else { 0.0 };
            assert!(trend.iter().sum::<f64>() >= in_range);
        }
    }

    #[test]
    fn test_fill_from_loose_values() {
        let buckets = vec![
            DailyBucket::from_raw("2024-04-01", Some("12.50")),
            DailyBucket::from_raw("2024-04-02", None),
            DailyBucket::from_raw("2024-04-03", Some("abc")),
            DailyBucket::from_raw("2024-04-04", Some(" 3 ")),
        ];
        let trend = fill(&buckets, &range("2024-04-01", "2024-04-04"));
        assert_eq!(trend, vec![12.5, 0.0, 0.0, 3.0]);
        assert!(trend.iter().all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn test_to_number_or_zero() {
        assert_eq!(to_number_or_zero(Some("42")), 42.0);
        assert_eq!(to_number_or_zero(Some("-1.25")), -1.25);
        assert_eq!(to_number_or_zero(Some("")), 0.0);
        assert_eq!(to_number_or_zero(Some("NaN")), 0.0);
        assert_eq!(to_number_or_zero(Some("inf")), 0.0);
        assert_eq!(to_number_or_zero(Some("1e3")), 1000.0);
        assert_eq!(to_number_or_zero(None), 0.0);
    }

    #[test]
    fn test_bucket_new_rejects_non_finite() {
        assert_eq!(DailyBucket::new("2024-04-01", f64::NAN).value, 0.0);
        assert_eq!(DailyBucket::new("2024-04-01", f64::INFINITY).value, 0.0);
    }

    #[test]
    fn test_day_key_short_input() {
        let bucket = DailyBucket::new("2024-4-1", 1.0);
        assert_eq!(bucket.day_key(), "2024-4-1");
    }
}
