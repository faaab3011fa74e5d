//! Period resolution
//!
//! Turns an explicit `{start, end}` pair or a named relative period into a
//! day-aligned [`TimeRange`], and derives the equal-length window that
//! immediately precedes it. All calendar math is done on UTC days.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use super::clock::Clock;

/// Label given to ranges resolved from explicit dates
pub const CUSTOM_LABEL: &str = "custom";

/// Days covered by an explicit range with no start date (end day included)
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Longest explicit range, in days; earlier start dates are pulled forward
pub const MAX_RANGE_DAYS: i64 = 36_600;

/// Named relative periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedPeriod {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    AllTime,
}

impl NamedPeriod {
    pub const ALL: [NamedPeriod; 7] = [
        Self::Today,
        Self::Yesterday,
        Self::ThisWeek,
        Self::LastWeek,
        Self::ThisMonth,
        Self::LastMonth,
        Self::AllTime,
    ];

    /// Parse a known label, `None` otherwise
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "today" => Some(Self::Today),
            "yesterday" => Some(Self::Yesterday),
            "this_week" => Some(Self::ThisWeek),
            "last_week" => Some(Self::LastWeek),
            "this_month" => Some(Self::ThisMonth),
            "last_month" => Some(Self::LastMonth),
            "all_time" => Some(Self::AllTime),
            _ => None,
        }
    }

    /// Parse a label, falling back to `AllTime` for anything unrecognized
    pub fn from_label(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            tracing::debug!(label = s, "Unknown period label, using all_time");
            Self::AllTime
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::ThisWeek => "this_week",
            Self::LastWeek => "last_week",
            Self::ThisMonth => "this_month",
            Self::LastMonth => "last_month",
            Self::AllTime => "all_time",
        }
    }
}

impl fmt::Display for NamedPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the caller asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodRequest {
    Explicit {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
    Named(NamedPeriod),
}

impl Default for PeriodRequest {
    fn default() -> Self {
        Self::Explicit {
            start: None,
            end: None,
        }
    }
}

/// A closed instant interval `[start, end]` with a label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    label: String,
}

impl TimeRange {
    /// Returns `None` when `start > end`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, label: impl Into<String>) -> Option<Self> {
        (start <= end).then(|| Self {
            start,
            end,
            label: label.into(),
        })
    }

    /// Range covering whole calendar days `first..=last`
    pub fn from_days(first: NaiveDate, last: NaiveDate, label: impl Into<String>) -> Self {
        let (first, last) = if first <= last {
            (first, last)
        } else {
            (last, first)
        };
        Self {
            start: start_of_day(first),
            end: end_of_day(last),
            label: label.into(),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Calendar days between start and end (0 for a single-day range)
    pub fn days_between(&self) -> i64 {
        days_between(self.start, self.end)
    }

    /// Number of calendar days covered, both ends included
    pub fn day_count(&self) -> usize {
        (self.days_between() + 1) as usize
    }
}

/// 00:00:00.000 of the given day
pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// 23:59:59.999 of the given day
pub fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_hms_milli_opt(23, 59, 59, 999)
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|| start_of_day(day))
}

/// Whole calendar days from `start`'s day to `end`'s day
pub fn days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end.date_naive() - start.date_naive()).num_days()
}

/// Resolve a request into a concrete range relative to `clock`
pub fn resolve(request: &PeriodRequest, clock: &dyn Clock) -> TimeRange {
    let now = clock.now();
    match request {
        PeriodRequest::Explicit { start, end } => resolve_explicit(*start, *end, now),
        PeriodRequest::Named(period) => resolve_named(*period, now),
    }
}

fn resolve_explicit(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> TimeRange {
    let last = end.unwrap_or(now).date_naive();
    let first = match start {
        Some(start) => start.date_naive(),
        None => days_before(last, DEFAULT_WINDOW_DAYS - 1),
    };

    let (first, last) = if first <= last {
        (first, last)
    } else {
        tracing::debug!(%first, %last, "Explicit range reversed, swapping endpoints");
        (last, first)
    };

    let earliest = days_before(last, MAX_RANGE_DAYS - 1);
    let first = if first < earliest {
        tracing::debug!(%first, %earliest, "Explicit range too long, moving start forward");
        earliest
    } else {
        first
    };

    TimeRange::from_days(first, last, CUSTOM_LABEL)
}

fn resolve_named(period: NamedPeriod, now: DateTime<Utc>) -> TimeRange {
    let today = now.date_naive();
    let label = period.as_str();

    match period {
        NamedPeriod::Today => TimeRange::from_days(today, today, label),
        NamedPeriod::Yesterday => {
            let yesterday = days_before(today, 1);
            TimeRange::from_days(yesterday, yesterday, label)
        }
        NamedPeriod::ThisWeek => TimeRange {
            start: start_of_day(week_start(today)),
            end: now,
            label: label.to_string(),
        },
        NamedPeriod::LastWeek => {
            let this_week = week_start(today);
            TimeRange::from_days(
                days_before(this_week, 7),
                days_before(this_week, 1),
                label,
            )
        }
        NamedPeriod::ThisMonth => TimeRange {
            start: start_of_day(month_start(today)),
            end: now,
            label: label.to_string(),
        },
        NamedPeriod::LastMonth => {
            let last_of_previous = days_before(month_start(today), 1);
            TimeRange::from_days(month_start(last_of_previous), last_of_previous, label)
        }
        NamedPeriod::AllTime => TimeRange {
            start: DateTime::UNIX_EPOCH,
            end: end_of_day(today),
            label: label.to_string(),
        },
    }
}

/// The equal-length window ending the day before `range` starts
pub fn previous(range: &TimeRange) -> TimeRange {
    let duration = range.days_between();
    let last = days_before(range.start.date_naive(), 1);
    let first = days_before(last, duration);
    TimeRange::from_days(first, last, format!("previous_{}", range.label))
}

/// `day - days`, saturating at the first representable date
fn days_before(day: NaiveDate, days: i64) -> NaiveDate {
    day.checked_sub_signed(Duration::days(days))
        .unwrap_or(NaiveDate::MIN)
}

/// Most recent Sunday on or before `day`
fn week_start(day: NaiveDate) -> NaiveDate {
    days_before(day, day.weekday().num_days_from_sunday() as i64)
}

fn month_start(day: NaiveDate) -> NaiveDate {
    days_before(day, day.day0() as i64)
}
