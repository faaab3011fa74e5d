//! Trend windowing and period comparison for the admin dashboard
//!
//! - `clock` - Injected time source
//! - `period` - Period resolution and previous-period derivation
//! - `trend` - Dense per-day series from sparse aggregation rows
//! - `change` - Change-percent between two periods
//! - `service` - Orders and users analytics built on the above

mod change;
mod clock;
mod period;
mod service;
mod trend;

pub use change::{PeriodComparison, ZERO_BASELINE_CHANGE, change_percent};
pub use clock::{Clock, FixedClock, SystemClock};
pub use period::{
    CUSTOM_LABEL, DEFAULT_WINDOW_DAYS, MAX_RANGE_DAYS, NamedPeriod, PeriodRequest, TimeRange,
    days_between, end_of_day, previous, resolve, start_of_day,
};
pub use service::{AnalyticsService, MetricSeries, OrdersSummary, UsersAnalytics};
pub use trend::{DAY_KEY_FORMAT, DailyBucket, Trend, fill, to_number_or_zero};
