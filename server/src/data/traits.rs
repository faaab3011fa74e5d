//! Aggregation seam between the analytics core and the store
//!
//! The windowing logic only ever sees [`DailyBucket`]s and scalar totals, so
//! the backing query engine can be swapped (or faked in tests).

use std::fmt;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{OrderStatus, UserRole};
use crate::domain::analytics::{DailyBucket, TimeRange};

/// A per-day aggregable quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Number of orders placed
    Orders,
    /// Sum of order totals, cancelled orders excluded
    Revenue,
    /// Number of accounts created
    NewUsers,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Revenue => "revenue",
            Self::NewUsers => "new_users",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order count for one status
#[derive(Debug, Clone, PartialEq)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: u64,
}

/// User count for one role
#[derive(Debug, Clone, PartialEq)]
pub struct RoleCount {
    pub role: UserRole,
    pub count: u64,
}

/// Whole-store user totals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserTotals {
    pub total: u64,
    pub by_role: Vec<RoleCount>,
}

/// Grouped count/sum queries over the order and user stores
///
/// Ranges are inclusive on both ends. Implementations return one bucket per
/// calendar day that has data, ascending; days without data are omitted.
#[async_trait]
pub trait AggregateSource: Send + Sync {
    /// Per-day values of `metric` within `range`
    async fn daily(&self, metric: Metric, range: &TimeRange)
    -> Result<Vec<DailyBucket>, DataError>;

    /// Sum of `metric` over `range`
    async fn total(&self, metric: Metric, range: &TimeRange) -> Result<f64, DataError>;

    /// Orders within `range` grouped by status
    async fn order_status_counts(&self, range: &TimeRange) -> Result<Vec<StatusCount>, DataError>;

    /// All users, with a per-role breakdown
    async fn user_totals(&self) -> Result<UserTotals, DataError>;
}
