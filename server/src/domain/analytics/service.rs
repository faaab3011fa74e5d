//! Dashboard analytics over resolved periods
//!
//! Each call resolves the requested period against the injected clock,
//! derives the equal-length previous window, and issues the current and
//! previous aggregation queries concurrently.

use std::sync::Arc;

use crate::data::error::DataError;
use crate::data::traits::{AggregateSource, Metric, RoleCount, StatusCount};
use crate::data::types::OrderStatus;

use super::change::PeriodComparison;
use super::clock::Clock;
use super::period::{self, NamedPeriod, PeriodRequest, TimeRange};
use super::trend::{self, Trend};

/// Comparison of one metric plus its dense trend over the current range
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub comparison: PeriodComparison,
    pub trend: Trend,
}

#[derive(Debug, Clone)]
pub struct OrdersSummary {
    pub range: TimeRange,
    pub previous_range: TimeRange,
    pub orders: MetricSeries,
    pub revenue: MetricSeries,
    /// Revenue divided by non-cancelled orders, 0 when there are none
    pub average_order_value: f64,
    /// One entry per status, zero counts included
    pub by_status: Vec<StatusCount>,
}

#[derive(Debug, Clone)]
pub struct UsersAnalytics {
    pub range: TimeRange,
    pub previous_range: TimeRange,
    pub new_users: MetricSeries,
    pub total_users: u64,
    pub by_role: Vec<RoleCount>,
}

pub struct AnalyticsService {
    source: Arc<dyn AggregateSource>,
    clock: Arc<dyn Clock>,
    default_period: Option<NamedPeriod>,
}

impl AnalyticsService {
    pub fn new(source: Arc<dyn AggregateSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            default_period: None,
        }
    }

    /// Period used when a request names neither dates nor a label
    pub fn with_default_period(mut self, period: Option<NamedPeriod>) -> Self {
        self.default_period = period;
        self
    }

    /// Resolve a request, applying the configured default when it is empty
    pub fn resolve(&self, request: &PeriodRequest) -> TimeRange {
        let request = match (request, self.default_period) {
            (PeriodRequest::Explicit { start: None, end: None }, Some(default)) => {
                PeriodRequest::Named(default)
            }
            _ => request.clone(),
        };
        period::resolve(&request, self.clock.as_ref())
    }

    async fn metric_series(
        &self,
        metric: Metric,
        range: &TimeRange,
        previous: &TimeRange,
    ) -> Result<MetricSeries, DataError> {
        let (buckets, current_total, previous_total) = tokio::try_join!(
            self.source.daily(metric, range),
            self.source.total(metric, range),
            self.source.total(metric, previous),
        )?;

        Ok(MetricSeries {
            comparison: PeriodComparison::new(current_total, previous_total),
            trend: trend::fill(&buckets, range),
        })
    }

    pub async fn orders_summary(&self, request: &PeriodRequest) -> Result<OrdersSummary, DataError> {
        let range = self.resolve(request);
        let previous_range = period::previous(&range);

        tracing::debug!(
            period = range.label(),
            start = %range.start(),
            end = %range.end(),
            "Computing orders summary"
        );

        let (orders, revenue, status_counts) = tokio::try_join!(
            self.metric_series(Metric::Orders, &range, &previous_range),
            self.metric_series(Metric::Revenue, &range, &previous_range),
            self.source.order_status_counts(&range),
        )?;

        let by_status = full_status_breakdown(&status_counts);
        let billable: u64 = by_status
            .iter()
            .filter(|c| c.status.is_billable())
            .map(|c| c.count)
            .sum();
        let average_order_value = if billable == 0 {
            0.0
        } else {
            revenue.comparison.current / billable as f64
        };

        Ok(OrdersSummary {
            range,
            previous_range,
            orders,
            revenue,
            average_order_value,
            by_status,
        })
    }

    pub async fn users_analytics(
        &self,
        request: &PeriodRequest,
    ) -> Result<UsersAnalytics, DataError> {
        let range = self.resolve(request);
        let previous_range = period::previous(&range);

        let (new_users, totals) = tokio::try_join!(
            self.metric_series(Metric::NewUsers, &range, &previous_range),
            self.source.user_totals(),
        )?;

        Ok(UsersAnalytics {
            range,
            previous_range,
            new_users,
            total_users: totals.total,
            by_role: totals.by_role,
        })
    }
}

/// Counts for every status in lifecycle order, missing ones as zero
fn full_status_breakdown(counts: &[StatusCount]) -> Vec<StatusCount> {
    OrderStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: counts
                .iter()
                .filter(|c| c.status == *status)
                .map(|c| c.count)
                .sum(),
        })
        .collect()
}
