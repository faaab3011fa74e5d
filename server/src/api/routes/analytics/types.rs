//! Analytics API types
//!
//! Wire names are camelCase to match the dashboard client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::{OrderStatus, UserRole};
use crate::domain::analytics::{
    MetricSeries, NamedPeriod, OrdersSummary, PeriodRequest, TimeRange, UsersAnalytics,
};
use crate::utils::time::parse_date_param;

/// Query params shared by the analytics endpoints
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    /// ISO-8601 date or datetime; unparseable values are ignored
    #[validate(length(max = 64, message = "startDate must be at most 64 characters"))]
    pub start_date: Option<String>,

    #[validate(length(max = 64, message = "endDate must be at most 64 characters"))]
    pub end_date: Option<String>,

    /// today, yesterday, this_week, last_week, this_month, last_month, all_time
    #[validate(length(max = 32, message = "period must be at most 32 characters"))]
    pub period: Option<String>,
}

impl AnalyticsQuery {
    /// Dates win over a label when either one parses
    pub fn to_request(&self) -> PeriodRequest {
        let start = parse_date_param(self.start_date.as_deref());
        let end = parse_date_param(self.end_date.as_deref());
        if start.is_some() || end.is_some() {
            return PeriodRequest::Explicit { start, end };
        }

        match self.period.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => PeriodRequest::Named(NamedPeriod::from_label(label)),
            _ => PeriodRequest::default(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PeriodDto {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: String,
}

impl From<&TimeRange> for PeriodDto {
    fn from(range: &TimeRange) -> Self {
        Self {
            start: range.start(),
            end: range.end(),
            label: range.label().to_string(),
        }
    }
}

/// Current total, previous-period total, change and dense daily trend
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricDto {
    pub total: f64,
    pub previous: f64,
    /// `null` when both periods are zero
    pub change_percent: Option<f64>,
    pub trend: Vec<f64>,
}

impl From<MetricSeries> for MetricDto {
    fn from(series: MetricSeries) -> Self {
        Self {
            total: series.comparison.current,
            previous: series.comparison.previous,
            change_percent: series.comparison.change_percent,
            trend: series.trend,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusCountDto {
    pub status: OrderStatus,
    pub count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrdersSummaryDto {
    pub period: PeriodDto,
    pub previous_period: PeriodDto,
    pub orders: MetricDto,
    pub revenue: MetricDto,
    pub average_order_value: f64,
    pub by_status: Vec<StatusCountDto>,
}

impl From<OrdersSummary> for OrdersSummaryDto {
    fn from(summary: OrdersSummary) -> Self {
        Self {
            period: PeriodDto::from(&summary.range),
            previous_period: PeriodDto::from(&summary.previous_range),
            orders: summary.orders.into(),
            revenue: summary.revenue.into(),
            average_order_value: summary.average_order_value,
            by_status: summary
                .by_status
                .into_iter()
                .map(|c| StatusCountDto {
                    status: c.status,
                    count: c.count,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleCountDto {
    pub role: UserRole,
    pub count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsersAnalyticsDto {
    pub period: PeriodDto,
    pub previous_period: PeriodDto,
    pub new_users: MetricDto,
    pub total_users: u64,
    pub by_role: Vec<RoleCountDto>,
}

impl From<UsersAnalytics> for UsersAnalyticsDto {
    fn from(analytics: UsersAnalytics) -> Self {
        Self {
            period: PeriodDto::from(&analytics.range),
            previous_period: PeriodDto::from(&analytics.previous_range),
            new_users: analytics.new_users.into(),
            total_users: analytics.total_users,
            by_role: analytics
                .by_role
                .into_iter()
                .map(|c| RoleCountDto {
                    role: c.role,
                    count: c.count,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(start: Option<&str>, end: Option<&str>, period: Option<&str>) -> AnalyticsQuery {
        AnalyticsQuery {
            start_date: start.map(String::from),
            end_date: end.map(String::from),
            period: period.map(String::from),
        }
    }

    #[test]
    fn test_dates_win_over_label() {
        let request = query(Some("2024-04-01"), None, Some("today")).to_request();
        assert!(matches!(
            request,
            PeriodRequest::Explicit {
                start: Some(_),
                end: None
            }
        ));
    }

    #[test]
    fn test_label_used_without_dates() {
        assert_eq!(
            query(None, None, Some("last_month")).to_request(),
            PeriodRequest::Named(NamedPeriod::LastMonth)
        );
    }

    #[test]
    fn test_unknown_label_is_all_time() {
        assert_eq!(
            query(None, None, Some("fortnight")).to_request(),
            PeriodRequest::Named(NamedPeriod::AllTime)
        );
    }

    #[test]
    fn test_unparseable_dates_are_missing() {
        assert_eq!(
            query(Some("yesterday-ish"), Some(""), None).to_request(),
            PeriodRequest::default()
        );
        assert_eq!(
            query(Some("garbage"), None, Some("today")).to_request(),
            PeriodRequest::Named(NamedPeriod::Today)
        );
    }

    #[test]
    fn test_metric_dto_wire_names() {
        let dto = MetricDto {
            total: 0.0,
            previous: 0.0,
            change_percent: None,
            trend: vec![0.0, 0.0],
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json["changePercent"].is_null());
        assert_eq!(json["trend"].as_array().unwrap().len(), 2);
    }
}
