//! AggregateSource implementation for SQLite

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::data::error::DataError;
use crate::data::traits::{AggregateSource, Metric, StatusCount, UserTotals};
use crate::domain::analytics::{DailyBucket, TimeRange};

use super::repositories::aggregate;

/// Aggregation queries over the SQLite store
#[derive(Clone)]
pub struct SqliteAggregates {
    pool: SqlitePool,
}

impl SqliteAggregates {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AggregateSource for SqliteAggregates {
    async fn daily(
        &self,
        metric: Metric,
        range: &TimeRange,
    ) -> Result<Vec<DailyBucket>, DataError> {
        aggregate::daily(&self.pool, metric, range)
            .await
            .map_err(Into::into)
    }

    async fn total(&self, metric: Metric, range: &TimeRange) -> Result<f64, DataError> {
        aggregate::total(&self.pool, metric, range)
            .await
            .map_err(Into::into)
    }

    async fn order_status_counts(&self, range: &TimeRange) -> Result<Vec<StatusCount>, DataError> {
        aggregate::order_status_counts(&self.pool, range)
            .await
            .map_err(Into::into)
    }

    async fn user_totals(&self) -> Result<UserTotals, DataError> {
        aggregate::user_totals(&self.pool)
            .await
            .map_err(Into::into)
    }
}
