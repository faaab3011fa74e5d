//! Grouped aggregation queries for the analytics dashboard
//!
//! Day buckets are UTC calendar days derived from the unix-second
//! `created_at` columns. Values come back as TEXT and are coerced with
//! `to_number_or_zero`, so NULL sums and driver quirks turn into 0.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::traits::{Metric, RoleCount, StatusCount, UserTotals};
use crate::data::types::{OrderStatus, UserRole};
use crate::domain::analytics::{DailyBucket, TimeRange, to_number_or_zero};

/// Table, aggregate expression and extra predicate for a metric
fn metric_source(metric: Metric) -> (&'static str, &'static str, &'static str) {
    match metric {
        Metric::Orders => ("orders", "COUNT(*)", ""),
        Metric::Revenue => ("orders", "SUM(total)", "AND status != 'cancelled'"),
        Metric::NewUsers => ("users", "COUNT(*)", ""),
    }
}

/// Inclusive unix-second bounds of a range
fn bounds(range: &TimeRange) -> (i64, i64) {
    (range.start().timestamp(), range.end().timestamp())
}

/// One bucket per day with data, ascending
pub async fn daily(
    pool: &SqlitePool,
    metric: Metric,
    range: &TimeRange,
) -> Result<Vec<DailyBucket>, SqliteError> {
    let (table, expr, extra) = metric_source(metric);
    let (start, end) = bounds(range);

    let sql = format!(
        r#"
        SELECT date(created_at, 'unixepoch') AS day, CAST({expr} AS TEXT)
        FROM {table}
        WHERE created_at BETWEEN ? AND ? {extra}
        GROUP BY day
        ORDER BY day
        "#
    );

    let rows = sqlx::query_as::<_, (String, Option<String>)>(&sql)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

    tracing::trace!(%metric, range = range.label(), buckets = rows.len(), "Daily aggregate");

    Ok(rows
        .into_iter()
        .map(|(day, value)| DailyBucket::from_raw(day, value.as_deref()))
        .collect())
}

/// Sum of a metric over the whole range
pub async fn total(pool: &SqlitePool, metric: Metric, range: &TimeRange) -> Result<f64, SqliteError> {
    let (table, expr, extra) = metric_source(metric);
    let (start, end) = bounds(range);

    let sql = format!(
        "SELECT CAST({expr} AS TEXT) FROM {table} WHERE created_at BETWEEN ? AND ? {extra}"
    );

    let (value,): (Option<String>,) = sqlx::query_as(&sql)
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await?;

    Ok(to_number_or_zero(value.as_deref()))
}

/// Orders in the range grouped by status; statuses without orders are omitted
pub async fn order_status_counts(
    pool: &SqlitePool,
    range: &TimeRange,
) -> Result<Vec<StatusCount>, SqliteError> {
    let (start, end) = bounds(range);

    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT status, COUNT(*)
        FROM orders
        WHERE created_at BETWEEN ? AND ?
        GROUP BY status
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(status, count)| {
            let parsed = OrderStatus::parse(&status);
            if parsed.is_none() {
                tracing::warn!(%status, "Skipping unknown order status");
            }
            parsed.map(|status| StatusCount {
                status,
                count: count.max(0) as u64,
            })
        })
        .collect())
}

/// Total user count with a per-role breakdown
pub async fn user_totals(pool: &SqlitePool) -> Result<UserTotals, SqliteError> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT role, COUNT(*) FROM users GROUP BY role ORDER BY role",
    )
    .fetch_all(pool)
    .await?;

    let by_role: Vec<RoleCount> = rows
        .into_iter()
        .filter_map(|(role, count)| {
            UserRole::parse(&role).map(|role| RoleCount {
                role,
                count: count.max(0) as u64,
            })
        })
        .collect();

    Ok(UserTotals {
        total: by_role.iter().map(|r| r.count).sum(),
        by_role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::test_pool;
    use chrono::NaiveDate;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ts(s: &str) -> i64 {
        chrono::DateTime::parse_from_rfc3339(s).unwrap().timestamp()
    }

    async fn insert_user(pool: &SqlitePool, id: &str, role: &str, created: &str) {
        sqlx::query(
            "INSERT INTO users (id, email, name, role, created_at, updated_at) VALUES (?, ?, 'n', ?, ?, ?)",
        )
        .bind(id)
        .bind(format!("{id}@example.com"))
        .bind(role)
        .bind(ts(created))
        .bind(ts(created))
        .execute(pool)
        .await
        .unwrap();
    }

    async fn insert_order(pool: &SqlitePool, id: &str, status: &str, total: f64, created: &str) {
        sqlx::query(
            "INSERT INTO orders (id, user_id, status, total, created_at, updated_at) VALUES (?, 'u1', ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(status)
        .bind(total)
        .bind(ts(created))
        .bind(ts(created))
        .execute(pool)
        .await
        .unwrap();
    }

    async fn seeded() -> SqlitePool {
        let pool = test_pool().await;
        insert_user(&pool, "u1", "customer", "2024-03-30T10:00:00Z").await;
        insert_user(&pool, "u2", "customer", "2024-04-01T08:00:00Z").await;
        insert_user(&pool, "u3", "admin", "2024-04-03T23:59:59Z").await;

        insert_order(&pool, "o1", "delivered", 10.0, "2024-04-01T00:00:00Z").await;
        insert_order(&pool, "o2", "pending", 15.5, "2024-04-01T21:30:00Z").await;
        insert_order(&pool, "o3", "cancelled", 99.0, "2024-04-03T12:00:00Z").await;
        insert_order(&pool, "o4", "shipped", 20.0, "2024-04-03T23:59:59Z").await;
        insert_order(&pool, "o5", "pending", 5.0, "2024-04-04T00:00:00Z").await;
        pool
    }

    fn april_1_to_3() -> TimeRange {
        TimeRange::from_days(day("2024-04-01"), day("2024-04-03"), "custom")
    }

    #[tokio::test]
    async fn test_daily_orders_grouped_by_utc_day() {
        let pool = seeded().await;
        let buckets = daily(&pool, Metric::Orders, &april_1_to_3()).await.unwrap();
        assert_eq!(
            buckets,
            vec![
                DailyBucket::new("2024-04-01", 2.0),
                DailyBucket::new("2024-04-03", 2.0),
            ]
        );
    }

    #[tokio::test]
    async fn test_daily_revenue_excludes_cancelled() {
        let pool = seeded().await;
        let buckets = daily(&pool, Metric::Revenue, &april_1_to_3()).await.unwrap();
        assert_eq!(
            buckets,
            vec![
                DailyBucket::new("2024-04-01", 25.5),
                DailyBucket::new("2024-04-03", 20.0),
            ]
        );
    }

    #[tokio::test]
    async fn test_daily_new_users() {
        let pool = seeded().await;
        let buckets = daily(&pool, Metric::NewUsers, &april_1_to_3()).await.unwrap();
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[1].day, "2024-04-03");
    }

    #[tokio::test]
    async fn test_totals() {
        let pool = seeded().await;
        let range = april_1_to_3();
        assert_eq!(total(&pool, Metric::Orders, &range).await.unwrap(), 4.0);
        assert_eq!(total(&pool, Metric::Revenue, &range).await.unwrap(), 45.5);
        assert_eq!(total(&pool, Metric::NewUsers, &range).await.unwrap(), 2.0);
    }

    #[tokio::test]
    async fn test_empty_range_yields_zero() {
        let pool = seeded().await;
        let range = TimeRange::from_days(day("2023-01-01"), day("2023-01-31"), "custom");
        assert!(daily(&pool, Metric::Revenue, &range).await.unwrap().is_empty());
        // SUM over no rows is NULL
        assert_eq!(total(&pool, Metric::Revenue, &range).await.unwrap(), 0.0);
        assert_eq!(total(&pool, Metric::Orders, &range).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_order_status_counts() {
        let pool = seeded().await;
        let mut counts = order_status_counts(&pool, &april_1_to_3()).await.unwrap();
        counts.sort_by_key(|c| c.status.as_str());
        let pairs: Vec<_> = counts.iter().map(|c| (c.status, c.count)).collect();
        assert_eq!(
            pairs,
            vec![
                (OrderStatus::Cancelled, 1),
                (OrderStatus::Delivered, 1),
                (OrderStatus::Pending, 1),
                (OrderStatus::Shipped, 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_user_totals() {
        let pool = seeded().await;
        let totals = user_totals(&pool).await.unwrap();
        assert_eq!(totals.total, 3);
        assert_eq!(
            totals.by_role,
            vec![
                RoleCount {
                    role: UserRole::Admin,
                    count: 1
                },
                RoleCount {
                    role: UserRole::Customer,
                    count: 2
                },
            ]
        );
    }
}
