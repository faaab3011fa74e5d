//! Dashboard analytics endpoints
//!
//! Both endpoints accept `startDate`/`endDate` (ISO-8601) or a named
//! `period`, and answer with the current period next to the previous one.

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::extractors::ValidatedQuery;
use crate::api::types::ApiError;
use crate::domain::AnalyticsService;

use types::{AnalyticsQuery, OrdersSummaryDto, UsersAnalyticsDto};

/// Shared state for Analytics API endpoints
#[derive(Clone)]
pub struct AnalyticsApiState {
    pub analytics: Arc<AnalyticsService>,
}

/// Build Analytics API routes (absolute paths, merged at the root)
pub fn routes(analytics: Arc<AnalyticsService>) -> Router<()> {
    let state = AnalyticsApiState { analytics };

    Router::new()
        .route("/admin/orders/analytics/summary", get(orders_summary))
        .route("/admin/users/analytics", get(users_analytics))
        .with_state(state)
}

/// Order count and revenue for a period compared with the previous one
#[utoipa::path(
    get,
    path = "/admin/orders/analytics/summary",
    tag = "analytics",
    params(
        ("startDate" = Option<String>, Query, description = "Range start (ISO-8601)"),
        ("endDate" = Option<String>, Query, description = "Range end (ISO-8601)"),
        ("period" = Option<String>, Query, description = "Named period, used when no dates are given")
    ),
    responses(
        (status = 200, description = "Orders summary", body = OrdersSummaryDto),
        (status = 500, description = "Aggregation failed")
    )
)]
pub async fn orders_summary(
    State(state): State<AnalyticsApiState>,
    ValidatedQuery(query): ValidatedQuery<AnalyticsQuery>,
) -> Result<Json<OrdersSummaryDto>, ApiError> {
    let summary = state
        .analytics
        .orders_summary(&query.to_request())
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(summary.into()))
}

/// New users for a period compared with the previous one
#[utoipa::path(
    get,
    path = "/admin/users/analytics",
    tag = "analytics",
    params(
        ("startDate" = Option<String>, Query, description = "Range start (ISO-8601)"),
        ("endDate" = Option<String>, Query, description = "Range end (ISO-8601)"),
        ("period" = Option<String>, Query, description = "Named period, used when no dates are given")
    ),
    responses(
        (status = 200, description = "User analytics", body = UsersAnalyticsDto),
        (status = 500, description = "Aggregation failed")
    )
)]
pub async fn users_analytics(
    State(state): State<AnalyticsApiState>,
    ValidatedQuery(query): ValidatedQuery<AnalyticsQuery>,
) -> Result<Json<UsersAnalyticsDto>, ApiError> {
    let analytics = state
        .analytics
        .users_analytics(&query.to_request())
        .await
        .map_err(ApiError::from_data)?;

    Ok(Json(analytics.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::test_support::{send, test_database};
    use crate::data::SqliteService;
    use crate::data::sqlite::repositories::{order, product, user};
    use crate::data::types::{NewOrderItem, NewProduct, OrderStatus, UserRole};
    use crate::domain::analytics::FixedClock;
    use crate::domain::analytics::MAX_RANGE_DAYS;
    use axum::http::StatusCode;
    use chrono::{DateTime, Utc};
    use serde_json::json;

    fn at(s: &str) -> i64 {
        s.parse::<DateTime<Utc>>().unwrap().timestamp()
    }

    fn app(database: &SqliteService) -> Router {
        let clock = FixedClock("2024-04-10T15:00:00Z".parse().unwrap());
        let service = AnalyticsService::new(Arc::new(database.aggregates()), Arc::new(clock));
        routes(Arc::new(service))
    }

    async fn backdate(database: &SqliteService, table: &str, id: &str, when: &str) {
        sqlx::query(&format!("UPDATE {table} SET created_at = ? WHERE id = ?"))
            .bind(at(when))
            .bind(id)
            .execute(database.pool())
            .await
            .unwrap();
    }

    async fn seed(database: &SqliteService) {
        let pool = database.pool();
        let ana = user::create_user(pool, "ana@example.com", "Ana", UserRole::Customer)
            .await
            .unwrap();
        let bo = user::create_user(pool, "bo@example.com", "Bo", UserRole::Admin)
            .await
            .unwrap();
        backdate(database, "users", &ana.id, "2024-04-09T10:00:00Z").await;
        backdate(database, "users", &bo.id, "2024-03-01T10:00:00Z").await;

        let mug = product::create_product(
            pool,
            NewProduct {
                name: "Mug",
                description: None,
                category: None,
                price: 5.0,
                stock: 100,
            },
        )
        .await
        .unwrap();

        let placed = [
            (2, "2024-04-08T12:00:00Z"),
            (1, "2024-04-10T09:00:00Z"),
            (1, "2024-04-10T10:00:00Z"),
            (1, "2024-04-06T08:00:00Z"),
        ];
        let mut ids = Vec::new();
        for (quantity, when) in placed {
            let items = [NewOrderItem {
                product_id: mug.id.clone(),
                quantity,
            }];
            let created = order::create_order(pool, &ana.id, &items).await.unwrap();
            backdate(database, "orders", &created.order.id, when).await;
            ids.push(created.order.id);
        }
        order::update_status(pool, &ids[2], OrderStatus::Cancelled)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_orders_summary_explicit_range() {
        let database = test_database().await;
        seed(&database).await;

        let (status, body) = send(
            app(&database),
            "GET",
            "/admin/orders/analytics/summary?startDate=2024-04-08&endDate=2024-04-10",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(body["period"]["start"], "2024-04-08T00:00:00Z");
        assert_eq!(body["period"]["end"], "2024-04-10T23:59:59.999Z");
        assert_eq!(body["previousPeriod"]["start"], "2024-04-05T00:00:00Z");
        assert_eq!(body["previousPeriod"]["end"], "2024-04-07T23:59:59.999Z");

        assert_eq!(body["orders"], json!({"total": 3.0, "previous": 1.0, "changePercent": 200.0, "trend": [1.0, 0.0, 2.0]}));
        assert_eq!(body["revenue"], json!({"total": 15.0, "previous": 5.0, "changePercent": 200.0, "trend": [10.0, 0.0, 5.0]}));
        assert_eq!(body["averageOrderValue"], 7.5);

        let by_status = body["byStatus"].as_array().unwrap();
        assert_eq!(by_status.len(), 5);
        assert_eq!(by_status[0], json!({"status": "pending", "count": 2}));
        assert_eq!(by_status[4], json!({"status": "cancelled", "count": 1}));
    }

    #[tokio::test]
    async fn test_orders_summary_empty_store() {
        let database = test_database().await;

        let (status, body) = send(
            app(&database),
            "GET",
            "/admin/orders/analytics/summary?period=today",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["period"]["label"], "today");
        assert_eq!(body["period"]["start"], "2024-04-10T00:00:00Z");
        assert_eq!(body["orders"]["trend"], json!([0.0]));
        assert!(body["orders"]["changePercent"].is_null());
        assert_eq!(body["averageOrderValue"], 0.0);
    }

    #[tokio::test]
    async fn test_orders_summary_default_window() {
        let database = test_database().await;

        let (_, body) = send(app(&database), "GET", "/admin/orders/analytics/summary", None).await;
        assert_eq!(body["period"]["label"], "custom");
        assert_eq!(body["orders"]["trend"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_users_analytics_this_week() {
        let database = test_database().await;
        seed(&database).await;

        let (status, body) = send(
            app(&database),
            "GET",
            "/admin/users/analytics?period=this_week",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["period"]["label"], "this_week");
        assert_eq!(body["period"]["start"], "2024-04-07T00:00:00Z");
        assert_eq!(body["newUsers"]["trend"], json!([0.0, 0.0, 1.0, 0.0]));
        assert_eq!(body["newUsers"]["total"], 1.0);
        assert_eq!(body["newUsers"]["previous"], 0.0);
        assert_eq!(body["newUsers"]["changePercent"], 100.0);
        assert_eq!(body["totalUsers"], 2);
        assert_eq!(
            body["byRole"],
            json!([{"role": "admin", "count": 1}, {"role": "customer", "count": 1}])
        );
    }

    #[tokio::test]
    async fn test_extreme_dates_fall_back_to_default_window() {
        let database = test_database().await;
        seed(&database).await;

        for query in [
            "endDate=%2B262142-12-31",
            "startDate=-262143-01-01",
            "startDate=-100000-01-01&endDate=%2B100000-01-01",
        ] {
            let uri = format!("/admin/orders/analytics/summary?{query}");
            let (status, body) = send(app(&database), "GET", &uri, None).await;
            assert_eq!(status, StatusCode::OK, "{query}");
            assert_eq!(body["period"]["start"], "2024-04-04T00:00:00Z", "{query}");
            assert_eq!(body["period"]["end"], "2024-04-10T23:59:59.999Z", "{query}");
            assert_eq!(body["orders"]["trend"].as_array().unwrap().len(), 7);
        }
    }

    #[tokio::test]
    async fn test_widest_accepted_range_is_bounded() {
        let database = test_database().await;
        seed(&database).await;

        let (status, body) = send(
            app(&database),
            "GET",
            "/admin/users/analytics?startDate=0000-01-01&endDate=9999-12-31",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["period"]["end"], "9999-12-31T23:59:59.999Z");
        assert_eq!(
            body["newUsers"]["trend"].as_array().unwrap().len(),
            MAX_RANGE_DAYS as usize
        );
        assert_eq!(body["newUsers"]["total"], 0.0);
    }

    #[tokio::test]
    async fn test_storage_failure_is_internal_error() {
        let database = test_database().await;
        let router = app(&database);
        database.pool().close().await;

        let (status, body) = send(router, "GET", "/admin/users/analytics", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal_error");
    }
}
