//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{analytics, health, orders, products, users};
use crate::api::types::PaginationMeta;
use crate::data::types::{OrderStatus, UserRole};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ShopDesk API",
        version = env!("CARGO_PKG_VERSION"),
        description = "E-commerce administration backend"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "products", description = "Product catalogue"),
        (name = "users", description = "User administration"),
        (name = "orders", description = "Order management"),
        (name = "analytics", description = "Dashboard analytics with period comparison")
    ),
    paths(
        // Health
        health::health,
        // Products
        products::list_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        // Users
        users::list_users,
        users::create_user,
        users::get_user,
        users::update_user,
        users::delete_user,
        // Orders
        orders::list_orders,
        orders::create_order,
        orders::get_order,
        orders::update_order_status,
        orders::delete_order,
        // Analytics
        analytics::orders_summary,
        analytics::users_analytics,
    ),
    components(schemas(
        PaginationMeta,
        OrderStatus,
        UserRole,
        health::HealthResponse,
        products::types::ProductDto,
        products::types::CreateProductRequest,
        products::types::UpdateProductRequest,
        products::types::ListProductsQuery,
        users::types::UserDto,
        users::types::CreateUserRequest,
        users::types::UpdateUserRequest,
        users::types::ListUsersQuery,
        orders::types::OrderDto,
        orders::types::OrderItemDto,
        orders::types::OrderDetailDto,
        orders::types::OrderItemRequest,
        orders::types::CreateOrderRequest,
        orders::types::UpdateOrderStatusRequest,
        orders::types::ListOrdersQuery,
        analytics::types::AnalyticsQuery,
        analytics::types::PeriodDto,
        analytics::types::MetricDto,
        analytics::types::StatusCountDto,
        analytics::types::OrdersSummaryDto,
        analytics::types::RoleCountDto,
        analytics::types::UsersAnalyticsDto,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>ShopDesk API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({ url: "/api/openapi.json", dom_id: '#swagger-ui' });
        };
    </script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_analytics_paths() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/admin/orders/analytics/summary"));
        assert!(paths.contains_key("/admin/users/analytics"));
        assert!(paths.contains_key("/admin/orders/{id}/status"));
    }
}
