//! Order management endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};

use crate::api::extractors::{IdPath, ValidatedJson, ValidatedQuery};
use crate::api::types::{ApiError, PaginatedResponse};
use crate::data::SqliteService;
use crate::data::sqlite::repositories::order;
use crate::data::types::ListOrdersParams;

use types::{
    CreateOrderRequest, ListOrdersQuery, OrderDetailDto, OrderDto, UpdateOrderStatusRequest,
};

/// Shared state for Orders API endpoints
#[derive(Clone)]
pub struct OrdersApiState {
    pub database: Arc<SqliteService>,
}

/// Build Orders API routes
pub fn routes(database: Arc<SqliteService>) -> Router<()> {
    let state = OrdersApiState { database };

    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/{id}", get(get_order).delete(delete_order))
        .route("/{id}/status", patch(update_order_status))
        .with_state(state)
}

fn order_not_found(id: &str) -> ApiError {
    ApiError::not_found("ORDER_NOT_FOUND", format!("Order not found: {}", id))
}

/// List orders, newest first
#[utoipa::path(
    get,
    path = "/admin/orders",
    tag = "orders",
    params(
        ("page" = Option<u32>, Query, description = "Page number (1-100)"),
        ("limit" = Option<u32>, Query, description = "Items per page (1-500)"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("user_id" = Option<String>, Query, description = "Filter by customer")
    ),
    responses(
        (status = 200, description = "List of orders with pagination metadata")
    )
)]
pub async fn list_orders(
    State(state): State<OrdersApiState>,
    ValidatedQuery(query): ValidatedQuery<ListOrdersQuery>,
) -> Result<Json<PaginatedResponse<OrderDto>>, ApiError> {
    let params = ListOrdersParams {
        status: query.status,
        user_id: query.user_id,
        page: query.page,
        limit: query.limit,
    };

    let (rows, total) = order::list_orders(state.database.pool(), &params)
        .await
        .map_err(ApiError::from_sqlite)?;

    let data = rows.into_iter().map(OrderDto::from).collect();
    Ok(Json(PaginatedResponse::new(
        data,
        params.page,
        params.limit,
        total,
    )))
}

/// Place an order
#[utoipa::path(
    post,
    path = "/admin/orders",
    tag = "orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderDetailDto),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Unknown user or product"),
        (status = 409, description = "Insufficient stock")
    )
)]
pub async fn create_order(
    State(state): State<OrdersApiState>,
    ValidatedJson(body): ValidatedJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderDetailDto>), ApiError> {
    let created = order::create_order(state.database.pool(), &body.user_id, &body.new_items())
        .await
        .map_err(ApiError::from_sqlite)?;

    Ok((StatusCode::CREATED, Json(OrderDetailDto::from(created))))
}

/// Get an order with its items
#[utoipa::path(
    get,
    path = "/admin/orders/{id}",
    tag = "orders",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order details", body = OrderDetailDto),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    State(state): State<OrdersApiState>,
    IdPath(id): IdPath,
) -> Result<Json<OrderDetailDto>, ApiError> {
    let found = order::get_order(state.database.pool(), &id)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| order_not_found(&id))?;

    Ok(Json(OrderDetailDto::from(found)))
}

/// Move an order to another status
#[utoipa::path(
    patch,
    path = "/admin/orders/{id}/status",
    tag = "orders",
    params(("id" = String, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderDetailDto),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Cancelled orders cannot be reopened")
    )
)]
pub async fn update_order_status(
    State(state): State<OrdersApiState>,
    IdPath(id): IdPath,
    ValidatedJson(body): ValidatedJson<UpdateOrderStatusRequest>,
) -> Result<Json<OrderDetailDto>, ApiError> {
    let updated = order::update_status(state.database.pool(), &id, body.status)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| order_not_found(&id))?;

    Ok(Json(OrderDetailDto::from(updated)))
}

/// Delete an order
#[utoipa::path(
    delete,
    path = "/admin/orders/{id}",
    tag = "orders",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn delete_order(
    State(state): State<OrdersApiState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    let deleted = order::delete_order(state.database.pool(), &id)
        .await
        .map_err(ApiError::from_sqlite)?;

    if !deleted {
        return Err(order_not_found(&id));
    }
    Ok(StatusCode::NO_CONTENT)
}
