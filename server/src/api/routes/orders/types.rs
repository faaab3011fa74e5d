//! Order API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::types::{default_limit, default_page, validate_limit, validate_page};
use crate::data::types::{NewOrderItem, OrderItemRow, OrderRow, OrderStatus, OrderWithItems};

fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
}

/// Order DTO for list responses
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDto {
    pub id: String,
    pub user_id: String,
    pub status: OrderStatus,
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderRow> for OrderDto {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            status: row.status,
            total: row.total,
            created_at: timestamp(row.created_at),
            updated_at: timestamp(row.updated_at),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemDto {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
}

impl From<OrderItemRow> for OrderItemDto {
    fn from(row: OrderItemRow) -> Self {
        Self {
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

/// Order with its line items
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetailDto {
    #[serde(flatten)]
    pub order: OrderDto,
    pub items: Vec<OrderItemDto>,
}

impl From<OrderWithItems> for OrderDetailDto {
    fn from(value: OrderWithItems) -> Self {
        Self {
            order: OrderDto::from(value.order),
            items: value.items.into_iter().map(OrderItemDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemRequest {
    #[validate(length(min = 1, max = 64, message = "Product ID must be 1-64 characters"))]
    pub product_id: String,

    #[validate(range(min = 1, max = 1_000_000, message = "Quantity must be 1-1000000"))]
    pub quantity: i64,
}

/// Request body for placing an order
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 64, message = "User ID must be 1-64 characters"))]
    pub user_id: String,

    #[validate(length(min = 1, max = 100, message = "Order must have 1-100 items"), nested)]
    pub items: Vec<OrderItemRequest>,
}

impl CreateOrderRequest {
    pub fn new_items(&self) -> Vec<NewOrderItem> {
        self.items
            .iter()
            .map(|item| NewOrderItem {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
            })
            .collect()
    }
}

/// Request body for moving an order to another status
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Query params for listing orders
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListOrdersQuery {
    #[serde(default = "default_page")]
    #[validate(custom(function = "validate_page"))]
    pub page: u32,

    #[serde(default = "default_limit")]
    #[validate(custom(function = "validate_limit"))]
    pub limit: u32,

    pub status: Option<OrderStatus>,

    pub user_id: Option<String>,
}
