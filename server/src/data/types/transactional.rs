//! Row types for the store tables
//!
//! Timestamps are unix seconds, IDs are CUID2 strings.

use serde::{Deserialize, Serialize};

use super::enums::{OrderStatus, UserRole};

// ============================================================================
// User types
// ============================================================================

/// User row from database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Partial update for a user
#[derive(Debug, Clone, Default)]
pub struct UserUpdate<'a> {
    pub name: Option<&'a str>,
    pub role: Option<UserRole>,
}

// ============================================================================
// Product types
// ============================================================================

/// Product row from database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fields for a new product
#[derive(Debug, Clone)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
    pub price: f64,
    pub stock: i64,
}

/// Partial update for a product
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub category: Option<&'a str>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

/// Product list filters
#[derive(Debug, Clone, Default)]
pub struct ListProductsParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
}

// ============================================================================
// Order types
// ============================================================================

/// Order row from database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: String,
    pub user_id: String,
    pub status: OrderStatus,
    pub total: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemRow {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
}

/// Order together with its line items
#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: OrderRow,
    pub items: Vec<OrderItemRow>,
}

/// Requested line for a new order
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: String,
    pub quantity: i64,
}

/// Order list filters
#[derive(Debug, Clone, Default)]
pub struct ListOrdersParams {
    pub status: Option<OrderStatus>,
    pub user_id: Option<String>,
    pub page: u32,
    pub limit: u32,
}

/// User list filters
#[derive(Debug, Clone, Default)]
pub struct ListUsersParams {
    pub role: Option<UserRole>,
    pub page: u32,
    pub limit: u32,
}

/// SQL OFFSET for a 1-based page
pub fn page_offset(page: u32, limit: u32) -> i64 {
    (page.max(1) as i64 - 1) * limit as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 50), 0);
        assert_eq!(page_offset(3, 20), 40);
        assert_eq!(page_offset(0, 20), 0);
    }
}
