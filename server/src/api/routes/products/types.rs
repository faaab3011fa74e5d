//! Product API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::types::{default_limit, default_page, validate_limit, validate_page};
use crate::data::types::{NewProduct, ProductRow, ProductUpdate};

/// Product DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for ProductDto {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            category: row.category,
            price: row.price,
            stock: row.stock,
            created_at: DateTime::from_timestamp(row.created_at, 0).unwrap_or_else(Utc::now),
            updated_at: DateTime::from_timestamp(row.updated_at, 0).unwrap_or_else(Utc::now),
        }
    }
}

/// Request body for creating a product
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: Option<String>,

    #[validate(range(min = 0.0, message = "Price must be >= 0"))]
    pub price: f64,

    #[serde(default)]
    #[validate(range(min = 0, message = "Stock must be >= 0"))]
    pub stock: i64,
}

impl CreateProductRequest {
    pub fn as_new(&self) -> NewProduct<'_> {
        NewProduct {
            name: &self.name,
            description: self.description.as_deref(),
            category: self.category.as_deref(),
            price: self.price,
            stock: self.stock,
        }
    }
}

/// Request body for a partial product update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: Option<String>,

    #[validate(range(min = 0.0, message = "Price must be >= 0"))]
    pub price: Option<f64>,

    #[validate(range(min = 0, message = "Stock must be >= 0"))]
    pub stock: Option<i64>,
}

impl UpdateProductRequest {
    pub fn as_update(&self) -> ProductUpdate<'_> {
        ProductUpdate {
            name: self.name.as_deref(),
            description: self.description.as_deref(),
            category: self.category.as_deref(),
            price: self.price,
            stock: self.stock,
        }
    }
}

/// Query params for listing products
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListProductsQuery {
    #[serde(default = "default_page")]
    #[validate(custom(function = "validate_page"))]
    pub page: u32,

    #[serde(default = "default_limit")]
    #[validate(custom(function = "validate_limit"))]
    pub limit: u32,

    /// Exact category filter
    pub category: Option<String>,

    /// Case-insensitive name search
    #[validate(length(max = 200, message = "Search must be at most 200 characters"))]
    pub search: Option<String>,
}
