//! Product catalogue endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::extractors::{IdPath, ValidatedJson, ValidatedQuery};
use crate::api::types::{ApiError, PaginatedResponse};
use crate::data::SqliteService;
use crate::data::sqlite::repositories::product;
use crate::data::types::ListProductsParams;

use types::{CreateProductRequest, ListProductsQuery, ProductDto, UpdateProductRequest};

/// Shared state for Products API endpoints
#[derive(Clone)]
pub struct ProductsApiState {
    pub database: Arc<SqliteService>,
}

/// Build Products API routes
pub fn routes(database: Arc<SqliteService>) -> Router<()> {
    let state = ProductsApiState { database };

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .with_state(state)
}

fn product_not_found(id: &str) -> ApiError {
    ApiError::not_found("PRODUCT_NOT_FOUND", format!("Product not found: {}", id))
}

/// List products
#[utoipa::path(
    get,
    path = "/admin/products",
    tag = "products",
    params(
        ("page" = Option<u32>, Query, description = "Page number (1-100)"),
        ("limit" = Option<u32>, Query, description = "Items per page (1-500)"),
        ("category" = Option<String>, Query, description = "Filter by category"),
        ("search" = Option<String>, Query, description = "Case-insensitive name search")
    ),
    responses(
        (status = 200, description = "List of products with pagination metadata")
    )
)]
pub async fn list_products(
    State(state): State<ProductsApiState>,
    ValidatedQuery(query): ValidatedQuery<ListProductsQuery>,
) -> Result<Json<PaginatedResponse<ProductDto>>, ApiError> {
    let params = ListProductsParams {
        category: query.category,
        search: query.search,
        page: query.page,
        limit: query.limit,
    };

    let (rows, total) = product::list_products(state.database.pool(), &params)
        .await
        .map_err(ApiError::from_sqlite)?;

    let data = rows.into_iter().map(ProductDto::from).collect();
    Ok(Json(PaginatedResponse::new(
        data,
        params.page,
        params.limit,
        total,
    )))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/admin/products",
    tag = "products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductDto),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_product(
    State(state): State<ProductsApiState>,
    ValidatedJson(body): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    let row = product::create_product(state.database.pool(), body.as_new())
        .await
        .map_err(ApiError::from_sqlite)?;

    Ok((StatusCode::CREATED, Json(ProductDto::from(row))))
}

/// Get a single product
#[utoipa::path(
    get,
    path = "/admin/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = ProductDto),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<ProductsApiState>,
    IdPath(id): IdPath,
) -> Result<Json<ProductDto>, ApiError> {
    let row = product::get_product(state.database.pool(), &id)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| product_not_found(&id))?;

    Ok(Json(ProductDto::from(row)))
}

/// Partially update a product
#[utoipa::path(
    patch,
    path = "/admin/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductDto),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    State(state): State<ProductsApiState>,
    IdPath(id): IdPath,
    ValidatedJson(body): ValidatedJson<UpdateProductRequest>,
) -> Result<Json<ProductDto>, ApiError> {
    let row = product::update_product(state.database.pool(), &id, body.as_update())
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| product_not_found(&id))?;

    Ok(Json(ProductDto::from(row)))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/admin/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product is referenced by orders")
    )
)]
pub async fn delete_product(
    State(state): State<ProductsApiState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    let deleted = product::delete_product(state.database.pool(), &id)
        .await
        .map_err(ApiError::from_sqlite)?;

    if !deleted {
        return Err(product_not_found(&id));
    }
    Ok(StatusCode::NO_CONTENT)
}
