//! User administration endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::extractors::{IdPath, ValidatedJson, ValidatedQuery};
use crate::api::types::{ApiError, PaginatedResponse};
use crate::data::SqliteService;
use crate::data::sqlite::repositories::user;
use crate::data::types::ListUsersParams;

use types::{CreateUserRequest, ListUsersQuery, UpdateUserRequest, UserDto};

/// Shared state for Users API endpoints
#[derive(Clone)]
pub struct UsersApiState {
    pub database: Arc<SqliteService>,
}

/// Build Users API routes
pub fn routes(database: Arc<SqliteService>) -> Router<()> {
    let state = UsersApiState { database };

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .with_state(state)
}

fn user_not_found(id: &str) -> ApiError {
    ApiError::not_found("USER_NOT_FOUND", format!("User not found: {}", id))
}

/// List users
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "users",
    params(
        ("page" = Option<u32>, Query, description = "Page number (1-100)"),
        ("limit" = Option<u32>, Query, description = "Items per page (1-500)"),
        ("role" = Option<String>, Query, description = "Filter by role (admin, customer)")
    ),
    responses(
        (status = 200, description = "List of users with pagination metadata")
    )
)]
pub async fn list_users(
    State(state): State<UsersApiState>,
    ValidatedQuery(query): ValidatedQuery<ListUsersQuery>,
) -> Result<Json<PaginatedResponse<UserDto>>, ApiError> {
    let params = ListUsersParams {
        role: query.role,
        page: query.page,
        limit: query.limit,
    };

    let (rows, total) = user::list_users(state.database.pool(), &params)
        .await
        .map_err(ApiError::from_sqlite)?;

    let data = rows.into_iter().map(UserDto::from).collect();
    Ok(Json(PaginatedResponse::new(
        data,
        params.page,
        params.limit,
        total,
    )))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/admin/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<UsersApiState>,
    ValidatedJson(body): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let row = user::create_user(state.database.pool(), &body.email, &body.name, body.role)
        .await
        .map_err(ApiError::from_sqlite)?;

    Ok((StatusCode::CREATED, Json(UserDto::from(row))))
}

/// Get a single user
#[utoipa::path(
    get,
    path = "/admin/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserDto),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<UsersApiState>,
    IdPath(id): IdPath,
) -> Result<Json<UserDto>, ApiError> {
    let row = user::get_user(state.database.pool(), &id)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| user_not_found(&id))?;

    Ok(Json(UserDto::from(row)))
}

/// Update a user's name or role
#[utoipa::path(
    patch,
    path = "/admin/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<UsersApiState>,
    IdPath(id): IdPath,
    ValidatedJson(body): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let row = user::update_user(state.database.pool(), &id, body.as_update())
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| user_not_found(&id))?;

    Ok(Json(UserDto::from(row)))
}

/// Delete a user and their orders
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<UsersApiState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    let deleted = user::delete_user(state.database.pool(), &id)
        .await
        .map_err(ApiError::from_sqlite)?;

    if !deleted {
        return Err(user_not_found(&id));
    }
    Ok(StatusCode::NO_CONTENT)
}
