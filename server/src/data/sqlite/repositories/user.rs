//! User repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{ListUsersParams, UserRole, UserRow, UserUpdate, page_offset};

type UserTuple = (String, String, String, String, i64, i64);

const USER_COLUMNS: &str = "id, email, name, role, created_at, updated_at";

fn user_from_tuple(
    (id, email, name, role, created_at, updated_at): UserTuple,
) -> UserRow {
    UserRow {
        id,
        email,
        name,
        role: UserRole::parse(&role).unwrap_or_default(),
        created_at,
        updated_at,
    }
}

/// Create a new user with a generated CUID2 ID
///
/// Returns `Conflict` when the email is already registered.
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    name: &str,
    role: UserRole,
) -> Result<UserRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();
    let email = email.trim().to_lowercase();

    sqlx::query(
        "INSERT INTO users (id, email, name, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&email)
    .bind(name)
    .bind(role.as_str())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| SqliteError::unique_or(e, format!("Email {} is already registered", email)))?;

    Ok(UserRow {
        id,
        email,
        name: name.to_string(),
        role,
        created_at: now,
        updated_at: now,
    })
}

/// Get a user by ID
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<Option<UserRow>, SqliteError> {
    let row = sqlx::query_as::<_, UserTuple>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(user_from_tuple))
}

/// Get a user by email (case-insensitive)
pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<UserRow>, SqliteError> {
    let row = sqlx::query_as::<_, UserTuple>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
    ))
    .bind(email.trim().to_lowercase())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(user_from_tuple))
}

/// List users, newest first, with the total matching count
pub async fn list_users(
    pool: &SqlitePool,
    params: &ListUsersParams,
) -> Result<(Vec<UserRow>, u64), SqliteError> {
    let role = params.role.map(|r| r.as_str());

    let rows = sqlx::query_as::<_, UserTuple>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE (?1 IS NULL OR role = ?1)
        ORDER BY created_at DESC, id
        LIMIT ?2 OFFSET ?3
        "#
    ))
    .bind(role)
    .bind(params.limit as i64)
    .bind(page_offset(params.page, params.limit))
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE (?1 IS NULL OR role = ?1)")
        .bind(role)
        .fetch_one(pool)
        .await?;

    Ok((
        rows.into_iter().map(user_from_tuple).collect(),
        total.0 as u64,
    ))
}

/// Update name and/or role; returns the updated row, `None` if the user does not exist
pub async fn update_user(
    pool: &SqlitePool,
    id: &str,
    update: UserUpdate<'_>,
) -> Result<Option<UserRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        r#"
        UPDATE users
        SET name = COALESCE(?, name),
            role = COALESCE(?, role),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(update.name)
    .bind(update.role.map(|r| r.as_str()))
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_user(pool, id).await
}

/// Delete a user and (by cascade) their orders; returns whether a row was removed
pub async fn delete_user(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
