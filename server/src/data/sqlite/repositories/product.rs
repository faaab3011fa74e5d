//! Product repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{ListProductsParams, NewProduct, ProductRow, ProductUpdate, page_offset};

type ProductTuple = (
    String,
    String,
    Option<String>,
    Option<String>,
    f64,
    i64,
    i64,
    i64,
);

const PRODUCT_COLUMNS: &str =
    "id, name, description, category, price, stock, created_at, updated_at";

fn product_from_tuple(
    (id, name, description, category, price, stock, created_at, updated_at): ProductTuple,
) -> ProductRow {
    ProductRow {
        id,
        name,
        description,
        category,
        price,
        stock,
        created_at,
        updated_at,
    }
}

/// Escape `%`, `_` and `\` for use inside a LIKE pattern with `ESCAPE '\'`
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Create a new product with a generated CUID2 ID
pub async fn create_product(
    pool: &SqlitePool,
    product: NewProduct<'_>,
) -> Result<ProductRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO products (id, name, description, category, price, stock, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(product.name)
    .bind(product.description)
    .bind(product.category)
    .bind(product.price)
    .bind(product.stock)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(ProductRow {
        id,
        name: product.name.to_string(),
        description: product.description.map(String::from),
        category: product.category.map(String::from),
        price: product.price,
        stock: product.stock,
        created_at: now,
        updated_at: now,
    })
}

/// Get a product by ID
pub async fn get_product(pool: &SqlitePool, id: &str) -> Result<Option<ProductRow>, SqliteError> {
    let row = sqlx::query_as::<_, ProductTuple>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(product_from_tuple))
}

/// List products ordered by name, with the total matching count
///
/// `category` matches exactly; `search` is a case-insensitive substring of the name.
pub async fn list_products(
    pool: &SqlitePool,
    params: &ListProductsParams,
) -> Result<(Vec<ProductRow>, u64), SqliteError> {
    let category = params.category.as_deref();
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(like_pattern);

    let filter = r#"
        WHERE (?1 IS NULL OR category = ?1)
          AND (?2 IS NULL OR name LIKE ?2 ESCAPE '\')
    "#;

    let rows = sqlx::query_as::<_, ProductTuple>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products {filter} ORDER BY name COLLATE NOCASE, id LIMIT ?3 OFFSET ?4"
    ))
    .bind(category)
    .bind(search.as_deref())
    .bind(params.limit as i64)
    .bind(page_offset(params.page, params.limit))
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM products {filter}"))
        .bind(category)
        .bind(search.as_deref())
        .fetch_one(pool)
        .await?;

    Ok((
        rows.into_iter().map(product_from_tuple).collect(),
        total.0 as u64,
    ))
}

/// Apply a partial update; returns the updated row, `None` if the product does not exist
pub async fn update_product(
    pool: &SqlitePool,
    id: &str,
    update: ProductUpdate<'_>,
) -> Result<Option<ProductRow>, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        r#"
        UPDATE products
        SET name = COALESCE(?, name),
            description = COALESCE(?, description),
            category = COALESCE(?, category),
            price = COALESCE(?, price),
            stock = COALESCE(?, stock),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(update.name)
    .bind(update.description)
    .bind(update.category)
    .bind(update.price)
    .bind(update.stock)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_product(pool, id).await
}

/// Delete a product; products referenced by an order cannot be deleted
pub async fn delete_product(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                SqliteError::Conflict(format!("Product {} is referenced by orders", id))
            }
            _ => SqliteError::Database(e),
        })?;
    Ok(result.rows_affected() > 0)
}
