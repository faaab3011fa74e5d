//! Order repository for SQLite operations
//!
//! Creating and cancelling orders moves product stock, so those paths run in
//! a single transaction.

use std::collections::BTreeMap;

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{
    ListOrdersParams, NewOrderItem, OrderItemRow, OrderRow, OrderStatus, OrderWithItems,
    page_offset,
};

type OrderTuple = (String, String, String, f64, i64, i64);

const ORDER_COLUMNS: &str = "id, user_id, status, total, created_at, updated_at";

fn order_from_tuple((id, user_id, status, total, created_at, updated_at): OrderTuple) -> OrderRow {
    OrderRow {
        id,
        user_id,
        status: OrderStatus::parse(&status).unwrap_or_default(),
        total,
        created_at,
        updated_at,
    }
}

/// Place an order for `user_id`
///
/// Quantities for the same product are merged. Unknown users or products
/// yield `NotFound`; a line exceeding available stock yields `Conflict`.
/// Stock is decremented and the total is the sum of quantity × current price.
pub async fn create_order(
    pool: &SqlitePool,
    user_id: &str,
    items: &[NewOrderItem],
) -> Result<OrderWithItems, SqliteError> {
    if items.is_empty() {
        return Err(SqliteError::Conflict(
            "Order must contain at least one item".to_string(),
        ));
    }

    let mut quantities: BTreeMap<&str, i64> = BTreeMap::new();
    for item in items {
        if item.quantity <= 0 {
            return Err(SqliteError::Conflict(format!(
                "Quantity for product {} must be positive",
                item.product_id
            )));
        }
        let merged = quantities.entry(item.product_id.as_str()).or_insert(0);
        *merged = merged.checked_add(item.quantity).ok_or_else(|| {
            SqliteError::Conflict(format!(
                "Quantity for product {} is too large",
                item.product_id
            ))
        })?;
    }

    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();

    let mut tx = pool.begin().await?;

    let user_exists: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
    if user_exists.is_none() {
        return Err(SqliteError::NotFound(format!("User {}", user_id)));
    }

    let mut lines = Vec::with_capacity(quantities.len());
    for (product_id, quantity) in &quantities {
        let product: Option<(String, f64, i64)> =
            sqlx::query_as("SELECT name, price, stock FROM products WHERE id = ?")
                .bind(*product_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((name, price, stock)) = product else {
            return Err(SqliteError::NotFound(format!("Product {}", product_id)));
        };
        if stock < *quantity {
            return Err(SqliteError::Conflict(format!(
                "Insufficient stock for product {}: requested {}, available {}",
                product_id, quantity, stock
            )));
        }
        lines.push(OrderItemRow {
            product_id: product_id.to_string(),
            product_name: name,
            quantity: *quantity,
            unit_price: price,
        });
    }

    let total: f64 = lines
        .iter()
        .map(|line| line.quantity as f64 * line.unit_price)
        .sum();

    sqlx::query(
        "INSERT INTO orders (id, user_id, status, total, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(OrderStatus::Pending.as_str())
    .bind(total)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for line in &lines {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, unit_price) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE products SET stock = stock - ?, updated_at = ? WHERE id = ?")
            .bind(line.quantity)
            .bind(now)
            .bind(&line.product_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    tracing::debug!(order_id = %id, %user_id, items = lines.len(), total, "Order created");

    Ok(OrderWithItems {
        order: OrderRow {
            id,
            user_id: user_id.to_string(),
            status: OrderStatus::Pending,
            total,
            created_at: now,
            updated_at: now,
        },
        items: lines,
    })
}

async fn get_items(pool: &SqlitePool, order_id: &str) -> Result<Vec<OrderItemRow>, SqliteError> {
    let rows = sqlx::query_as::<_, (String, String, i64, f64)>(
        r#"
        SELECT oi.product_id, p.name, oi.quantity, oi.unit_price
        FROM order_items oi
        JOIN products p ON p.id = oi.product_id
        WHERE oi.order_id = ?
        ORDER BY p.name
        "#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(
            |(product_id, product_name, quantity, unit_price)| OrderItemRow {
                product_id,
                product_name,
                quantity,
                unit_price,
            },
        )
        .collect())
}

/// Get an order together with its line items
pub async fn get_order(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<OrderWithItems>, SqliteError> {
    let row = sqlx::query_as::<_, OrderTuple>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let items = get_items(pool, id).await?;
    Ok(Some(OrderWithItems {
        order: order_from_tuple(row),
        items,
    }))
}

/// List orders, newest first, with the total matching count
pub async fn list_orders(
    pool: &SqlitePool,
    params: &ListOrdersParams,
) -> Result<(Vec<OrderRow>, u64), SqliteError> {
    let status = params.status.map(|s| s.as_str());
    let user_id = params.user_id.as_deref();
    let filter = "WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR user_id = ?2)";

    let rows = sqlx::query_as::<_, OrderTuple>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders {filter} ORDER BY created_at DESC, id LIMIT ?3 OFFSET ?4"
    ))
    .bind(status)
    .bind(user_id)
    .bind(params.limit as i64)
    .bind(page_offset(params.page, params.limit))
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM orders {filter}"))
        .bind(status)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok((
        rows.into_iter().map(order_from_tuple).collect(),
        total.0 as u64,
    ))
}

/// Change an order's status
///
/// Moving into `Cancelled` returns the items to stock; a cancelled order
/// cannot be reopened. Returns `None` if the order does not exist.
pub async fn update_status(
    pool: &SqlitePool,
    id: &str,
    status: OrderStatus,
) -> Result<Option<OrderWithItems>, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    let current: Option<(String,)> = sqlx::query_as("SELECT status FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some((current,)) = current else {
        return Ok(None);
    };
    let current = OrderStatus::parse(&current).unwrap_or_default();

    if current == OrderStatus::Cancelled && status != OrderStatus::Cancelled {
        return Err(SqliteError::Conflict(format!(
            "Order {} is cancelled and cannot move to {}",
            id, status
        )));
    }

    if status == OrderStatus::Cancelled && current != OrderStatus::Cancelled {
        sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + (
                    SELECT oi.quantity FROM order_items oi
                    WHERE oi.order_id = ?1 AND oi.product_id = products.id
                ),
                updated_at = ?2
            WHERE id IN (SELECT product_id FROM order_items WHERE order_id = ?1)
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::debug!(order_id = %id, from = %current, to = %status, "Order status updated");
    get_order(pool, id).await
}

/// Delete an order and its items; returns whether a row was removed
pub async fn delete_order(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::{product, user};
    use crate::data::sqlite::test_pool;
    use crate::data::types::{NewProduct, UserRole};

    struct Fixture {
        pool: SqlitePool,
        user_id: String,
        mug_id: String,
        lamp_id: String,
    }

    async fn fixture() -> Fixture {
        let pool = test_pool().await;
        let user = user::create_user(&pool, "buyer@example.com", "Buyer", UserRole::Customer)
            .await
            .unwrap();
        let mug = product::create_product(
            &pool,
            NewProduct {
                name: "Mug",
                description: None,
                category: Some("kitchen"),
                price: 12.5,
                stock: 5,
            },
        )
        .await
        .unwrap();
        let lamp = product::create_product(
            &pool,
            NewProduct {
                name: "Lamp",
                description: None,
                category: Some("office"),
                price: 40.0,
                stock: 2,
            },
        )
        .await
        .unwrap();
        Fixture {
            pool,
            user_id: user.id,
            mug_id: mug.id,
            lamp_id: lamp.id,
        }
    }

    fn item(product_id: &str, quantity: i64) -> NewOrderItem {
        NewOrderItem {
            product_id: product_id.to_string(),
            quantity,
        }
    }

    async fn stock(pool: &SqlitePool, id: &str) -> i64 {
        product::get_product(pool, id).await.unwrap().unwrap().stock
    }

    #[tokio::test]
    async fn test_create_order_totals_and_decrements_stock() {
        let f = fixture().await;
        let order = create_order(
            &f.pool,
            &f.user_id,
            &[item(&f.mug_id, 2), item(&f.lamp_id, 1), item(&f.mug_id, 1)],
        )
        .await
        .unwrap();

        assert_eq!(order.order.status, OrderStatus::Pending);
        assert_eq!(order.order.total, 3.0 * 12.5 + 40.0);
        assert_eq!(order.items.len(), 2);
        assert_eq!(stock(&f.pool, &f.mug_id).await, 2);
        assert_eq!(stock(&f.pool, &f.lamp_id).await, 1);

        let fetched = get_order(&f.pool, &order.order.id).await.unwrap().unwrap();
        assert_eq!(fetched.items.len(), 2);
        assert_eq!(fetched.items[0].product_name, "Lamp");
    }

    #[tokio::test]
    async fn test_create_order_insufficient_stock_rolls_back() {
        let f = fixture().await;
        let result = create_order(
            &f.pool,
            &f.user_id,
            &[item(&f.mug_id, 1), item(&f.lamp_id, 3)],
        )
        .await;

        assert!(matches!(result, Err(SqliteError::Conflict(_))));
        assert_eq!(stock(&f.pool, &f.mug_id).await, 5);
        let (_, total) = list_orders(
            &f.pool,
            &ListOrdersParams {
                page: 1,
                limit: 10,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_create_order_unknown_refs() {
        let f = fixture().await;
        let result = create_order(&f.pool, &f.user_id, &[item("ghost", 1)]).await;
        assert!(matches!(result, Err(SqliteError::NotFound(_))));

        let result = create_order(&f.pool, "nobody", &[item(&f.mug_id, 1)]).await;
        assert!(matches!(result, Err(SqliteError::NotFound(_))));

        let result = create_order(&f.pool, &f.user_id, &[]).await;
        assert!(matches!(result, Err(SqliteError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_order_merged_quantity_overflow_is_conflict() {
        let f = fixture().await;
        let result = create_order(
            &f.pool,
            &f.user_id,
            &[item(&f.mug_id, i64::MAX), item(&f.mug_id, 1)],
        )
        .await;

        assert!(matches!(result, Err(SqliteError::Conflict(_))));
        assert_eq!(stock(&f.pool, &f.mug_id).await, 5);
    }

    #[tokio::test]
    async fn test_cancel_restores_stock_once() {
        let f = fixture().await;
        let order = create_order(&f.pool, &f.user_id, &[item(&f.mug_id, 4)])
            .await
            .unwrap();
        assert_eq!(stock(&f.pool, &f.mug_id).await, 1);

        let shipped = update_status(&f.pool, &order.order.id, OrderStatus::Shipped)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(shipped.order.status, OrderStatus::Shipped);
        assert_eq!(stock(&f.pool, &f.mug_id).await, 1);

        update_status(&f.pool, &order.order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(stock(&f.pool, &f.mug_id).await, 5);

        // Cancelling again does not restock twice
        update_status(&f.pool, &order.order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(stock(&f.pool, &f.mug_id).await, 5);

        let reopen = update_status(&f.pool, &order.order.id, OrderStatus::Pending).await;
        assert!(matches!(reopen, Err(SqliteError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_status_missing_order() {
        let f = fixture().await;
        let result = update_status(&f.pool, "missing", OrderStatus::Shipped)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_orders_status_filter_and_delete() {
        let f = fixture().await;
        let a = create_order(&f.pool, &f.user_id, &[item(&f.mug_id, 1)])
            .await
            .unwrap();
        create_order(&f.pool, &f.user_id, &[item(&f.lamp_id, 1)])
            .await
            .unwrap();
        update_status(&f.pool, &a.order.id, OrderStatus::Delivered)
            .await
            .unwrap();

        let delivered = ListOrdersParams {
            status: Some(OrderStatus::Delivered),
            page: 1,
            limit: 10,
            ..Default::default()
        };
        let (rows, total) = list_orders(&f.pool, &delivered).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].id, a.order.id);

        assert!(delete_order(&f.pool, &a.order.id).await.unwrap());
        assert!(get_order(&f.pool, &a.order.id).await.unwrap().is_none());
        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE order_id = ?")
            .bind(&a.order.id)
            .fetch_one(&f.pool)
            .await
            .unwrap();
        assert_eq!(items, 0);
    }
}
