//! Database operations for `orders` and `order_items`.
//!
//! Order creation is transactional: the order row and its snapshotted line
//! items land together or not at all. Nothing de-duplicates submissions;
//! inserting the same packaged order twice yields two orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use shopfront_core::Order;

use crate::DbError;

const ORDER_COLUMNS: &str = "id, public_id, customer_id, customer_name, customer_email, \
     customer_phone, order_date, status, total, shipping_address, payment_method, \
     created_at, updated_at";

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `orders` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub public_id: Uuid,
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: String,
    pub order_date: DateTime<Utc>,
    /// Lowercase status string; parse with `OrderStatus::from_str`.
    pub status: String,
    pub total: Decimal,
    pub shipping_address: String,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row from the `order_items` table: a line snapshotted at order time.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItemRow {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub image: Option<String>,
}

/// One bucket of the per-status order count report.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Persists a packaged order and its items in one transaction.
///
/// Returns the stored order row; the caller clears cart state only after
/// this succeeds.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement in the transaction fails.
pub async fn create_order(pool: &PgPool, order: &Order) -> Result<OrderRow, DbError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "INSERT INTO orders \
             (public_id, customer_id, customer_name, customer_email, customer_phone, \
              order_date, status, total, shipping_address, payment_method) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(order.public_id)
    .bind(&order.customer_id)
    .bind(&order.customer_name)
    .bind(&order.customer_email)
    .bind(&order.customer_phone)
    .bind(order.date)
    .bind(order.status.to_string())
    .bind(order.total)
    .bind(&order.shipping_address)
    .bind(&order.payment_method)
    .fetch_one(&mut *tx)
    .await?;

    for item in &order.items {
        sqlx::query(
            "INSERT INTO order_items \
                 (order_id, product_id, product_name, quantity, price, image) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(row.id)
        .bind(item.product_id)
        .bind(&item.product_name)
        .bind(i32::try_from(item.quantity).unwrap_or(i32::MAX))
        .bind(item.price)
        .bind(&item.image)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(row)
}

/// Returns orders newest-first, optionally filtered by status.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_orders(
    pool: &PgPool,
    status: Option<&str>,
    limit: i64,
) -> Result<Vec<OrderRow>, DbError> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders \
         WHERE ($1::TEXT IS NULL OR status = $1) \
         ORDER BY order_date DESC, id DESC \
         LIMIT $2"
    ))
    .bind(status)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns one order with its line items, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails.
pub async fn get_order(
    pool: &PgPool,
    id: i64,
) -> Result<Option<(OrderRow, Vec<OrderItemRow>)>, DbError> {
    let order = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(order) = order else {
        return Ok(None);
    };

    let items = sqlx::query_as::<_, OrderItemRow>(
        "SELECT id, order_id, product_id, product_name, quantity, price, image \
         FROM order_items \
         WHERE order_id = $1 \
         ORDER BY id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some((order, items)))
}

/// Sets an order's status, returning the updated row or `None` if the id
/// does not exist. The status string must already be validated.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn update_order_status(
    pool: &PgPool,
    id: i64,
    status: &str,
) -> Result<Option<OrderRow>, DbError> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "UPDATE orders SET status = $2, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(id)
    .bind(status)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Deletes an order; items cascade. Returns `true` when a row was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_order(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let affected = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}

/// Order counts grouped by status, busiest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn order_counts_by_status(pool: &PgPool) -> Result<Vec<StatusCount>, DbError> {
    let rows = sqlx::query_as::<_, StatusCount>(
        "SELECT status, COUNT(*) AS count \
         FROM orders \
         GROUP BY status \
         ORDER BY count DESC, status",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
