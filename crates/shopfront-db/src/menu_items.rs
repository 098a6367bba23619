//! Database operations for the `menu_items` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopfront_core::MenuItem;

use crate::DbError;

/// A row from the `menu_items` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MenuItemRow {
    pub id: i64,
    pub label: String,
    pub path: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        MenuItem {
            id: row.id,
            label: row.label,
            path: row.path,
            position: row.position,
        }
    }
}

/// Returns all menu entries ordered by position, then id for ties.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_menu_items(pool: &PgPool) -> Result<Vec<MenuItemRow>, DbError> {
    let rows = sqlx::query_as::<_, MenuItemRow>(
        "SELECT id, label, path, position, created_at, updated_at \
         FROM menu_items \
         ORDER BY position, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Inserts a menu entry, returning the full row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_menu_item(
    pool: &PgPool,
    label: &str,
    path: &str,
    position: i32,
) -> Result<MenuItemRow, DbError> {
    let row = sqlx::query_as::<_, MenuItemRow>(
        "INSERT INTO menu_items (label, path, position) \
         VALUES ($1, $2, $3) \
         RETURNING id, label, path, position, created_at, updated_at",
    )
    .bind(label)
    .bind(path)
    .bind(position)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Full-replace update of a menu entry. Returns `None` when the id does not
/// exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn replace_menu_item(
    pool: &PgPool,
    id: i64,
    label: &str,
    path: &str,
    position: i32,
) -> Result<Option<MenuItemRow>, DbError> {
    let row = sqlx::query_as::<_, MenuItemRow>(
        "UPDATE menu_items \
         SET label = $2, path = $3, position = $4, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING id, label, path, position, created_at, updated_at",
    )
    .bind(id)
    .bind(label)
    .bind(path)
    .bind(position)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Deletes a menu entry. Returns `true` when a row was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_menu_item(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let affected = sqlx::query("DELETE FROM menu_items WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}
