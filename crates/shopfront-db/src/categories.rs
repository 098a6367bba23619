//! Database operations for the `categories` table.
//!
//! `product_count` is computed on read by matching `products.category`
//! against the category name; there is no foreign key between the tables.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopfront_core::Category;

use crate::DbError;

/// A row from the `categories` table, with its live product count.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub description: Option<String>,
    pub product_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            image: row.image,
            description: row.description,
            product_count: Some(row.product_count),
        }
    }
}

/// Returns all categories ordered by name, each with the number of products
/// currently carrying its name as their category label.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_categories(pool: &PgPool) -> Result<Vec<CategoryRow>, DbError> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        "SELECT c.id, c.name, c.image, c.description, \
                COUNT(p.id) AS product_count, c.created_at, c.updated_at \
         FROM categories c \
         LEFT JOIN products p ON p.category = c.name \
         GROUP BY c.id \
         ORDER BY c.name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Inserts a new category, returning the full row (count starts from the
/// products already labeled with this name).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including unique
/// violations on the name).
pub async fn create_category(
    pool: &PgPool,
    name: &str,
    image: &str,
    description: Option<&str>,
) -> Result<CategoryRow, DbError> {
    let row = sqlx::query_as::<_, CategoryRow>(
        "WITH inserted AS ( \
             INSERT INTO categories (name, image, description) \
             VALUES ($1, $2, $3) \
             RETURNING id, name, image, description, created_at, updated_at \
         ) \
         SELECT i.id, i.name, i.image, i.description, \
                COUNT(p.id) AS product_count, i.created_at, i.updated_at \
         FROM inserted i \
         LEFT JOIN products p ON p.category = i.name \
         GROUP BY i.id, i.name, i.image, i.description, i.created_at, i.updated_at",
    )
    .bind(name)
    .bind(image)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Full-replace update of a category. Returns `None` when the id does not
/// exist. Renaming a category does not touch products; their free-text
/// labels keep the old name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn replace_category(
    pool: &PgPool,
    id: i64,
    name: &str,
    image: &str,
    description: Option<&str>,
) -> Result<Option<CategoryRow>, DbError> {
    let row = sqlx::query_as::<_, CategoryRow>(
        "WITH updated AS ( \
             UPDATE categories \
             SET name = $2, image = $3, description = $4, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING id, name, image, description, created_at, updated_at \
         ) \
         SELECT u.id, u.name, u.image, u.description, \
                COUNT(p.id) AS product_count, u.created_at, u.updated_at \
         FROM updated u \
         LEFT JOIN products p ON p.category = u.name \
         GROUP BY u.id, u.name, u.image, u.description, u.created_at, u.updated_at",
    )
    .bind(id)
    .bind(name)
    .bind(image)
    .bind(description)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Deletes a category. Returns `true` when a row was removed. Products keep
/// their label; they just no longer match a stored category.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_category(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let affected = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}

/// Upserts a category by name for catalog seeding.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_category_by_name(
    pool: &PgPool,
    name: &str,
    image: &str,
    description: Option<&str>,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO categories (name, image, description) \
         VALUES ($1, $2, $3) \
         ON CONFLICT (name) DO UPDATE SET \
             image       = EXCLUDED.image, \
             description = EXCLUDED.description, \
             updated_at  = NOW() \
         RETURNING id",
    )
    .bind(name)
    .bind(image)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(id)
}
