//! Database operations for the `banner_slides` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopfront_core::BannerSlide;

use crate::DbError;

/// A row from the `banner_slides` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BannerSlideRow {
    pub id: i64,
    pub image: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BannerSlideRow> for BannerSlide {
    fn from(row: BannerSlideRow) -> Self {
        BannerSlide {
            id: row.id,
            image: row.image,
            title: row.title,
            subtitle: row.subtitle,
            link: row.link,
        }
    }
}

/// Returns all slides in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_banner_slides(pool: &PgPool) -> Result<Vec<BannerSlideRow>, DbError> {
    let rows = sqlx::query_as::<_, BannerSlideRow>(
        "SELECT id, image, title, subtitle, link, created_at, updated_at \
         FROM banner_slides \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Inserts a slide, returning the full row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_banner_slide(
    pool: &PgPool,
    image: &str,
    title: Option<&str>,
    subtitle: Option<&str>,
    link: Option<&str>,
) -> Result<BannerSlideRow, DbError> {
    let row = sqlx::query_as::<_, BannerSlideRow>(
        "INSERT INTO banner_slides (image, title, subtitle, link) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, image, title, subtitle, link, created_at, updated_at",
    )
    .bind(image)
    .bind(title)
    .bind(subtitle)
    .bind(link)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Full-replace update of a slide. Returns `None` when the id does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn replace_banner_slide(
    pool: &PgPool,
    id: i64,
    image: &str,
    title: Option<&str>,
    subtitle: Option<&str>,
    link: Option<&str>,
) -> Result<Option<BannerSlideRow>, DbError> {
    let row = sqlx::query_as::<_, BannerSlideRow>(
        "UPDATE banner_slides \
         SET image = $2, title = $3, subtitle = $4, link = $5, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING id, image, title, subtitle, link, created_at, updated_at",
    )
    .bind(id)
    .bind(image)
    .bind(title)
    .bind(subtitle)
    .bind(link)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Deletes a slide. Returns `true` when a row was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_banner_slide(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let affected = sqlx::query("DELETE FROM banner_slides WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}
