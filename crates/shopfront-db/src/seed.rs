//! Catalog seeding from the YAML seed file.

use sqlx::PgPool;

use shopfront_core::CatalogFile;

use crate::{categories::upsert_category_by_name, products::upsert_product, DbError};

/// Upserts every category and product from a validated seed catalog.
///
/// Seed products carry explicit ids, so the products identity sequence is
/// bumped past the highest seeded id afterwards; otherwise the next
/// admin-created product would collide with a seeded row.
///
/// Returns `(categories, products)` upserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any upsert fails.
pub async fn seed_catalog(pool: &PgPool, catalog: &CatalogFile) -> Result<(usize, usize), DbError> {
    for category in &catalog.categories {
        upsert_category_by_name(
            pool,
            &category.name,
            &category.image,
            category.description.as_deref(),
        )
        .await?;
    }

    for product in &catalog.products {
        upsert_product(pool, product).await?;
    }

    sqlx::query(
        "SELECT setval('products_id_seq', GREATEST((SELECT COALESCE(MAX(id), 1) FROM products), 1))",
    )
    .execute(pool)
    .await?;

    Ok((catalog.categories.len(), catalog.products.len()))
}
