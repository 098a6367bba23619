//! Database operations for the `products` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;

use shopfront_core::{Product, Rating, VariantOption};

use crate::DbError;

const PRODUCT_COLUMNS: &str = "id, title, price, original_price, description, category, image, \
     images, rating_rate, rating_count, ft_url, fi_url, stock, colors, sizes, \
     created_at, updated_at";

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `products` table.
///
/// `images`, `colors`, and `sizes` are `jsonb` columns holding the list
/// types from `shopfront-core`; ratings are denormalized into two plain
/// columns.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub title: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub description: String,
    pub category: String,
    pub image: String,
    pub images: Json<Vec<String>>,
    pub rating_rate: f64,
    pub rating_count: i64,
    pub ft_url: Option<String>,
    pub fi_url: Option<String>,
    pub stock: Option<i32>,
    pub colors: Json<Vec<VariantOption>>,
    pub sizes: Json<Vec<VariantOption>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            title: row.title,
            price: row.price,
            original_price: row.original_price,
            description: row.description,
            category: row.category,
            image: row.image,
            images: row.images.0,
            rating: Rating {
                rate: row.rating_rate,
                count: row.rating_count,
            },
            ft_url: row.ft_url,
            fi_url: row.fi_url,
            stock: row.stock,
            colors: row.colors.0,
            sizes: row.sizes.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns all products, ordered by id. The catalog pipeline's "featured"
/// order is this insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_products(pool: &PgPool) -> Result<Vec<ProductRow>, DbError> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single product by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product(pool: &PgPool, id: i64) -> Result<Option<ProductRow>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts a new product with a generated id, returning the full row.
///
/// `product.id` is ignored; the database assigns the identity.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_product(pool: &PgPool, product: &Product) -> Result<ProductRow, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "INSERT INTO products \
             (title, price, original_price, description, category, image, images, \
              rating_rate, rating_count, ft_url, fi_url, stock, colors, sizes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(&product.title)
    .bind(product.price)
    .bind(product.original_price)
    .bind(&product.description)
    .bind(&product.category)
    .bind(&product.image)
    .bind(Json(&product.images))
    .bind(product.rating.rate)
    .bind(product.rating.count)
    .bind(&product.ft_url)
    .bind(&product.fi_url)
    .bind(product.stock)
    .bind(Json(&product.colors))
    .bind(Json(&product.sizes))
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Upserts a product under its explicit id. Used by catalog seeding, where
/// ids come from the seed file. Conflicts replace every mutable column.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_product(pool: &PgPool, product: &Product) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO products \
             (id, title, price, original_price, description, category, image, images, \
              rating_rate, rating_count, ft_url, fi_url, stock, colors, sizes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
         ON CONFLICT (id) DO UPDATE SET \
             title          = EXCLUDED.title, \
             price          = EXCLUDED.price, \
             original_price = EXCLUDED.original_price, \
             description    = EXCLUDED.description, \
             category       = EXCLUDED.category, \
             image          = EXCLUDED.image, \
             images         = EXCLUDED.images, \
             rating_rate    = EXCLUDED.rating_rate, \
             rating_count   = EXCLUDED.rating_count, \
             ft_url         = EXCLUDED.ft_url, \
             fi_url         = EXCLUDED.fi_url, \
             stock          = EXCLUDED.stock, \
             colors         = EXCLUDED.colors, \
             sizes          = EXCLUDED.sizes, \
             updated_at     = NOW() \
         RETURNING id",
    )
    .bind(product.id)
    .bind(&product.title)
    .bind(product.price)
    .bind(product.original_price)
    .bind(&product.description)
    .bind(&product.category)
    .bind(&product.image)
    .bind(Json(&product.images))
    .bind(product.rating.rate)
    .bind(product.rating.count)
    .bind(&product.ft_url)
    .bind(&product.fi_url)
    .bind(product.stock)
    .bind(Json(&product.colors))
    .bind(Json(&product.sizes))
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Full-replace update of an existing product, returning the canonical row.
/// Returns `None` when the id does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn replace_product(
    pool: &PgPool,
    id: i64,
    product: &Product,
) -> Result<Option<ProductRow>, DbError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "UPDATE products SET \
             title          = $2, \
             price          = $3, \
             original_price = $4, \
             description    = $5, \
             category       = $6, \
             image          = $7, \
             images         = $8, \
             rating_rate    = $9, \
             rating_count   = $10, \
             ft_url         = $11, \
             fi_url         = $12, \
             stock          = $13, \
             colors         = $14, \
             sizes          = $15, \
             updated_at     = NOW() \
         WHERE id = $1 \
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(id)
    .bind(&product.title)
    .bind(product.price)
    .bind(product.original_price)
    .bind(&product.description)
    .bind(&product.category)
    .bind(&product.image)
    .bind(Json(&product.images))
    .bind(product.rating.rate)
    .bind(product.rating.count)
    .bind(&product.ft_url)
    .bind(&product.fi_url)
    .bind(product.stock)
    .bind(Json(&product.colors))
    .bind(Json(&product.sizes))
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Deletes a product. Returns `true` when a row was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_product(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let affected = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}
