//! Database operations for the `contacts` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopfront_core::Contact;

use crate::DbError;

/// A row from the `contacts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContactRow {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Contact {
            id: row.id,
            name: row.name,
            phone: row.phone,
            address: row.address,
            email: row.email,
        }
    }
}

/// Returns all contacts, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_contacts(pool: &PgPool) -> Result<Vec<ContactRow>, DbError> {
    let rows = sqlx::query_as::<_, ContactRow>(
        "SELECT id, name, phone, address, email, created_at, updated_at \
         FROM contacts \
         ORDER BY id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Inserts a contact, returning the full row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_contact(
    pool: &PgPool,
    name: &str,
    phone: &str,
    address: &str,
    email: Option<&str>,
) -> Result<ContactRow, DbError> {
    let row = sqlx::query_as::<_, ContactRow>(
        "INSERT INTO contacts (name, phone, address, email) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, name, phone, address, email, created_at, updated_at",
    )
    .bind(name)
    .bind(phone)
    .bind(address)
    .bind(email)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Deletes a contact. Returns `true` when a row was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_contact(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let affected = sqlx::query("DELETE FROM contacts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(affected > 0)
}
