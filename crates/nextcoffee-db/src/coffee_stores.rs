//! Database operations for the `coffee_stores` table.

use chrono::{DateTime, Utc};
use nextcoffee_core::StoreRecord;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `coffee_stores` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CoffeeStoreRow {
    pub id: String,
    pub name: String,
    pub address: String,
    pub neighbourhood: String,
    pub img_url: String,
    pub distance: f64,
    pub voting: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CoffeeStoreRow> for StoreRecord {
    fn from(row: CoffeeStoreRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            neighbourhood: row.neighbourhood,
            img_url: row.img_url,
            distance: row.distance,
            voting: row.voting,
        }
    }
}

const SELECT_COLUMNS: &str =
    "id, name, address, neighbourhood, img_url, distance, voting, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts a coffee store with `voting = 0` unless one with the same id
/// already exists, then returns whichever row is stored.
///
/// The existing row is never modified, so repeated calls are idempotent.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either statement fails.
pub async fn upsert_coffee_store(
    pool: &PgPool,
    store: &StoreRecord,
) -> Result<CoffeeStoreRow, DbError> {
    sqlx::query(
        "INSERT INTO coffee_stores (id, name, address, neighbourhood, img_url, distance, voting) \
         VALUES ($1, $2, $3, $4, $5, $6, 0) \
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(&store.id)
    .bind(&store.name)
    .bind(&store.address)
    .bind(&store.neighbourhood)
    .bind(&store.img_url)
    .bind(store.distance.max(0.0))
    .execute(pool)
    .await?;

    get_coffee_store_by_id(pool, &store.id)
        .await?
        .ok_or(DbError::NotFound)
}

/// Returns the coffee store with the given id, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_coffee_store_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<CoffeeStoreRow>, DbError> {
    let row = sqlx::query_as::<_, CoffeeStoreRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM coffee_stores WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Adds one vote to an existing coffee store and returns the updated row.
///
/// A single `UPDATE ... SET voting = voting + 1` statement, so concurrent
/// votes never lose increments. Unknown ids return `None` and insert nothing.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn increment_coffee_store_vote(
    pool: &PgPool,
    id: &str,
) -> Result<Option<CoffeeStoreRow>, DbError> {
    let row = sqlx::query_as::<_, CoffeeStoreRow>(&format!(
        "UPDATE coffee_stores \
         SET voting = voting + 1, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {SELECT_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
