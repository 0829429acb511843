use std::time::Duration;

use nextcoffee_core::{AppConfig, StoreRecord};
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

// Path relative to crates/nextcoffee-db/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

pub mod coffee_stores;
pub mod memory;

pub use coffee_stores::{
    get_coffee_store_by_id, increment_coffee_store_vote, upsert_coffee_store, CoffeeStoreRow,
};
pub use memory::MemoryStore;

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Connect to a Postgres pool using explicit URL and config.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the connection cannot be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await
}

/// Connect using `DATABASE_URL` and default pool sizing, for maintenance
/// commands that run without the full server config.
///
/// # Errors
///
/// Returns [`DbError::MissingDatabaseUrl`] if `DATABASE_URL` is unset or
/// blank, or [`DbError::Sqlx`] if the connection fails.
pub async fn connect_pool_from_env() -> Result<PgPool, DbError> {
    let database_url = std::env::var("DATABASE_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(DbError::MissingDatabaseUrl)?;
    Ok(connect_pool(&database_url, PoolConfig::default()).await?)
}

/// Run all pending migrations against the pool.
///
/// Returns the number of migrations that were applied.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if any migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, sqlx::migrate::MigrateError> {
    // _sqlx_migrations does not exist yet on a fresh database; treat that as zero.
    let applied_before = count_applied_migrations(pool).await;
    MIGRATOR.run(pool).await?;
    let applied_after = count_applied_migrations(pool).await;

    let delta = (applied_after - applied_before).max(0);
    Ok(usize::try_from(delta).unwrap_or(0))
}

async fn count_applied_migrations(pool: &PgPool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = true")
        .fetch_one(pool)
        .await
        .unwrap_or(0)
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

/// The shared store behind the coffee-store API routes.
///
/// Both backends give the same guarantees: one row per id, `upsert` never
/// modifies an existing row, and vote increments are atomic.
#[derive(Debug, Clone)]
pub enum Datastore {
    Postgres(PgPool),
    Memory(MemoryStore),
}

impl Datastore {
    /// Insert-if-absent; returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the Postgres backend fails.
    pub async fn upsert(&self, store: &StoreRecord) -> Result<StoreRecord, DbError> {
        let row = match self {
            Self::Postgres(pool) => upsert_coffee_store(pool, store).await?,
            Self::Memory(memory) => memory.upsert(store),
        };
        Ok(row.into())
    }

    /// # Errors
    ///
    /// Returns [`DbError`] if the Postgres backend fails.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<StoreRecord>, DbError> {
        let row = match self {
            Self::Postgres(pool) => get_coffee_store_by_id(pool, id).await?,
            Self::Memory(memory) => memory.get_by_id(id),
        };
        Ok(row.map(StoreRecord::from))
    }

    /// Add one vote; `None` when no record has this id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the Postgres backend fails.
    pub async fn increment_vote(&self, id: &str) -> Result<Option<StoreRecord>, DbError> {
        let row = match self {
            Self::Postgres(pool) => increment_coffee_store_vote(pool, id).await?,
            Self::Memory(memory) => memory.increment_vote(id),
        };
        Ok(row.map(StoreRecord::from))
    }

    /// Verify the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the Postgres ping fails.
    pub async fn health_check(&self) -> Result<(), DbError> {
        match self {
            Self::Postgres(pool) => ping(pool).await?,
            Self::Memory(_) => {}
        }
        Ok(())
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}
