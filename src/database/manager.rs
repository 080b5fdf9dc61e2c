use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Process-wide connection pool for the document store.
///
/// The pool is established once at startup by `init`; an unreachable store at
/// that point is fatal. Afterwards `pool()` hands out clones of the shared,
/// internally-pooled handle.
pub struct DatabaseManager;

static POOL: OnceLock<PgPool> = OnceLock::new();

impl DatabaseManager {
    /// Connect to the store and ensure the persisted collections exist.
    pub async fn init() -> Result<(), DatabaseError> {
        let db_config = &config::config().database;

        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(Duration::from_secs(db_config.connection_timeout))
            .connect(&db_config.url)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        Self::ensure_schema(&pool).await?;

        POOL.set(pool)
            .map_err(|_| DatabaseError::ConnectionError("pool already initialized".to_string()))?;

        info!("Connected to database");
        Ok(())
    }

    /// Get the shared pool. Panics if `init` has not run, which only happens
    /// on a programming error in startup ordering.
    pub fn pool() -> &'static PgPool {
        POOL.get().expect("DatabaseManager::init must run before pool access")
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(Self::pool()).await?;
        Ok(())
    }

    async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id       TEXT PRIMARY KEY,
                name     TEXT NOT NULL,
                email    TEXT NOT NULL,
                password TEXT NOT NULL,
                role     TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON users (email)")
            .execute(pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS recipes (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                ingredients TEXT NOT NULL,
                preparation TEXT NOT NULL,
                user_id     TEXT NOT NULL,
                image       TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
