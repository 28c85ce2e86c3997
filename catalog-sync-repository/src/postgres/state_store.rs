//! PostgreSQL implementation of the key-value store.
//!
//! Values live in the `sync_state` table and are written with upserts.

use async_trait::async_trait;

use crate::errors::RepositoryError;
use crate::interfaces::StateStore;

/// PostgreSQL-backed key-value store.
pub struct PostgresStateStore {
    pool: sqlx::PgPool,
}

impl PostgresStateStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StateStore for PostgresStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM sync_state WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO sync_state (key, value, updated_at) VALUES ($1, $2, NOW()) \
             ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
