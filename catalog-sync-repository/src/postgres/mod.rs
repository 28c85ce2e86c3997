//! PostgreSQL implementations of the product repository and the key-value
//! store.
//!
//! ## Database Tables
//!
//! - `products`: catalog items, one row per product or variation
//! - `sync_state`: key-value pairs kept by the sync engine

mod product_repository;
mod state_store;

pub use product_repository::PostgresProductRepository;
pub use state_store::PostgresStateStore;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::errors::RepositoryError;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Opens a connection pool to the given database.
pub async fn connect_pool(database_url: &str) -> Result<sqlx::PgPool, RepositoryError> {
    let pool = PgPoolOptions::new()
        .max_connections(DEFAULT_MAX_CONNECTIONS)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the bundled schema migrations.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), RepositoryError> {
    sqlx::migrate!("src/postgres/migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
