//! Dependency initialization and wiring for the catalog sync binary.

use std::env;
use std::sync::Arc;
use tracing::info;

use crate::config::SyncConfig;
use crate::engine::CatalogSyncEngine;
use crate::errors::SyncError;
use catalog_sync_repository::postgres::{connect_pool, run_migrations};
use catalog_sync_repository::{
    OpenSearchProvider, PostgresProductRepository, PostgresStateStore, ProductRepository,
    SearchIndexClient, StateStore,
};

/// Container for all initialized collaborators.
pub struct Dependencies {
    pub search: Arc<dyn SearchIndexClient>,
    pub products: Arc<dyn ProductRepository>,
    pub state: Arc<dyn StateStore>,
}

impl Dependencies {
    /// Initialize all collaborators for the given configuration.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: PostgreSQL URL of the catalog and key-value store (required)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(SyncError)` - If the database is unavailable or a host is invalid
    pub async fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| SyncError::config("DATABASE_URL must be set"))?;

        info!(
            hosts = ?config.hosts(),
            index = config.index_name(),
            "Initializing dependencies"
        );

        let search = OpenSearchProvider::connect(config.hosts())
            .await
            .map_err(|e| SyncError::config(format!("Failed to create OpenSearch client: {}", e)))?;

        let pool = connect_pool(&database_url).await?;
        run_migrations(&pool).await?;

        info!("Database connection established");

        Ok(Self {
            search: Arc::new(search),
            products: Arc::new(PostgresProductRepository::new(pool.clone())),
            state: Arc::new(PostgresStateStore::new(pool)),
        })
    }

    /// Build the engine over these collaborators.
    pub fn into_engine(self, config: SyncConfig) -> Result<CatalogSyncEngine, SyncError> {
        CatalogSyncEngine::new(config, self.search, self.products, self.state)
    }
}
