//! Catalog synchronization engine.
//!
//! Owns the configuration and the components built from it. Collaborators
//! are injected, so the same engine runs against OpenSearch and PostgreSQL
//! or against in-memory doubles.

use std::sync::Arc;

use catalog_sync_repository::{ProductRepository, SearchIndexClient, StateStore};

use crate::config::SyncConfig;
use crate::errors::SyncError;
use crate::pipeline::BulkSyncPipeline;
use crate::schema::SchemaManager;
use crate::single::SingleItemSync;
use crate::stats::StatAggregator;

pub struct CatalogSyncEngine {
    config: SyncConfig,
    schema: SchemaManager,
    pipeline: BulkSyncPipeline,
    single: SingleItemSync,
    stats: StatAggregator,
}

impl CatalogSyncEngine {
    /// Create an engine over the given collaborators.
    ///
    /// # Returns
    ///
    /// * `Ok(CatalogSyncEngine)` - Ready-to-use engine
    /// * `Err(SyncError::Config)` - If the configuration is invalid
    pub fn new(
        config: SyncConfig,
        client: Arc<dyn SearchIndexClient>,
        products: Arc<dyn ProductRepository>,
        state: Arc<dyn StateStore>,
    ) -> Result<Self, SyncError> {
        config.validate()?;

        Ok(Self {
            schema: SchemaManager::new(client.clone(), &config),
            pipeline: BulkSyncPipeline::new(
                client.clone(),
                products.clone(),
                state.clone(),
                &config,
            ),
            single: SingleItemSync::new(client.clone(), products, &config),
            stats: StatAggregator::new(client, state, &config),
            config,
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn index_name(&self) -> &str {
        self.config.index_name()
    }

    pub fn schema(&self) -> &SchemaManager {
        &self.schema
    }

    pub fn pipeline(&self) -> &BulkSyncPipeline {
        &self.pipeline
    }

    pub fn single(&self) -> &SingleItemSync {
        &self.single
    }

    pub fn stats(&self) -> &StatAggregator {
        &self.stats
    }
}
