//! Single-item sync.
//!
//! Upserts, removes and fetches individual documents. Manual invocations use
//! [`OnIneligible::Fail`] so that a rejected item is reported; event-driven
//! invocations use [`OnIneligible::Skip`] and return quietly.

use std::sync::Arc;

use catalog_sync_repository::{ProductRepository, SearchIndexClient};
use catalog_sync_shared::CatalogItem;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::SyncConfig;
use crate::eligibility::{EligibilityFilter, Ineligibility};
use crate::errors::SyncError;
use crate::mapper::FieldMapper;

/// What to do with an item that may not be in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnIneligible {
    /// Return `SyncError::NotEligible`.
    Fail,
    /// Return `UpsertOutcome::Skipped` without touching the index.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The document was written.
    Indexed,
    /// The item was left out of the index.
    Skipped(Ineligibility),
    /// The repository has no item with the requested id.
    Missing,
}

pub struct SingleItemSync {
    client: Arc<dyn SearchIndexClient>,
    products: Arc<dyn ProductRepository>,
    filter: EligibilityFilter,
    mapper: FieldMapper,
    index: String,
}

impl SingleItemSync {
    pub fn new(
        client: Arc<dyn SearchIndexClient>,
        products: Arc<dyn ProductRepository>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            client,
            products,
            filter: EligibilityFilter::from_config(config),
            mapper: FieldMapper::from_config(config),
            index: config.index_name().to_string(),
        }
    }

    /// Write the document of `item`, replacing any stored version.
    pub async fn upsert(
        &self,
        item: &CatalogItem,
        policy: OnIneligible,
    ) -> Result<UpsertOutcome, SyncError> {
        if let Err(reason) = self.filter.check(item) {
            return match policy {
                OnIneligible::Fail => Err(SyncError::NotEligible {
                    id: item.id,
                    reason: reason.to_string(),
                }),
                OnIneligible::Skip => {
                    debug!(product_id = item.id, %reason, "Product not eligible, skipping");
                    Ok(UpsertOutcome::Skipped(reason))
                }
            };
        }

        let source = self.mapper.to_source(item)?;
        self.client
            .upsert_document(&self.index, &item.id.to_string(), &source)
            .await?;

        info!(index = %self.index, product_id = item.id, "Product indexed");
        Ok(UpsertOutcome::Indexed)
    }

    /// Look `id` up in the repository and upsert it with the strict policy.
    ///
    /// # Returns
    ///
    /// * `Ok(CatalogItem)` - The item that was indexed
    /// * `Err(SyncError::NotFound)` - If the repository has no such item
    /// * `Err(SyncError::NotEligible)` - If the item may not be indexed
    pub async fn add_by_id(&self, id: i64) -> Result<CatalogItem, SyncError> {
        let item = self
            .products
            .get_by_id(id)
            .await?
            .ok_or_else(|| SyncError::not_found(format!("Product with id {} not found", id)))?;

        self.upsert(&item, OnIneligible::Fail).await?;
        Ok(item)
    }

    /// Event-path sync: look `id` up and upsert it if it may be indexed.
    ///
    /// Missing and ineligible items are reported through the outcome only.
    pub async fn sync_by_id(&self, id: i64) -> Result<UpsertOutcome, SyncError> {
        match self.products.get_by_id(id).await? {
            Some(item) => self.upsert(&item, OnIneligible::Skip).await,
            None => {
                debug!(product_id = id, "Product not found, nothing to sync");
                Ok(UpsertOutcome::Missing)
            }
        }
    }

    /// Delete the document of `id`; an absent document is not an error.
    pub async fn remove(&self, id: i64) -> Result<(), SyncError> {
        let deleted = self
            .client
            .delete_document(&self.index, &id.to_string())
            .await?;

        info!(index = %self.index, product_id = id, deleted, "Product removed from index");
        Ok(())
    }

    /// The stored source of the document of `id`.
    pub async fn fetch(&self, id: i64) -> Result<Value, SyncError> {
        self.client
            .get_document(&self.index, &id.to_string())
            .await?
            .ok_or_else(|| {
                SyncError::not_found(format!(
                    "Product with id {} not found in index [{}]",
                    id, self.index
                ))
            })
    }
}
