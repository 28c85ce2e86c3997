//! Bulk sync pipeline.
//!
//! Pages through the product repository, maps eligible items to documents
//! and submits one bulk request per page. Pages are processed strictly in
//! order with a single request outstanding; the first item error reported by
//! the index stops the run before the last-reindex marker is written.

mod progress;

pub use progress::{NoProgress, ReindexProgressEvent, ReindexProgressReporter, StderrProgress};

use std::sync::Arc;

use catalog_sync_repository::types::page_count;
use catalog_sync_repository::{
    BulkAction, BulkItemResult, ProductQuery, ProductRepository, SearchIndexClient, StateStore,
};
use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

use crate::config::SyncConfig;
use crate::eligibility::EligibilityFilter;
use crate::errors::SyncError;
use crate::mapper::FieldMapper;

/// Key of the last successful full reindex, stored as epoch seconds.
pub const LAST_REINDEX_KEY: &str = "last_reindex_date";

/// Size of a full reindex under the current allow-lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReindexPlan {
    pub total: u64,
    pub page_count: u32,
}

/// Upsert actions for one page, in repository order.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkBatch {
    pub page: u32,
    pub actions: Vec<BulkAction>,
    /// Page count of the listing as reported with this page.
    pub max_pages: u32,
    /// Item count of the listing as reported with this page.
    pub total: u64,
    /// Items of the page left out by the filter or the mapper.
    pub skipped: usize,
}

impl BulkBatch {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Outcome of a completed full reindex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReindexSummary {
    pub pages: u32,
    pub documents: u64,
    pub skipped: u64,
}

pub struct BulkSyncPipeline {
    client: Arc<dyn SearchIndexClient>,
    products: Arc<dyn ProductRepository>,
    state: Arc<dyn StateStore>,
    filter: EligibilityFilter,
    mapper: FieldMapper,
    index: String,
    page_size: u32,
}

impl BulkSyncPipeline {
    pub fn new(
        client: Arc<dyn SearchIndexClient>,
        products: Arc<dyn ProductRepository>,
        state: Arc<dyn StateStore>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            client,
            products,
            state,
            filter: EligibilityFilter::from_config(config),
            mapper: FieldMapper::from_config(config),
            index: config.index_name().to_string(),
            page_size: config.page_size(),
        }
    }

    fn page_query(&self, page: u32) -> ProductQuery {
        ProductQuery::page(
            self.filter.types(),
            self.filter.statuses(),
            self.filter.gate(),
            self.page_size,
            page,
        )
    }

    /// Count the items a full reindex would visit.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ReindexPlan))` - Item total and page count
    /// * `Ok(None)` - If the repository reports no items
    pub async fn count_eligible_for_reindex(&self) -> Result<Option<ReindexPlan>, SyncError> {
        let total = self.products.count(&self.page_query(0)).await?;
        if total == 0 {
            return Ok(None);
        }

        Ok(Some(ReindexPlan {
            total,
            page_count: page_count(total, self.page_size),
        }))
    }

    /// Fetch page `page` and map its admissible items to upsert actions.
    ///
    /// Items that fail the eligibility check are dropped silently; items that
    /// cannot be mapped are dropped with a warning.
    pub async fn fetch_and_map_page(&self, page: u32) -> Result<BulkBatch, SyncError> {
        let listing = self.products.list(&self.page_query(page)).await?;

        let mut actions = Vec::with_capacity(listing.items.len());
        let mut skipped = 0;

        for item in &listing.items {
            if let Err(reason) = self.filter.check(item) {
                debug!(product_id = item.id, %reason, "Skipping product");
                skipped += 1;
                continue;
            }

            match self.mapper.to_source(item) {
                Ok(source) => actions.push(BulkAction::index(item.id.to_string(), source)),
                Err(e) => {
                    warn!(product_id = item.id, error = %e, "Skipping product that cannot be mapped");
                    skipped += 1;
                }
            }
        }

        Ok(BulkBatch {
            page,
            actions,
            max_pages: listing.max_page,
            total: listing.total,
            skipped,
        })
    }

    /// Submit one batch and check every item result of that response.
    pub async fn submit(&self, batch: &BulkBatch) -> Result<(), SyncError> {
        let results = self.client.bulk(&self.index, &batch.actions).await?;

        if let Some(failed) = results.iter().find(|result| !result.is_success()) {
            return Err(bulk_item_error(failed));
        }

        debug!(
            index = %self.index,
            page = batch.page,
            documents = batch.actions.len(),
            "Page submitted"
        );
        Ok(())
    }

    /// Reindex every eligible item.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ReindexSummary))` - Every page was accepted and the
    ///   last-reindex marker was written
    /// * `Ok(None)` - If there was nothing to reindex; the marker is untouched
    /// * `Err(SyncError::BulkItemFailed)` - If the index rejected an item;
    ///   pages submitted before stay indexed
    pub async fn run_full_reindex(&self) -> Result<Option<ReindexSummary>, SyncError> {
        self.run_full_reindex_with_progress(&NoProgress).await
    }

    /// [`run_full_reindex`](Self::run_full_reindex) reporting page-level
    /// progress to `progress`.
    #[instrument(skip(self, progress), fields(index = %self.index, page_size = self.page_size))]
    pub async fn run_full_reindex_with_progress(
        &self,
        progress: &dyn ReindexProgressReporter,
    ) -> Result<Option<ReindexSummary>, SyncError> {
        let plan = match self.count_eligible_for_reindex().await? {
            Some(plan) if plan.page_count > 0 => plan,
            _ => {
                info!("No products to reindex");
                return Ok(None);
            }
        };

        info!(total = plan.total, pages = plan.page_count, "Starting full reindex");
        progress.report(ReindexProgressEvent::Planned {
            total: plan.total,
            pages: plan.page_count,
        });

        let mut summary = ReindexSummary {
            pages: plan.page_count,
            documents: 0,
            skipped: 0,
        };

        for page in 0..plan.page_count {
            let batch = self.fetch_and_map_page(page).await?;
            summary.skipped += batch.skipped as u64;

            if batch.is_empty() {
                debug!(page, "Page has no documents to submit");
                continue;
            }

            if let Err(e) = self.submit(&batch).await {
                error!(page, error = %e, "Full reindex stopped");
                return Err(e);
            }

            summary.documents += batch.actions.len() as u64;
            progress.report(ReindexProgressEvent::PageSubmitted {
                page,
                documents: batch.actions.len(),
            });
        }

        self.state
            .set(LAST_REINDEX_KEY, &Utc::now().timestamp().to_string())
            .await?;

        info!(
            pages = summary.pages,
            documents = summary.documents,
            skipped = summary.skipped,
            "Full reindex completed"
        );
        progress.report(ReindexProgressEvent::Finished {
            pages: plan.page_count,
        });

        Ok(Some(summary))
    }
}

fn bulk_item_error(result: &BulkItemResult) -> SyncError {
    let (error_type, error_reason) = result
        .error
        .as_ref()
        .map(|e| (e.error_type.clone(), e.reason.clone()))
        .unwrap_or_default();

    SyncError::BulkItemFailed {
        id: result.id.clone(),
        error_type,
        error_reason,
    }
}
