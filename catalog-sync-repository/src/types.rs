//! Request and response types shared by the collaborator interfaces.

use catalog_sync_shared::{CatalogItem, StatusGate};
use serde_json::Value;

/// One upsert inside a bulk submission: index (create or fully replace)
/// `document` under `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkAction {
    pub id: String,
    pub document: Value,
}

impl BulkAction {
    pub fn index(id: impl Into<String>, document: Value) -> Self {
        Self {
            id: id.into(),
            document,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Error reported by the backend for one bulk item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItemError {
    pub error_type: String,
    pub reason: String,
}

/// Result of one action of a bulk submission, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItemResult {
    /// The document id the action targeted.
    pub id: String,
    /// HTTP status reported for the item.
    pub status: u16,
    /// Error details if the item failed.
    pub error: Option<BulkItemError>,
}

impl BulkItemResult {
    pub fn ok(id: impl Into<String>, status: u16) -> Self {
        Self {
            id: id.into(),
            status,
            error: None,
        }
    }

    pub fn failed(
        id: impl Into<String>,
        status: u16,
        error_type: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            status,
            error: Some(BulkItemError {
                error_type: error_type.into(),
                reason: reason.into(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Version and identity information of the remote service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterInfo {
    pub version: Option<String>,
    pub cluster_name: Option<String>,
    pub distribution: Option<String>,
}

/// Size statistics of one index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStatistics {
    pub doc_count: u64,
    pub size_in_bytes: u64,
}

/// Listing request against the product repository.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    /// Allowed product types.
    pub types: Vec<String>,
    /// Allowed statuses, compared against the status selected by `gate`.
    pub statuses: Vec<String>,
    pub gate: StatusGate,
    pub limit: u32,
    pub offset: u64,
}

impl ProductQuery {
    /// Query for the page at `page_index` with a fixed page size.
    pub fn page(
        types: &[String],
        statuses: &[String],
        gate: StatusGate,
        page_size: u32,
        page_index: u32,
    ) -> Self {
        Self {
            types: types.to_vec(),
            statuses: statuses.to_vec(),
            gate,
            limit: page_size,
            offset: u64::from(page_index) * u64::from(page_size),
        }
    }
}

/// One page of catalog items plus the totals of the whole listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPage {
    pub items: Vec<CatalogItem>,
    /// Number of items matching the query across all pages.
    pub total: u64,
    /// Number of pages of `limit` items.
    pub max_page: u32,
}

/// Number of pages needed to list `total` items with `page_size` per page.
pub fn page_count(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}
