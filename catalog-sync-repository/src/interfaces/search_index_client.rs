//! Search index client trait definition.
//!
//! This module defines the abstract interface for the remote full-text search
//! index, allowing for different backend implementations (OpenSearch,
//! Elasticsearch, in-memory mocks).

use async_trait::async_trait;
use catalog_sync_shared::IndexSchema;
use serde_json::{Map, Value};

use crate::errors::SearchIndexError;
use crate::types::{BulkAction, BulkItemResult, ClusterInfo, IndexStatistics};

/// Abstracts the remote search index (OpenSearch, Elasticsearch, etc.).
///
/// Every call is a single synchronous request/response exchange with the
/// backend. Implementations never retry; failures are returned to the caller.
///
/// All methods return `Result<T, SearchIndexError>`. Transport failures are
/// reported as `SearchIndexError::ConnectionError`.
#[async_trait]
pub trait SearchIndexClient: Send + Sync {
    /// Check whether the index exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError>;

    /// Create the index with the mappings and settings of `schema`.
    ///
    /// Fails if the index already exists.
    async fn create_index(&self, index: &str, schema: &IndexSchema)
        -> Result<(), SearchIndexError>;

    /// Delete the index and all of its documents.
    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Apply the mappings of `schema` to an existing index.
    ///
    /// Mapping updates are additive: fields already present remotely are kept.
    async fn put_mapping(&self, index: &str, schema: &IndexSchema)
        -> Result<(), SearchIndexError>;

    /// Apply index settings to an existing index.
    async fn put_settings(
        &self,
        index: &str,
        settings: &Map<String, Value>,
    ) -> Result<(), SearchIndexError>;

    /// Open a closed index.
    async fn open_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Close an open index.
    async fn close_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Create or fully replace the document stored under `id`.
    async fn upsert_document(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<(), SearchIndexError>;

    /// Fetch the stored source of the document under `id`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Value))` - The stored `_source` of the document
    /// * `Ok(None)` - If the document (or the index) does not exist
    async fn get_document(&self, index: &str, id: &str) -> Result<Option<Value>, SearchIndexError>;

    /// Delete the document under `id`.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the document was deleted
    /// * `Ok(false)` - If the document did not exist
    async fn delete_document(&self, index: &str, id: &str) -> Result<bool, SearchIndexError>;

    /// Submit a bulk request and return one result per action, in order.
    ///
    /// A request-level failure is an `Err`; item-level failures are reported
    /// in the returned results.
    async fn bulk(
        &self,
        index: &str,
        actions: &[BulkAction],
    ) -> Result<Vec<BulkItemResult>, SearchIndexError>;

    /// Check whether the service answers at all.
    async fn ping(&self) -> Result<bool, SearchIndexError>;

    /// Version information of the service.
    async fn info(&self) -> Result<ClusterInfo, SearchIndexError>;

    /// Document count and store size of the index.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(IndexStatistics))` - Statistics of the index
    /// * `Ok(None)` - If the index does not exist
    async fn stats(&self, index: &str) -> Result<Option<IndexStatistics>, SearchIndexError>;
}
