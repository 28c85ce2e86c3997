//! # Catalog Sync
//!
//! Keeps a product catalog in sync with an OpenSearch index.
//!
//! ## Architecture
//!
//! Products are read from the catalog repository, filtered by the
//! eligibility rules, mapped to index documents and written to the index,
//! either page by page during a full reindex or one at a time when a single
//! product changes.
//!
//! ## Modules
//!
//! - [`config`]: Settings, extension hooks and dependency wiring
//! - [`eligibility`]: Which products may be indexed
//! - [`mapper`]: Product to index document conversion
//! - [`schema`]: Index creation, update and deletion
//! - [`pipeline`]: Paginated full reindex
//! - [`single`]: Single product upsert, removal and lookup
//! - [`stats`]: Health and size of the index
//! - [`cli`]: Command surface of the binary
//! - [`errors`]: Error types for the engine

pub mod cli;
pub mod config;
pub mod eligibility;
pub mod engine;
pub mod errors;
pub mod mapper;
pub mod pipeline;
pub mod schema;
pub mod single;
pub mod stats;

#[cfg(test)]
mod test_support;

pub use config::{Dependencies, DocumentExtender, SchemaExtender, SyncConfig};
pub use eligibility::{EligibilityFilter, Ineligibility};
pub use engine::CatalogSyncEngine;
pub use errors::SyncError;
pub use mapper::FieldMapper;
pub use pipeline::{BulkSyncPipeline, ReindexSummary};
pub use schema::SchemaManager;
pub use single::{OnIneligible, SingleItemSync, UpsertOutcome};
pub use stats::{IndexStats, StatAggregator};
