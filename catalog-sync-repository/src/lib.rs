//! # Catalog Sync Repository
//!
//! This crate provides the interfaces of the collaborators the catalog
//! synchronization engine talks to, together with concrete implementations:
//!
//! - [`SearchIndexClient`]: the remote full-text search index, implemented
//!   for OpenSearch by [`OpenSearchProvider`]
//! - [`ProductRepository`]: paginated catalog listings, implemented for
//!   PostgreSQL by [`PostgresProductRepository`]
//! - [`StateStore`]: a persistent key-value store, implemented for
//!   PostgreSQL by [`PostgresStateStore`]

pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod postgres;
pub mod types;

pub use errors::{RepositoryError, SearchIndexError};
pub use interfaces::{ProductRepository, SearchIndexClient, StateStore};
pub use opensearch::OpenSearchProvider;
pub use postgres::{PostgresProductRepository, PostgresStateStore};
pub use types::{
    BulkAction, BulkItemError, BulkItemResult, ClusterInfo, IndexStatistics, ProductPage,
    ProductQuery,
};
