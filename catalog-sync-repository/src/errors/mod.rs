//! Error types for the catalog sync repository.
//!
//! `SearchIndexError` covers the remote search index, `RepositoryError`
//! covers the PostgreSQL-backed product repository and key-value store.

mod repository_error;
mod search_index_error;

pub use repository_error::RepositoryError;
pub use search_index_error::SearchIndexError;
