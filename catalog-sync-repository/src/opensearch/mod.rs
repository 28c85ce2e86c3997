//! OpenSearch implementation of the search index client.
//!
//! This module provides a concrete implementation of `SearchIndexClient`
//! using OpenSearch as the backend.

mod provider;
mod response;

pub use provider::OpenSearchProvider;
