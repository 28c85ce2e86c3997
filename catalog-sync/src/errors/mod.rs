//! Error types for the catalog sync engine.

use catalog_sync_repository::{RepositoryError, SearchIndexError};
use thiserror::Error;

/// Errors returned by the synchronization engine.
///
/// Eligibility and not-found conditions are explicit variants rather than
/// transport errors, so callers can decide how loudly to report them.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A schema operation (create, update, delete) failed remotely.
    #[error("Schema operation failed: {0}")]
    SchemaOperationFailed(String),

    /// The index to create already exists.
    #[error("Index [{0}] already exists")]
    AlreadyExists(String),

    /// One item of a bulk submission was rejected by the index.
    #[error("Can't bulk add data to the index. Error on item with id {id}. Error type: {error_type}. Error reason: {error_reason}")]
    BulkItemFailed {
        id: String,
        error_type: String,
        error_reason: String,
    },

    /// The requested product or document does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The item is not allowed in the index under the current allow-lists.
    #[error("Product {id} is not eligible for the index: {reason}")]
    NotEligible { id: i64, reason: String },

    /// The product repository or key-value store could not be queried.
    #[error("Repository unavailable: {0}")]
    RepositoryUnavailable(String),

    /// The search index service could not be reached.
    #[error("Search index unreachable: {0}")]
    RemoteUnreachable(String),

    /// The item lacks data required to build its document.
    #[error("Malformed product {id}: {reason}")]
    MalformedItem { id: i64, reason: String },

    /// The search index rejected a request.
    #[error("Search index error: {0}")]
    Remote(SearchIndexError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SyncError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a malformed item error.
    pub fn malformed(id: i64, reason: impl Into<String>) -> Self {
        Self::MalformedItem {
            id,
            reason: reason.into(),
        }
    }

    /// Wrap a failed remote call made while managing the schema.
    pub fn schema(err: SearchIndexError) -> Self {
        Self::SchemaOperationFailed(err.to_string())
    }
}

impl From<SearchIndexError> for SyncError {
    fn from(err: SearchIndexError) -> Self {
        if err.is_connection() {
            Self::RemoteUnreachable(err.to_string())
        } else {
            Self::Remote(err)
        }
    }
}

impl From<RepositoryError> for SyncError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::InvalidRow { id, reason } => Self::MalformedItem { id, reason },
            other => Self::RepositoryUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_errors_map_to_unreachable() {
        let err: SyncError = SearchIndexError::connection("refused").into();
        assert!(matches!(err, SyncError::RemoteUnreachable(_)));

        let err: SyncError = SearchIndexError::request("Get document", 500, "boom").into();
        assert!(matches!(err, SyncError::Remote(_)));
    }

    #[test]
    fn test_unreadable_row_is_a_malformed_item() {
        let err: SyncError = RepositoryError::InvalidRow {
            id: 15,
            reason: "unknown stock status 'discontinued'".to_string(),
        }
        .into();

        assert!(matches!(err, SyncError::MalformedItem { id: 15, .. }));
    }

    #[test]
    fn test_bulk_item_message_names_the_item() {
        let err = SyncError::BulkItemFailed {
            id: "17".to_string(),
            error_type: "mapper_parsing_exception".to_string(),
            error_reason: "failed to parse".to_string(),
        };
        let message = err.to_string();

        assert!(message.contains("id 17"));
        assert!(message.contains("mapper_parsing_exception"));
        assert!(message.contains("failed to parse"));
    }
}
