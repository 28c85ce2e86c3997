//! Search index error types.
//!
//! This module defines the error type for all operations against the remote
//! search index, from transport failures to malformed responses.

use thiserror::Error;

/// Errors from search index operations.
///
/// Used by the `SearchIndexClient` trait for every remote call so that the
/// engine can tell an unreachable service apart from a rejected request.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Failed to reach the search index backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The backend answered with a non-success status.
    #[error("{operation} failed with status {status}: {body}")]
    RequestError {
        operation: String,
        status: u16,
        body: String,
    },

    /// The target index does not exist.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// Document not found.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Failed to parse a response from the backend.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize data for the backend.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid client configuration or input.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl SearchIndexError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a request error from a failed response.
    pub fn request(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::RequestError {
            operation: operation.into(),
            status,
            body: body.into(),
        }
    }

    /// Create an index not found error.
    pub fn index_not_found(index: impl Into<String>) -> Self {
        Self::IndexNotFound(index.into())
    }

    /// Create a document not found error.
    pub fn document_not_found(index: &str, id: &str) -> Self {
        Self::DocumentNotFound(format!("index={}, id={}", index, id))
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// True when the backend could not be reached at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }
}

impl From<serde_json::Error> for SearchIndexError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_message() {
        let err = SearchIndexError::request("Create index", 400, "resource_already_exists");
        assert_eq!(
            err.to_string(),
            "Create index failed with status 400: resource_already_exists"
        );
        assert!(!err.is_connection());
    }

    #[test]
    fn test_connection_error_is_detected() {
        assert!(SearchIndexError::connection("refused").is_connection());
    }
}
