use async_trait::async_trait;

use crate::errors::RepositoryError;

/// Persistent key-value store.
///
/// The engine keeps a single value in it: the timestamp of the last
/// successful full reindex.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError>;
}
