//! Product repository trait definition.

use async_trait::async_trait;
use catalog_sync_shared::CatalogItem;

use crate::errors::RepositoryError;
use crate::types::{ProductPage, ProductQuery};

/// Source of truth for catalog items.
///
/// Implementations list items filtered by type and status with limit/offset
/// pagination, and look single items up by id.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// List one page of catalog items matching the query.
    ///
    /// # Returns
    ///
    /// * `Ok(ProductPage)` - The page items plus the total count and page count
    ///   of the whole listing under the same filter
    /// * `Err(RepositoryError)` - If the repository cannot be queried
    async fn list(&self, query: &ProductQuery) -> Result<ProductPage, RepositoryError>;

    /// Count the items matching the query's type and status filters.
    ///
    /// The default implementation lists the first page and reads its total.
    async fn count(&self, query: &ProductQuery) -> Result<u64, RepositoryError> {
        let first_page = ProductQuery {
            offset: 0,
            ..query.clone()
        };
        Ok(self.list(&first_page).await?.total)
    }

    /// Look a single catalog item up by id.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(CatalogItem))` - If the item exists
    /// * `Ok(None)` - If no item has this id
    /// * `Err(RepositoryError)` - If the repository cannot be queried
    async fn get_by_id(&self, id: i64) -> Result<Option<CatalogItem>, RepositoryError>;
}
