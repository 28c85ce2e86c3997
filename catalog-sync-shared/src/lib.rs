//! # Catalog Sync Shared
//!
//! This crate defines shared data structures used across the catalog
//! synchronization crates: the catalog items read from the product
//! repository, the flattened documents stored in the search index and the
//! index schema those documents conform to.

pub mod types;

pub use types::catalog_item::{CatalogItem, PriceRange, ProductType, StatusGate, StockStatus};
pub use types::index_document::IndexDocument;
pub use types::index_schema::{FieldType, IndexSchema};
