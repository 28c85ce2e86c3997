//! This module defines the core data structures shared by the catalog sync crates.
//! It re-exports the catalog item, index document and index schema types.

pub mod catalog_item;
pub mod index_document;
pub mod index_schema;

pub use catalog_item::{CatalogItem, PriceRange, ProductType, StatusGate, StockStatus};
pub use index_document::IndexDocument;
pub use index_schema::{FieldType, IndexSchema};
