//! Index document types for the search index.
//!
//! This module defines the flattened document structure that is stored in the
//! search index for one catalog item.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Document representation for the search index.
///
/// One document exists per eligible catalog item; `id` is the document's
/// unique key inside the index.
///
/// # Fields
///
/// - `id`, `parent_id`: catalog item identifiers
/// - `link`, `add_to_cart_link`: storefront URLs
/// - `name`, `product_type`, `desc`, `short_desc`: copied from the item
/// - `image`: rendered image reference, empty when the item has none
/// - `category`: category ids
/// - `price`, `sale_price`: base and reduced price
/// - `current_price`: effective price, only present when the schema includes it
/// - `rating`: average rating
/// - `stock`: true iff the item is in stock
/// - `sku`, `qty`: stock keeping unit and stock quantity
/// - `created_at`, `updated_at`: epoch seconds
/// - `extra`: fields added by a document extender
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexDocument {
    pub id: i64,
    pub parent_id: i64,
    pub link: String,
    pub add_to_cart_link: String,
    pub name: String,
    pub product_type: String,
    pub desc: String,
    pub short_desc: String,
    pub image: String,
    pub category: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    pub price: f64,
    pub sale_price: f64,
    pub rating: f64,
    pub stock: bool,
    pub sku: String,
    pub qty: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IndexDocument {
    /// Names of the fields every document carries, in schema order.
    pub const BASE_FIELDS: [&'static str; 19] = [
        "id",
        "parent_id",
        "link",
        "add_to_cart_link",
        "name",
        "product_type",
        "desc",
        "short_desc",
        "image",
        "category",
        "current_price",
        "price",
        "sale_price",
        "rating",
        "stock",
        "sku",
        "qty",
        "created_at",
        "updated_at",
    ];

    /// Generate the document ID used in the search index.
    pub fn document_id(&self) -> String {
        self.id.to_string()
    }

    /// Returns true when `key` names one of the base document fields.
    pub fn is_base_field(key: &str) -> bool {
        Self::BASE_FIELDS.contains(&key)
    }

    /// Serialize the document into the JSON source sent to the index.
    pub fn to_source(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
