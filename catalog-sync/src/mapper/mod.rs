//! Field mapper.
//!
//! Converts one catalog item into the flat document stored in the index.

use std::sync::Arc;

use catalog_sync_shared::{CatalogItem, IndexDocument, ProductType};
use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::config::{DocumentExtender, SyncConfig};
use crate::errors::SyncError;

/// Base and reduced price of an item.
///
/// Composite products are priced from their variation range: the base price
/// is the most expensive variation, the reduced price the cheapest one.
fn item_prices(item: &CatalogItem) -> (f64, f64) {
    match (item.product_type.is_composite(), item.variation_price_range) {
        (true, Some(range)) => (range.max, range.min),
        _ => (
            item.price.unwrap_or_default(),
            item.sale_price.unwrap_or_default(),
        ),
    }
}

/// Effective price: the base price unless a non-zero reduced price is lower.
pub fn current_price(price: f64, sale_price: f64) -> f64 {
    if sale_price == 0.0 {
        price
    } else {
        price.min(sale_price)
    }
}

/// Maps catalog items to index documents.
#[derive(Clone)]
pub struct FieldMapper {
    site_url: Url,
    include_current_price: bool,
    extender: Option<Arc<dyn DocumentExtender>>,
}

impl FieldMapper {
    pub fn new(site_url: Url, include_current_price: bool) -> Self {
        Self {
            site_url,
            include_current_price,
            extender: None,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            site_url: config.site_url().clone(),
            include_current_price: config.include_current_price(),
            extender: config.document_extender().cloned(),
        }
    }

    /// Build the document for `item`.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexDocument)` - The mapped document, extender applied
    /// * `Err(SyncError::MalformedItem)` - If a timestamp is missing or the
    ///   extender changed the document id
    pub fn to_document(&self, item: &CatalogItem) -> Result<IndexDocument, SyncError> {
        let created_at = item
            .created_at
            .ok_or_else(|| SyncError::malformed(item.id, "missing creation date"))?;
        let updated_at = item
            .updated_at
            .ok_or_else(|| SyncError::malformed(item.id, "missing modification date"))?;

        let (price, sale_price) = item_prices(item);

        let document = IndexDocument {
            id: item.id,
            parent_id: item.parent_id,
            link: item.permalink.clone(),
            add_to_cart_link: self.add_to_cart_link(item),
            name: item.name.clone(),
            product_type: item.product_type.as_str().to_string(),
            desc: item.description.clone(),
            short_desc: item.short_description.clone(),
            image: item.image.clone().unwrap_or_default(),
            category: item.category_ids.clone(),
            current_price: self
                .include_current_price
                .then(|| current_price(price, sale_price)),
            price,
            sale_price,
            rating: item.average_rating,
            stock: item.is_in_stock(),
            sku: item.sku.clone(),
            qty: item.stock_quantity,
            created_at: created_at.timestamp(),
            updated_at: updated_at.timestamp(),
            extra: Default::default(),
        };

        match &self.extender {
            Some(extender) => self.apply_extender(extender.as_ref(), document, item),
            None => Ok(document),
        }
    }

    /// Build the JSON source sent to the index for `item`.
    pub fn to_source(&self, item: &CatalogItem) -> Result<Value, SyncError> {
        let document = self.to_document(item)?;
        document
            .to_source()
            .map_err(|e| SyncError::malformed(item.id, e.to_string()))
    }

    /// Purchase URL of the item.
    ///
    /// Simple products that have a price and are in stock can be added to the
    /// cart directly from the storefront root; everything else links to the
    /// product page.
    fn add_to_cart_link(&self, item: &CatalogItem) -> String {
        let purchasable = item.product_type == ProductType::Simple && item.price.is_some();
        if !purchasable || !item.is_in_stock() {
            return item.permalink.clone();
        }

        let mut url = self.site_url.clone();
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(Some(&format!("add-to-cart={}", item.id)));
        url.to_string()
    }

    fn apply_extender(
        &self,
        extender: &dyn DocumentExtender,
        document: IndexDocument,
        item: &CatalogItem,
    ) -> Result<IndexDocument, SyncError> {
        let mut document = extender.extend(document, item);

        if document.id != item.id {
            return Err(SyncError::malformed(
                item.id,
                format!("document extender changed the id to {}", document.id),
            ));
        }

        // Extra keys must not shadow base fields in the flattened source.
        document.extra.retain(|key, _| {
            let shadowed = IndexDocument::is_base_field(key);
            if shadowed {
                warn!(product_id = item.id, field = %key, "Ignoring extra field that shadows a base field");
            }
            !shadowed
        });

        Ok(document)
    }
}
