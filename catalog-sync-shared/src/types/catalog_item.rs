//! Catalog item types.
//!
//! A catalog item is one sellable product record as supplied by the product
//! repository. The synchronization engine only ever reads these values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of product.
///
/// The set of kinds is open: storefront extensions can register their own
/// product types, which are carried through as [`ProductType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductType {
    Simple,
    Variable,
    Grouped,
    External,
    Variation,
    Other(String),
}

impl ProductType {
    /// Returns the canonical string form used by the storefront.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Simple => "simple",
            Self::Variable => "variable",
            Self::Grouped => "grouped",
            Self::External => "external",
            Self::Variation => "variation",
            Self::Other(kind) => kind.as_str(),
        }
    }

    /// Composite products are priced from the range of their variations.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Variable)
    }
}

impl From<String> for ProductType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "simple" => Self::Simple,
            "variable" => Self::Variable,
            "grouped" => Self::Grouped,
            "external" => Self::External,
            "variation" => Self::Variation,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for ProductType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ProductType> for String {
    fn from(value: ProductType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stock status of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    InStock,
    OutOfStock,
    OnBackorder,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "instock",
            Self::OutOfStock => "outofstock",
            Self::OnBackorder => "onbackorder",
        }
    }
}

impl FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instock" => Ok(Self::InStock),
            "outofstock" => Ok(Self::OutOfStock),
            "onbackorder" => Ok(Self::OnBackorder),
            other => Err(format!("unknown stock status '{}'", other)),
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which status of a catalog item the status allow-list is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusGate {
    /// Compare against the publish status (`publish`, `draft`, `private`, ...).
    #[default]
    Publish,
    /// Compare against the stock status (`instock`, `outofstock`, ...).
    Stock,
}

impl FromStr for StatusGate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "publish" | "status" | "post_status" => Ok(Self::Publish),
            "stock" | "stock_status" => Ok(Self::Stock),
            other => Err(format!(
                "unknown eligibility gate '{}', expected 'publish' or 'stock'",
                other
            )),
        }
    }
}

/// Minimum and maximum price over the variations of a composite product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// One sellable product record from the product repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub parent_id: i64,
    pub product_type: ProductType,
    /// Publish status (`publish`, `draft`, ...).
    pub status: String,
    pub stock_status: StockStatus,
    /// Whether stock quantity is managed manually for this item.
    pub manage_stock: bool,
    pub price: Option<f64>,
    pub sale_price: Option<f64>,
    /// Only set for composite product types.
    pub variation_price_range: Option<PriceRange>,
    pub name: String,
    pub description: String,
    pub short_description: String,
    pub permalink: String,
    /// Rendered image reference (URL of the sized image), if the item has one.
    pub image: Option<String>,
    pub category_ids: Vec<i64>,
    pub sku: String,
    pub stock_quantity: Option<i64>,
    pub average_rating: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogItem {
    /// Returns the status value the given gate compares against.
    pub fn status_for(&self, gate: StatusGate) -> &str {
        match gate {
            StatusGate::Publish => &self.status,
            StatusGate::Stock => self.stock_status.as_str(),
        }
    }

    /// True when stock is managed manually and the item is sold out.
    pub fn is_managed_out_of_stock(&self) -> bool {
        self.manage_stock && self.stock_status == StockStatus::OutOfStock
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock_status == StockStatus::InStock
    }
}
