//! Eligibility filter.
//!
//! Decides whether a catalog item may be present in the index under the
//! configured type and status allow-lists.

use std::fmt;

use catalog_sync_shared::{CatalogItem, StatusGate};

use crate::config::SyncConfig;

/// Why an item was kept out of the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ineligibility {
    /// The product type is not in the allow-list.
    ProductType(String),
    /// The gated status is not in the allow-list.
    Status(String),
    /// Stock is managed manually and the item is sold out.
    ManagedOutOfStock,
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProductType(kind) => write!(f, "product type '{}' is not allowed", kind),
            Self::Status(status) => write!(f, "status '{}' is not allowed", status),
            Self::ManagedOutOfStock => f.write_str("stock is managed and the product is out of stock"),
        }
    }
}

/// Type and status allow-lists.
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    types: Vec<String>,
    statuses: Vec<String>,
    gate: StatusGate,
}

impl EligibilityFilter {
    pub fn new(types: Vec<String>, statuses: Vec<String>, gate: StatusGate) -> Self {
        Self {
            types,
            statuses,
            gate,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(
            config.allowed_types().to_vec(),
            config.allowed_statuses().to_vec(),
            config.gate(),
        )
    }

    /// True iff the item's type and gated status are both allowed.
    pub fn is_eligible(&self, item: &CatalogItem) -> bool {
        self.allows_type(item) && self.allows_status(item)
    }

    /// Full admission check used before anything is written to the index.
    ///
    /// On top of the allow-lists, items whose stock is managed manually and
    /// that are currently out of stock are kept out.
    pub fn check(&self, item: &CatalogItem) -> Result<(), Ineligibility> {
        if !self.allows_type(item) {
            return Err(Ineligibility::ProductType(
                item.product_type.as_str().to_string(),
            ));
        }
        if !self.allows_status(item) {
            return Err(Ineligibility::Status(item.status_for(self.gate).to_string()));
        }
        if item.is_managed_out_of_stock() {
            return Err(Ineligibility::ManagedOutOfStock);
        }
        Ok(())
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    pub fn gate(&self) -> StatusGate {
        self.gate
    }

    fn allows_type(&self, item: &CatalogItem) -> bool {
        self.types
            .iter()
            .any(|allowed| allowed == item.product_type.as_str())
    }

    fn allows_status(&self, item: &CatalogItem) -> bool {
        let status = item.status_for(self.gate);
        self.statuses.iter().any(|allowed| allowed == status)
    }
}
