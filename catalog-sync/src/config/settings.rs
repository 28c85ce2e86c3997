//! Engine configuration.

use std::env;
use std::fmt;
use std::sync::Arc;

use catalog_sync_shared::StatusGate;
use serde_json::{json, Map, Value};
use url::Url;

use super::extenders::{DocumentExtender, SchemaExtender};
use crate::errors::SyncError;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_HOSTS: &str = "http://localhost:9200";

/// Default storefront URL.
const DEFAULT_SITE_URL: &str = "http://localhost";

/// Default number of items per bulk page.
const DEFAULT_BULK_PAGE_SIZE: u32 = 100;

/// Default allowed product type.
const DEFAULT_ALLOWED_PRODUCT_TYPES: &str = "simple";

/// Default allowed product status.
const DEFAULT_ALLOWED_PRODUCT_STATUSES: &str = "publish";

/// Index name used when the storefront URL has no host.
const FALLBACK_INDEX_NAME: &str = "catalog";

/// Process-wide configuration of the sync engine.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct SyncConfig {
    hosts: Vec<String>,
    site_url: Url,
    index_name: String,
    page_size: u32,
    allowed_types: Vec<String>,
    allowed_statuses: Vec<String>,
    gate: StatusGate,
    include_current_price: bool,
    reopen_on_settings_update: bool,
    index_settings: Map<String, Value>,
    schema_extender: Option<Arc<dyn SchemaExtender>>,
    document_extender: Option<Arc<dyn DocumentExtender>>,
}

impl SyncConfig {
    /// Create a configuration with default allow-lists and page size.
    ///
    /// The index name defaults to the storefront host with dots replaced by
    /// dashes (`shop.example.com` becomes `shop-example-com`).
    ///
    /// # Arguments
    ///
    /// * `hosts` - Remote search index hosts, in order of preference
    /// * `site_url` - Storefront base URL
    pub fn new(hosts: Vec<String>, site_url: &str) -> Result<Self, SyncError> {
        let site_url = Url::parse(site_url)
            .map_err(|e| SyncError::config(format!("Invalid SITE_URL '{}': {}", site_url, e)))?;

        Ok(Self {
            hosts,
            index_name: default_index_name(&site_url),
            site_url,
            page_size: DEFAULT_BULK_PAGE_SIZE,
            allowed_types: split_list(DEFAULT_ALLOWED_PRODUCT_TYPES),
            allowed_statuses: split_list(DEFAULT_ALLOWED_PRODUCT_STATUSES),
            gate: StatusGate::default(),
            include_current_price: true,
            reopen_on_settings_update: false,
            index_settings: Map::new(),
            schema_extender: None,
            document_extender: None,
        })
    }

    /// Load the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_HOSTS`: comma-separated host list (default: http://localhost:9200)
    /// - `SITE_URL`: storefront base URL (default: http://localhost)
    /// - `INDEX_NAME`: index name (default: derived from the `SITE_URL` host)
    /// - `BULK_PAGE_SIZE`: items per bulk page (default: 100)
    /// - `ALLOWED_PRODUCT_TYPES`: comma-separated types (default: simple)
    /// - `ALLOWED_PRODUCT_STATUSES`: comma-separated statuses (default: publish)
    /// - `ELIGIBILITY_GATE`: "publish" or "stock" (default: publish)
    /// - `INCLUDE_CURRENT_PRICE`: index the effective price (default: true)
    /// - `REOPEN_ON_SETTINGS_UPDATE`: close the index around settings updates (default: false)
    /// - `INDEX_SHARDS`, `INDEX_REPLICAS`: optional index settings
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let hosts = split_list(
            &var("OPENSEARCH_HOSTS").unwrap_or_else(|| DEFAULT_OPENSEARCH_HOSTS.to_string()),
        );
        let site_url = var("SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.to_string());

        let mut config = Self::new(hosts, &site_url)?;

        if let Some(index_name) = var("INDEX_NAME") {
            config.index_name = index_name.trim().to_string();
        }
        if let Some(page_size) = var("BULK_PAGE_SIZE") {
            config.page_size = parse_number("BULK_PAGE_SIZE", &page_size)?;
        }
        if let Some(types) = var("ALLOWED_PRODUCT_TYPES") {
            config.allowed_types = split_list(&types);
        }
        if let Some(statuses) = var("ALLOWED_PRODUCT_STATUSES") {
            config.allowed_statuses = split_list(&statuses);
        }
        if let Some(gate) = var("ELIGIBILITY_GATE") {
            config.gate = gate.parse().map_err(SyncError::config)?;
        }
        if let Some(flag) = var("INCLUDE_CURRENT_PRICE") {
            config.include_current_price = parse_flag("INCLUDE_CURRENT_PRICE", &flag)?;
        }
        if let Some(flag) = var("REOPEN_ON_SETTINGS_UPDATE") {
            config.reopen_on_settings_update = parse_flag("REOPEN_ON_SETTINGS_UPDATE", &flag)?;
        }
        if let Some(shards) = var("INDEX_SHARDS") {
            let shards: u32 = parse_number("INDEX_SHARDS", &shards)?;
            config.index_settings.insert("number_of_shards".into(), json!(shards));
        }
        if let Some(replicas) = var("INDEX_REPLICAS") {
            let replicas: u32 = parse_number("INDEX_REPLICAS", &replicas)?;
            config
                .index_settings
                .insert("number_of_replicas".into(), json!(replicas));
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.hosts.is_empty() {
            return Err(SyncError::config("At least one OpenSearch host is required"));
        }
        if self.page_size == 0 {
            return Err(SyncError::config("BULK_PAGE_SIZE must be greater than zero"));
        }
        if self.index_name.is_empty() {
            return Err(SyncError::config("Index name must not be empty"));
        }
        Ok(())
    }

    pub fn with_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = index_name.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_allowed_types(mut self, types: Vec<String>) -> Self {
        self.allowed_types = types;
        self
    }

    pub fn with_allowed_statuses(mut self, statuses: Vec<String>) -> Self {
        self.allowed_statuses = statuses;
        self
    }

    pub fn with_gate(mut self, gate: StatusGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_current_price(mut self, include: bool) -> Self {
        self.include_current_price = include;
        self
    }

    pub fn with_reopen_on_settings_update(mut self, reopen: bool) -> Self {
        self.reopen_on_settings_update = reopen;
        self
    }

    /// Add one index setting (e.g. `number_of_replicas`).
    pub fn with_index_setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.index_settings.insert(key.into(), value);
        self
    }

    pub fn with_schema_extender(mut self, extender: impl SchemaExtender + 'static) -> Self {
        self.schema_extender = Some(Arc::new(extender));
        self
    }

    pub fn with_document_extender(mut self, extender: impl DocumentExtender + 'static) -> Self {
        self.document_extender = Some(Arc::new(extender));
        self
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn site_url(&self) -> &Url {
        &self.site_url
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn allowed_types(&self) -> &[String] {
        &self.allowed_types
    }

    pub fn allowed_statuses(&self) -> &[String] {
        &self.allowed_statuses
    }

    pub fn gate(&self) -> StatusGate {
        self.gate
    }

    pub fn include_current_price(&self) -> bool {
        self.include_current_price
    }

    pub fn reopen_on_settings_update(&self) -> bool {
        self.reopen_on_settings_update
    }

    pub fn index_settings(&self) -> &Map<String, Value> {
        &self.index_settings
    }

    pub fn schema_extender(&self) -> Option<&Arc<dyn SchemaExtender>> {
        self.schema_extender.as_ref()
    }

    pub fn document_extender(&self) -> Option<&Arc<dyn DocumentExtender>> {
        self.document_extender.as_ref()
    }
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("hosts", &self.hosts)
            .field("site_url", &self.site_url.as_str())
            .field("index_name", &self.index_name)
            .field("page_size", &self.page_size)
            .field("allowed_types", &self.allowed_types)
            .field("allowed_statuses", &self.allowed_statuses)
            .field("gate", &self.gate)
            .field("include_current_price", &self.include_current_price)
            .field("reopen_on_settings_update", &self.reopen_on_settings_update)
            .field("index_settings", &self.index_settings)
            .field("schema_extender", &self.schema_extender.is_some())
            .field("document_extender", &self.document_extender.is_some())
            .finish()
    }
}

/// Index name derived from the storefront host.
pub fn default_index_name(site_url: &Url) -> String {
    match site_url.host_str() {
        Some(host) if !host.is_empty() => host.replace('.', "-"),
        _ => FALLBACK_INDEX_NAME.to_string(),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_number(key: &str, value: &str) -> Result<u32, SyncError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|e| SyncError::config(format!("Invalid {} '{}': {}", key, value, e)))
}

fn parse_flag(key: &str, value: &str) -> Result<bool, SyncError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SyncError::config(format!(
            "Invalid {} '{}', expected true or false",
            key, other
        ))),
    }
}
