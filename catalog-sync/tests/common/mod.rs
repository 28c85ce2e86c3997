//! In-memory collaborators for the integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use catalog_sync::{CatalogSyncEngine, SyncConfig};
use catalog_sync_repository::types::page_count;
use catalog_sync_repository::{
    BulkAction, BulkItemResult, ClusterInfo, IndexStatistics, ProductPage, ProductQuery,
    ProductRepository, RepositoryError, SearchIndexClient, SearchIndexError, StateStore,
};
use catalog_sync_shared::{CatalogItem, IndexSchema, ProductType, StockStatus};
use chrono::{TimeZone, Utc};
use serde_json::{Map, Value};

pub const INDEX: &str = "shop-example-com";

pub fn product(id: i64) -> CatalogItem {
    CatalogItem {
        id,
        parent_id: 0,
        product_type: ProductType::Simple,
        status: "publish".to_string(),
        stock_status: StockStatus::InStock,
        manage_stock: false,
        price: Some(9.5),
        sale_price: None,
        variation_price_range: None,
        name: format!("Item {}", id),
        description: "Description".to_string(),
        short_description: String::new(),
        permalink: format!("http://shop.example.com/?p={}", id),
        image: None,
        category_ids: vec![1],
        sku: format!("IT-{}", id),
        stock_quantity: None,
        average_rating: 0.0,
        created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
        updated_at: Some(Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap()),
    }
}

#[derive(Default)]
struct Store {
    indices: HashMap<String, BTreeMap<String, Value>>,
    bulk_sizes: Vec<usize>,
    failing_ids: HashSet<String>,
}

#[derive(Default)]
pub struct InMemoryIndex {
    store: Mutex<Store>,
}

impl InMemoryIndex {
    pub fn with_index(self, index: &str) -> Self {
        self.store
            .lock()
            .unwrap()
            .indices
            .insert(index.to_string(), BTreeMap::new());
        self
    }

    pub fn fail_item(&self, id: &str) {
        self.store
            .lock()
            .unwrap()
            .failing_ids
            .insert(id.to_string());
    }

    pub fn bulk_sizes(&self) -> Vec<usize> {
        self.store.lock().unwrap().bulk_sizes.clone()
    }

    pub fn exists(&self, index: &str) -> bool {
        self.store.lock().unwrap().indices.contains_key(index)
    }

    pub fn doc_count(&self, index: &str) -> usize {
        self.store
            .lock()
            .unwrap()
            .indices
            .get(index)
            .map_or(0, |docs| docs.len())
    }

    pub fn document(&self, index: &str, id: &str) -> Option<Value> {
        self.store
            .lock()
            .unwrap()
            .indices
            .get(index)
            .and_then(|docs| docs.get(id).cloned())
    }
}

#[async_trait]
impl SearchIndexClient for InMemoryIndex {
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        Ok(self.exists(index))
    }

    async fn create_index(&self, index: &str, _: &IndexSchema) -> Result<(), SearchIndexError> {
        let mut store = self.store.lock().unwrap();
        if store.indices.contains_key(index) {
            return Err(SearchIndexError::request("Create index", 400, "already exists"));
        }
        store.indices.insert(index.to_string(), BTreeMap::new());
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        self.store
            .lock()
            .unwrap()
            .indices
            .remove(index)
            .map(|_| ())
            .ok_or_else(|| SearchIndexError::index_not_found(index))
    }

    async fn put_mapping(&self, _: &str, _: &IndexSchema) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn put_settings(&self, _: &str, _: &Map<String, Value>) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn open_index(&self, _: &str) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn close_index(&self, _: &str) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn upsert_document(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<(), SearchIndexError> {
        self.store
            .lock()
            .unwrap()
            .indices
            .entry(index.to_string())
            .or_default()
            .insert(id.to_string(), document.clone());
        Ok(())
    }

    async fn get_document(&self, index: &str, id: &str) -> Result<Option<Value>, SearchIndexError> {
        Ok(self.document(index, id))
    }

    async fn delete_document(&self, index: &str, id: &str) -> Result<bool, SearchIndexError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .indices
            .get_mut(index)
            .and_then(|docs| docs.remove(id))
            .is_some())
    }

    async fn bulk(
        &self,
        index: &str,
        actions: &[BulkAction],
    ) -> Result<Vec<BulkItemResult>, SearchIndexError> {
        let mut store = self.store.lock().unwrap();
        store.bulk_sizes.push(actions.len());
        let failing = store.failing_ids.clone();
        let docs = store.indices.entry(index.to_string()).or_default();

        Ok(actions
            .iter()
            .map(|action| {
                if failing.contains(action.id()) {
                    return BulkItemResult::failed(
                        action.id(),
                        400,
                        "mapper_parsing_exception",
                        "failed to parse",
                    );
                }
                docs.insert(action.id.clone(), action.document.clone());
                BulkItemResult::ok(action.id(), 201)
            })
            .collect())
    }

    async fn ping(&self) -> Result<bool, SearchIndexError> {
        Ok(true)
    }

    async fn info(&self) -> Result<ClusterInfo, SearchIndexError> {
        Ok(ClusterInfo {
            version: Some("2.11.0".to_string()),
            cluster_name: None,
            distribution: None,
        })
    }

    async fn stats(&self, index: &str) -> Result<Option<IndexStatistics>, SearchIndexError> {
        Ok(self
            .store
            .lock()
            .unwrap()
            .indices
            .get(index)
            .map(|docs| IndexStatistics {
                doc_count: docs.len() as u64,
                size_in_bytes: docs.len() as u64 * 512,
            }))
    }
}

pub struct InMemoryProducts {
    items: Vec<CatalogItem>,
}

impl InMemoryProducts {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    pub fn range(count: i64) -> Self {
        Self::new((1..=count).map(product).collect())
    }
}

#[async_trait]
impl ProductRepository for InMemoryProducts {
    async fn list(&self, query: &ProductQuery) -> Result<ProductPage, RepositoryError> {
        let matching: Vec<&CatalogItem> = self
            .items
            .iter()
            .filter(|item| query.types.iter().any(|t| t == item.product_type.as_str()))
            .filter(|item| query.statuses.iter().any(|s| s == item.status_for(query.gate)))
            .collect();
        let total = matching.len() as u64;

        Ok(ProductPage {
            items: matching
                .into_iter()
                .skip(query.offset as usize)
                .take(query.limit as usize)
                .cloned()
                .collect(),
            total,
            max_page: page_count(total, query.limit),
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<CatalogItem>, RepositoryError> {
        Ok(self.items.iter().find(|item| item.id == id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryState {
    values: Mutex<HashMap<String, String>>,
}

impl InMemoryState {
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl StateStore for InMemoryState {
    async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub fn config() -> SyncConfig {
    SyncConfig::new(vec!["http://localhost:9200".into()], "http://shop.example.com").unwrap()
}

pub fn engine(
    config: SyncConfig,
    index: Arc<InMemoryIndex>,
    products: InMemoryProducts,
    state: Arc<InMemoryState>,
) -> CatalogSyncEngine {
    CatalogSyncEngine::new(config, index, Arc::new(products), state).unwrap()
}
