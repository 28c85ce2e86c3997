//! In-memory collaborators shared by the unit tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use catalog_sync_repository::types::page_count;
use catalog_sync_repository::{
    BulkAction, BulkItemResult, ClusterInfo, IndexStatistics, ProductPage, ProductQuery,
    ProductRepository, RepositoryError, SearchIndexClient, SearchIndexError, StateStore,
};
use catalog_sync_shared::{CatalogItem, IndexSchema, ProductType, StockStatus};
use chrono::{TimeZone, Utc};
use serde_json::{Map, Value};

pub(crate) fn sample_item(id: i64) -> CatalogItem {
    CatalogItem {
        id,
        parent_id: 0,
        product_type: ProductType::Simple,
        status: "publish".to_string(),
        stock_status: StockStatus::InStock,
        manage_stock: false,
        price: Some(20.0),
        sale_price: None,
        variation_price_range: None,
        name: format!("Product {}", id),
        description: "A   long\n description".to_string(),
        short_description: "Short".to_string(),
        permalink: format!("http://shop.example.com/product/{}", id),
        image: Some(format!("http://shop.example.com/img/{}.jpg", id)),
        category_ids: vec![15, 16],
        sku: format!("SKU-{}", id),
        stock_quantity: Some(5),
        average_rating: 4.0,
        created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        updated_at: Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()),
    }
}

#[derive(Default)]
struct MockIndex {
    schema: IndexSchema,
    settings: Map<String, Value>,
    documents: BTreeMap<String, Value>,
}

#[derive(Default)]
struct MockIndexState {
    indices: HashMap<String, MockIndex>,
    bulk_calls: Vec<Vec<String>>,
    calls: Vec<String>,
    failing_ids: HashSet<String>,
    unreachable: bool,
    ping_fails: bool,
}

/// In-memory search index recording every call.
#[derive(Default)]
pub(crate) struct MockSearchIndex {
    state: Mutex<MockIndexState>,
}

impl MockSearchIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_index(self, index: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .indices
            .insert(index.to_string(), MockIndex::default());
        self
    }

    pub(crate) fn unreachable(self) -> Self {
        self.state.lock().unwrap().unreachable = true;
        self
    }

    /// Answer pings negatively while every other call still succeeds.
    pub(crate) fn failing_ping(self) -> Self {
        self.state.lock().unwrap().ping_fails = true;
        self
    }

    /// Make bulk submissions report an error for this document id.
    pub(crate) fn fail_item(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_ids
            .insert(id.to_string());
    }

    pub(crate) fn bulk_calls(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().bulk_calls.clone()
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn has_index(&self, index: &str) -> bool {
        self.state.lock().unwrap().indices.contains_key(index)
    }

    pub(crate) fn document(&self, index: &str, id: &str) -> Option<Value> {
        self.state
            .lock()
            .unwrap()
            .indices
            .get(index)
            .and_then(|idx| idx.documents.get(id).cloned())
    }

    pub(crate) fn put_document(&self, index: &str, id: &str, document: Value) {
        self.state
            .lock()
            .unwrap()
            .indices
            .entry(index.to_string())
            .or_default()
            .documents
            .insert(id.to_string(), document);
    }

    pub(crate) fn schema(&self, index: &str) -> Option<IndexSchema> {
        self.state
            .lock()
            .unwrap()
            .indices
            .get(index)
            .map(|idx| idx.schema.clone())
    }

    pub(crate) fn settings(&self, index: &str) -> Option<Map<String, Value>> {
        self.state
            .lock()
            .unwrap()
            .indices
            .get(index)
            .map(|idx| idx.settings.clone())
    }

    fn record(&self, call: String) -> Result<(), SearchIndexError> {
        let mut state = self.state.lock().unwrap();
        if state.unreachable {
            return Err(SearchIndexError::connection("connection refused"));
        }
        state.calls.push(call);
        Ok(())
    }
}

#[async_trait]
impl SearchIndexClient for MockSearchIndex {
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        self.record(format!("exists:{}", index))?;
        Ok(self.has_index(index))
    }

    async fn create_index(
        &self,
        index: &str,
        schema: &IndexSchema,
    ) -> Result<(), SearchIndexError> {
        self.record(format!("create:{}", index))?;
        let mut state = self.state.lock().unwrap();
        if state.indices.contains_key(index) {
            return Err(SearchIndexError::request(
                "Create index",
                400,
                "resource_already_exists_exception",
            ));
        }
        state.indices.insert(
            index.to_string(),
            MockIndex {
                schema: schema.clone(),
                settings: schema.settings().cloned().unwrap_or_default(),
                documents: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        self.record(format!("delete:{}", index))?;
        match self.state.lock().unwrap().indices.remove(index) {
            Some(_) => Ok(()),
            None => Err(SearchIndexError::index_not_found(index)),
        }
    }

    async fn put_mapping(
        &self,
        index: &str,
        schema: &IndexSchema,
    ) -> Result<(), SearchIndexError> {
        self.record(format!("put_mapping:{}", index))?;
        let mut state = self.state.lock().unwrap();
        let idx = state
            .indices
            .get_mut(index)
            .ok_or_else(|| SearchIndexError::request("Put mapping", 404, "index_not_found"))?;
        for (name, field_type) in schema.fields() {
            idx.schema.insert_field(name, field_type);
        }
        Ok(())
    }

    async fn put_settings(
        &self,
        index: &str,
        settings: &Map<String, Value>,
    ) -> Result<(), SearchIndexError> {
        self.record(format!("put_settings:{}", index))?;
        let mut state = self.state.lock().unwrap();
        let idx = state
            .indices
            .get_mut(index)
            .ok_or_else(|| SearchIndexError::request("Put settings", 404, "index_not_found"))?;
        for (key, value) in settings {
            idx.settings.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    async fn open_index(&self, index: &str) -> Result<(), SearchIndexError> {
        self.record(format!("open:{}", index))
    }

    async fn close_index(&self, index: &str) -> Result<(), SearchIndexError> {
        self.record(format!("close:{}", index))
    }

    async fn upsert_document(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<(), SearchIndexError> {
        self.record(format!("upsert:{}:{}", index, id))?;
        self.put_document(index, id, document.clone());
        Ok(())
    }

    async fn get_document(&self, index: &str, id: &str) -> Result<Option<Value>, SearchIndexError> {
        self.record(format!("get:{}:{}", index, id))?;
        Ok(self.document(index, id))
    }

    async fn delete_document(&self, index: &str, id: &str) -> Result<bool, SearchIndexError> {
        self.record(format!("delete_document:{}:{}", index, id))?;
        let mut state = self.state.lock().unwrap();
        Ok(state
            .indices
            .get_mut(index)
            .and_then(|idx| idx.documents.remove(id))
            .is_some())
    }

    async fn bulk(
        &self,
        index: &str,
        actions: &[BulkAction],
    ) -> Result<Vec<BulkItemResult>, SearchIndexError> {
        self.record(format!("bulk:{}", index))?;
        let mut state = self.state.lock().unwrap();
        state
            .bulk_calls
            .push(actions.iter().map(|a| a.id().to_string()).collect());

        let failing = state.failing_ids.clone();
        let idx = state.indices.entry(index.to_string()).or_default();

        Ok(actions
            .iter()
            .map(|action| {
                if failing.contains(action.id()) {
                    return BulkItemResult::failed(
                        action.id(),
                        400,
                        "mapper_parsing_exception",
                        "failed to parse field [price]",
                    );
                }
                idx.documents
                    .insert(action.id.clone(), action.document.clone());
                BulkItemResult::ok(action.id(), 201)
            })
            .collect())
    }

    async fn ping(&self) -> Result<bool, SearchIndexError> {
        let state = self.state.lock().unwrap();
        Ok(!state.unreachable && !state.ping_fails)
    }

    async fn info(&self) -> Result<ClusterInfo, SearchIndexError> {
        self.record("info".to_string())?;
        Ok(ClusterInfo {
            version: Some("2.11.0".to_string()),
            cluster_name: Some("catalog".to_string()),
            distribution: Some("opensearch".to_string()),
        })
    }

    async fn stats(&self, index: &str) -> Result<Option<IndexStatistics>, SearchIndexError> {
        self.record(format!("stats:{}", index))?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .indices
            .get(index)
            .map(|idx| IndexStatistics {
                doc_count: idx.documents.len() as u64,
                size_in_bytes: idx.documents.len() as u64 * 2048,
            }))
    }
}

/// In-memory product repository filtering like the SQL listing.
pub(crate) struct MockProductRepository {
    items: Vec<CatalogItem>,
    unavailable: bool,
    ignore_allow_lists: bool,
    queries: Mutex<Vec<ProductQuery>>,
}

impl MockProductRepository {
    pub(crate) fn new(mut items: Vec<CatalogItem>) -> Self {
        items.sort_by_key(|item| item.id);
        Self {
            items,
            unavailable: false,
            ignore_allow_lists: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_items(count: i64) -> Self {
        Self::new((1..=count).map(sample_item).collect())
    }

    pub(crate) fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new(Vec::new())
        }
    }

    /// List every item regardless of the query's type and status lists.
    pub(crate) fn ignoring_allow_lists(mut self) -> Self {
        self.ignore_allow_lists = true;
        self
    }

    pub(crate) fn queries(&self) -> Vec<ProductQuery> {
        self.queries.lock().unwrap().clone()
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable {
            return Err(RepositoryError::DatabaseError(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MockProductRepository {
    async fn list(&self, query: &ProductQuery) -> Result<ProductPage, RepositoryError> {
        self.check_available()?;
        self.queries.lock().unwrap().push(query.clone());

        let matching: Vec<&CatalogItem> = self
            .items
            .iter()
            .filter(|item| {
                self.ignore_allow_lists
                    || query.types.iter().any(|t| t == item.product_type.as_str())
            })
            .filter(|item| {
                self.ignore_allow_lists
                    || query.statuses.iter().any(|s| s == item.status_for(query.gate))
            })
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
        self.check_available()?;
        Ok(self.items.iter().find(|item| item.id == id).cloned())
    }
}

#[derive(Default)]
pub(crate) struct MockStateStore {
    values: Mutex<HashMap<String, String>>,
}

impl MockStateStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl StateStore for MockStateStore {
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
