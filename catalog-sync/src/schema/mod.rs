//! Schema manager.
//!
//! Builds the index schema and reconciles it against the remote index.

use std::sync::Arc;

use catalog_sync_repository::{SearchIndexClient, SearchIndexError};
use catalog_sync_shared::{FieldType, IndexSchema};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::config::{SchemaExtender, SyncConfig};
use crate::errors::SyncError;

/// Field types of every document, in document order.
const BASE_FIELDS: [(&str, FieldType); 19] = [
    ("id", FieldType::Integer),
    ("parent_id", FieldType::Integer),
    ("link", FieldType::Text),
    ("add_to_cart_link", FieldType::Text),
    ("name", FieldType::Text),
    ("product_type", FieldType::Text),
    ("desc", FieldType::Text),
    ("short_desc", FieldType::Text),
    ("image", FieldType::Text),
    ("category", FieldType::Integer),
    ("current_price", FieldType::Float),
    ("price", FieldType::Float),
    ("sale_price", FieldType::Float),
    ("rating", FieldType::Float),
    ("stock", FieldType::Boolean),
    ("sku", FieldType::Text),
    ("qty", FieldType::Integer),
    ("created_at", FieldType::Integer),
    ("updated_at", FieldType::Integer),
];

/// Settings that can only be chosen when the index is created.
const CREATION_ONLY_SETTINGS: [&str; 1] = ["number_of_shards"];

/// Creates, updates and deletes the remote index.
pub struct SchemaManager {
    client: Arc<dyn SearchIndexClient>,
    index: String,
    include_current_price: bool,
    reopen_on_settings_update: bool,
    settings: Map<String, Value>,
    extender: Option<Arc<dyn SchemaExtender>>,
}

impl SchemaManager {
    pub fn new(client: Arc<dyn SearchIndexClient>, config: &SyncConfig) -> Self {
        Self {
            client,
            index: config.index_name().to_string(),
            include_current_price: config.include_current_price(),
            reopen_on_settings_update: config.reopen_on_settings_update(),
            settings: config.index_settings().clone(),
            extender: config.schema_extender().cloned(),
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// Build the schema from the base fields, the configured settings and
    /// the schema extender.
    pub fn build_schema(&self) -> IndexSchema {
        let mut schema = BASE_FIELDS
            .iter()
            .filter(|(name, _)| self.include_current_price || *name != "current_price")
            .fold(IndexSchema::new(), |schema, (name, field_type)| {
                schema.with_field(*name, *field_type)
            });

        for (key, value) in &self.settings {
            schema = schema.with_setting(key.clone(), value.clone());
        }

        match &self.extender {
            Some(extender) => extender.extend(schema),
            None => schema,
        }
    }

    /// Check whether the remote index exists.
    pub async fn exists(&self) -> Result<bool, SyncError> {
        self.client
            .index_exists(&self.index)
            .await
            .map_err(SyncError::schema)
    }

    /// Create the index with `schema`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The index was created
    /// * `Err(SyncError::AlreadyExists)` - If the index is already present
    /// * `Err(SyncError::SchemaOperationFailed)` - If a remote call failed
    #[instrument(skip(self, schema), fields(index = %self.index))]
    pub async fn create(&self, schema: &IndexSchema) -> Result<(), SyncError> {
        if self.exists().await? {
            return Err(SyncError::AlreadyExists(self.index.clone()));
        }

        self.client
            .create_index(&self.index, schema)
            .await
            .map_err(SyncError::schema)?;

        info!(index = %self.index, fields = schema.len(), "Index created");
        Ok(())
    }

    /// Bring the remote index in line with `schema` without touching data.
    ///
    /// An absent index is created. Otherwise settings are applied first,
    /// then the mappings; mapping updates only ever add fields.
    #[instrument(skip(self, schema), fields(index = %self.index))]
    pub async fn update(&self, schema: &IndexSchema) -> Result<(), SyncError> {
        if !self.exists().await? {
            debug!(index = %self.index, "Index absent, creating it");
            return self.create(schema).await;
        }

        if let Some(settings) = self.updatable_settings(schema) {
            self.apply_settings(&settings).await?;
        }

        self.client
            .put_mapping(&self.index, schema)
            .await
            .map_err(SyncError::schema)?;

        info!(index = %self.index, fields = schema.len(), "Index updated");
        Ok(())
    }

    /// Remove the index; a missing index is not an error.
    #[instrument(skip(self), fields(index = %self.index))]
    pub async fn delete(&self) -> Result<(), SyncError> {
        if !self.exists().await? {
            debug!(index = %self.index, "Index absent, nothing to delete");
            return Ok(());
        }

        match self.client.delete_index(&self.index).await {
            Ok(()) | Err(SearchIndexError::IndexNotFound(_)) => {
                info!(index = %self.index, "Index deleted");
                Ok(())
            }
            Err(e) => Err(SyncError::schema(e)),
        }
    }

    /// Delete the index, then create it again with `schema`.
    pub async fn rebuild(&self, schema: &IndexSchema) -> Result<(), SyncError> {
        self.delete().await?;
        self.create(schema).await
    }

    fn updatable_settings(&self, schema: &IndexSchema) -> Option<Map<String, Value>> {
        let settings: Map<String, Value> = schema
            .settings()?
            .iter()
            .filter(|(key, _)| !CREATION_ONLY_SETTINGS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        (!settings.is_empty()).then_some(settings)
    }

    async fn apply_settings(&self, settings: &Map<String, Value>) -> Result<(), SyncError> {
        if !self.reopen_on_settings_update {
            return self
                .client
                .put_settings(&self.index, settings)
                .await
                .map_err(SyncError::schema);
        }

        self.client
            .close_index(&self.index)
            .await
            .map_err(SyncError::schema)?;

        let applied = self.client.put_settings(&self.index, settings).await;
        let reopened = self.client.open_index(&self.index).await;

        if let Err(e) = &reopened {
            warn!(index = %self.index, error = %e, "Failed to reopen index after settings update");
        }
        applied.map_err(SyncError::schema)?;
        reopened.map_err(SyncError::schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockSearchIndex;
    use serde_json::json;

    const INDEX: &str = "shop-example-com";

    fn config() -> SyncConfig {
        SyncConfig::new(vec!["http://localhost:9200".into()], "http://shop.example.com").unwrap()
    }

    #[test]
    fn test_base_schema() {
        let manager = SchemaManager::new(Arc::new(MockSearchIndex::new()), &config());

        let schema = manager.build_schema();

        assert_eq!(schema.len(), 19);
        assert_eq!(schema.field_type("id"), Some(FieldType::Integer));
        assert_eq!(schema.field_type("category"), Some(FieldType::Integer));
        assert_eq!(schema.field_type("current_price"), Some(FieldType::Float));
        assert_eq!(schema.field_type("stock"), Some(FieldType::Boolean));
        assert!(schema.settings().is_none());
    }

    #[test]
    fn test_schema_extender_and_settings() {
        let config = config()
            .with_current_price(false)
            .with_index_setting("number_of_replicas", json!(2))
            .with_schema_extender(|schema: IndexSchema| schema.with_field("brand", FieldType::Keyword));
        let manager = SchemaManager::new(Arc::new(MockSearchIndex::new()), &config);

        let schema = manager.build_schema();

        assert_eq!(schema.field_type("current_price"), None);
        assert_eq!(schema.field_type("brand"), Some(FieldType::Keyword));
        assert_eq!(schema.settings().unwrap()["number_of_replicas"], json!(2));
    }

    #[tokio::test]
    async fn test_create_fails_when_index_exists() {
        let client = Arc::new(MockSearchIndex::new().with_index(INDEX));
        let manager = SchemaManager::new(client, &config());

        let result = manager.create(&manager.build_schema()).await;

        assert!(matches!(result, Err(SyncError::AlreadyExists(name)) if name == INDEX));
    }

    #[tokio::test]
    async fn test_update_on_absent_index_creates_it() {
        let client = Arc::new(MockSearchIndex::new());
        let manager = SchemaManager::new(client.clone(), &config());

        manager.update(&manager.build_schema()).await.unwrap();

        assert_eq!(client.schema(INDEX).unwrap().len(), 19);
        assert_eq!(
            client.calls(),
            vec![
                format!("exists:{}", INDEX),
                format!("exists:{}", INDEX),
                format!("create:{}", INDEX)
            ]
        );
    }

    #[tokio::test]
    async fn test_update_adds_fields_and_keeps_documents() {
        let client = Arc::new(MockSearchIndex::new().with_index(INDEX));
        client.put_document(INDEX, "1", json!({"id": 1}));
        let manager = SchemaManager::new(client.clone(), &config());

        manager.update(&manager.build_schema()).await.unwrap();

        assert_eq!(client.schema(INDEX).unwrap().len(), 19);
        assert!(client.document(INDEX, "1").is_some());
        assert!(!client.calls().iter().any(|c| c.starts_with("put_settings")));
    }

    #[tokio::test]
    async fn test_update_wraps_settings_in_close_and_open() {
        let client = Arc::new(MockSearchIndex::new().with_index(INDEX));
        let config = config()
            .with_reopen_on_settings_update(true)
            .with_index_setting("number_of_shards", json!(3))
            .with_index_setting("number_of_replicas", json!(1));
        let manager = SchemaManager::new(client.clone(), &config);

        manager.update(&manager.build_schema()).await.unwrap();

        let calls = client.calls();
        let position = |call: &str| calls.iter().position(|c| c == &format!("{}:{}", call, INDEX));
        assert!(position("close").is_some());
        assert!(position("close") < position("put_settings"));
        assert!(position("put_settings") < position("open"));
        assert!(position("open") < position("put_mapping"));

        let settings = client.settings(INDEX).unwrap();
        assert_eq!(settings["number_of_replicas"], json!(1));
        assert!(settings.get("number_of_shards").is_none());
    }

    #[tokio::test]
    async fn test_delete_is_a_no_op_on_absent_index() {
        let client = Arc::new(MockSearchIndex::new());
        let manager = SchemaManager::new(client.clone(), &config());

        manager.delete().await.unwrap();

        assert_eq!(client.calls(), vec![format!("exists:{}", INDEX)]);
    }

    #[tokio::test]
    async fn test_rebuild_drops_documents() {
        let client = Arc::new(MockSearchIndex::new().with_index(INDEX));
        client.put_document(INDEX, "1", json!({"id": 1}));
        let manager = SchemaManager::new(client.clone(), &config());

        manager.rebuild(&manager.build_schema()).await.unwrap();

        assert!(client.has_index(INDEX));
        assert!(client.document(INDEX, "1").is_none());
    }

    #[tokio::test]
    async fn test_remote_failures_are_schema_errors() {
        let client = Arc::new(MockSearchIndex::new().unreachable());
        let manager = SchemaManager::new(client, &config());

        let result = manager.update(&manager.build_schema()).await;

        assert!(matches!(result, Err(SyncError::SchemaOperationFailed(_))));
    }
}
