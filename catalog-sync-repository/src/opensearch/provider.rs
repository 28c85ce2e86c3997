//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexClient`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use catalog_sync_shared::IndexSchema;
use opensearch::{
    http::{
        request::JsonBody,
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{
        IndicesCloseParts, IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts,
        IndicesOpenParts, IndicesPutMappingParts, IndicesPutSettingsParts, IndicesStatsParts,
    },
    BulkParts, DeleteParts, GetParts, IndexParts, OpenSearch,
};
use serde_json::{Map, Value};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexClient;
use crate::opensearch::response;
use crate::types::{BulkAction, BulkItemResult, ClusterInfo, IndexStatistics};

/// OpenSearch provider implementation.
///
/// Holds one client handle for the lifetime of the provider; connection reuse
/// is handled by the underlying transport.
///
/// # Example
///
/// ```ignore
/// let provider = OpenSearchProvider::connect(&["http://localhost:9200".to_string()]).await?;
/// let exists = provider.index_exists("shop-example-com").await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    url: Url,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or transport setup fails
    pub fn new(url: &str) -> Result<Self, SearchIndexError> {
        let parsed_url = Url::parse(url)
            .map_err(|e| SearchIndexError::validation(format!("Invalid host '{}': {}", url, e)))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url.clone());
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        debug!(url = %parsed_url, "Created OpenSearch provider");

        Ok(Self {
            client,
            url: parsed_url,
        })
    }

    /// Create a provider for the first host of the list that answers a ping.
    ///
    /// When no host answers, the provider is built for the first host so that
    /// callers can still report the service as unreachable.
    ///
    /// # Arguments
    ///
    /// * `hosts` - Candidate OpenSearch URLs, in order of preference
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A provider for the selected host
    /// * `Err(SearchIndexError)` - If the list is empty or contains an invalid URL
    pub async fn connect(hosts: &[String]) -> Result<Self, SearchIndexError> {
        if hosts.is_empty() {
            return Err(SearchIndexError::validation(
                "At least one OpenSearch host must be configured",
            ));
        }

        let mut providers = hosts
            .iter()
            .map(|host| Self::new(host))
            .collect::<Result<Vec<_>, _>>()?;

        let mut selected = None;
        for (position, provider) in providers.iter().enumerate() {
            if let Ok(true) = provider.ping().await {
                info!(url = %provider.url, "Connected to OpenSearch");
                selected = Some(position);
                break;
            }
            warn!(url = %provider.url, "OpenSearch host did not answer ping");
        }

        let position = selected.unwrap_or_else(|| {
            warn!(
                url = %providers[0].url,
                "No OpenSearch host answered, using the first configured host"
            );
            0
        });
        Ok(providers.swap_remove(position))
    }

    /// The URL of the host this provider talks to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Turn a non-success response into a `RequestError`.
    async fn ensure_success(
        response: Response,
        operation: &str,
    ) -> Result<Response, SearchIndexError> {
        let status = response.status_code();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %error_body, operation, "OpenSearch request failed");
        Err(SearchIndexError::request(
            operation,
            status.as_u16(),
            error_body,
        ))
    }

    async fn read_json(response: Response) -> Result<Value, SearchIndexError> {
        response
            .json::<Value>()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))
    }
}

#[async_trait]
impl SearchIndexClient for OpenSearchProvider {
    async fn index_exists(&self, index: &str) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        match response.status_code().as_u16() {
            404 => Ok(false),
            _ => Self::ensure_success(response, "Index exists")
                .await
                .map(|_| true),
        }
    }

    #[instrument(skip(self, schema), fields(fields = schema.len()))]
    async fn create_index(
        &self,
        index: &str,
        schema: &IndexSchema,
    ) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(schema.create_body())
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        Self::ensure_success(response, "Create index").await?;
        info!(index, "Index created");
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        if response.status_code().as_u16() == 404 {
            return Err(SearchIndexError::index_not_found(index));
        }
        Self::ensure_success(response, "Delete index").await?;
        info!(index, "Index deleted");
        Ok(())
    }

    async fn put_mapping(
        &self,
        index: &str,
        schema: &IndexSchema,
    ) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .put_mapping(IndicesPutMappingParts::Index(&[index]))
            .body(schema.mappings_body())
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        Self::ensure_success(response, "Put mapping").await?;
        debug!(index, fields = schema.len(), "Mapping updated");
        Ok(())
    }

    async fn put_settings(
        &self,
        index: &str,
        settings: &Map<String, Value>,
    ) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .put_settings(IndicesPutSettingsParts::Index(&[index]))
            .body(Value::Object(settings.clone()))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        Self::ensure_success(response, "Put settings").await?;
        debug!(index, "Settings updated");
        Ok(())
    }

    async fn open_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .open(IndicesOpenParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        Self::ensure_success(response, "Open index").await?;
        Ok(())
    }

    async fn close_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .close(IndicesCloseParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        Self::ensure_success(response, "Close index").await?;
        Ok(())
    }

    async fn upsert_document(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<(), SearchIndexError> {
        // The index API replaces the whole document, so repeated upserts of
        // unchanged data store identical sources.
        let response = self
            .client
            .index(IndexParts::IndexId(index, id))
            .body(document.clone())
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        Self::ensure_success(response, "Index document").await?;
        debug!(index, doc_id = %id, "Document indexed");
        Ok(())
    }

    async fn get_document(&self, index: &str, id: &str) -> Result<Option<Value>, SearchIndexError> {
        let response = self
            .client
            .get(GetParts::IndexId(index, id))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        // 404 covers both a missing document and a missing index
        if response.status_code().as_u16() == 404 {
            return Ok(None);
        }

        let response = Self::ensure_success(response, "Get document").await?;
        let body = Self::read_json(response).await?;
        Ok(response::parse_document_source(&body))
    }

    async fn delete_document(&self, index: &str, id: &str) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(index, id))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        // 404 is acceptable - document may not exist
        if response.status_code().as_u16() == 404 {
            debug!(index, doc_id = %id, "Document to delete was not found");
            return Ok(false);
        }

        Self::ensure_success(response, "Delete document").await?;
        debug!(index, doc_id = %id, "Document deleted");
        Ok(true)
    }

    #[instrument(skip(self, actions), fields(actions = actions.len()))]
    async fn bulk(
        &self,
        index: &str,
        actions: &[BulkAction],
    ) -> Result<Vec<BulkItemResult>, SearchIndexError> {
        let body: Vec<JsonBody<Value>> = response::bulk_body_lines(actions)
            .into_iter()
            .map(JsonBody::from)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let response = Self::ensure_success(response, "Bulk").await?;
        let body = Self::read_json(response).await?;
        let results = response::parse_bulk_items(&body)?;

        if results.len() != actions.len() {
            return Err(SearchIndexError::parse(format!(
                "Bulk response has {} items for {} actions",
                results.len(),
                actions.len()
            )));
        }

        debug!(index, items = results.len(), "Bulk request completed");
        Ok(results)
    }

    async fn ping(&self) -> Result<bool, SearchIndexError> {
        match self.client.ping().send().await {
            Ok(response) => Ok(response.status_code().is_success()),
            Err(e) => {
                debug!(url = %self.url, error = %e, "Ping failed");
                Ok(false)
            }
        }
    }

    async fn info(&self) -> Result<ClusterInfo, SearchIndexError> {
        let response = self
            .client
            .info()
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let response = Self::ensure_success(response, "Info").await?;
        let body = Self::read_json(response).await?;
        Ok(response::parse_cluster_info(&body))
    }

    async fn stats(&self, index: &str) -> Result<Option<IndexStatistics>, SearchIndexError> {
        let response = self
            .client
            .indices()
            .stats(IndicesStatsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        if response.status_code().as_u16() == 404 {
            return Ok(None);
        }

        let response = Self::ensure_success(response, "Index stats").await?;
        let body = Self::read_json(response).await?;
        Ok(response::parse_index_statistics(&body, index))
    }
}
