//! Parsing of OpenSearch response bodies.
//!
//! Kept free of any transport types so the parsing rules can be tested
//! against literal response bodies.

use serde_json::{json, Value};

use crate::errors::SearchIndexError;
use crate::types::{BulkAction, BulkItemResult, ClusterInfo, IndexStatistics};

/// Build the newline-delimited bulk body: one `index` metadata line per
/// action, followed by its document.
pub(crate) fn bulk_body_lines(actions: &[BulkAction]) -> Vec<Value> {
    let mut lines = Vec::with_capacity(actions.len() * 2);
    for action in actions {
        lines.push(json!({ "index": { "_id": action.id } }));
        lines.push(action.document.clone());
    }
    lines
}

/// Parse the per-item results of a bulk response.
///
/// Each entry of `items` is an object keyed by the action name (`index`,
/// `create`, `update` or `delete`).
pub(crate) fn parse_bulk_items(body: &Value) -> Result<Vec<BulkItemResult>, SearchIndexError> {
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchIndexError::parse("Bulk response has no items array"))?;

    items
        .iter()
        .map(|item| -> Result<BulkItemResult, SearchIndexError> {
            let outcome = item
                .as_object()
                .and_then(|obj| obj.values().next())
                .ok_or_else(|| SearchIndexError::parse("Bulk response item is empty"))?;

            let id = match outcome.get("_id") {
                Some(Value::String(id)) => id.clone(),
                Some(Value::Number(id)) => id.to_string(),
                _ => String::new(),
            };
            let status = outcome
                .get("status")
                .and_then(Value::as_u64)
                .and_then(|s| u16::try_from(s).ok())
                .unwrap_or(0);

            Ok(match outcome.get("error") {
                Some(error) => BulkItemResult::failed(
                    id,
                    status,
                    error
                        .get("type")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown"),
                    error
                        .get("reason")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown"),
                ),
                None => BulkItemResult::ok(id, status),
            })
        })
        .collect()
}

/// Parse the `_source` of a get-document response; `None` if not found.
pub(crate) fn parse_document_source(body: &Value) -> Option<Value> {
    if body.get("found").and_then(Value::as_bool) == Some(false) {
        return None;
    }
    body.get("_source").cloned()
}

/// Parse the root info response.
pub(crate) fn parse_cluster_info(body: &Value) -> ClusterInfo {
    let version = body.get("version");
    ClusterInfo {
        version: version
            .and_then(|v| v.get("number"))
            .and_then(Value::as_str)
            .map(str::to_string),
        cluster_name: body
            .get("cluster_name")
            .and_then(Value::as_str)
            .map(str::to_string),
        distribution: version
            .and_then(|v| v.get("distribution"))
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Parse an index stats response.
///
/// Reads `indices.<index>.total`, falling back to `_all.total` when the
/// index is addressed through an alias.
pub(crate) fn parse_index_statistics(body: &Value, index: &str) -> Option<IndexStatistics> {
    let total = body
        .get("indices")
        .and_then(|indices| indices.get(index))
        .or_else(|| body.get("_all"))
        .and_then(|idx| idx.get("total"))?;

    let doc_count = total
        .get("docs")
        .and_then(|d| d.get("count"))
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let size_in_bytes = total
        .get("store")
        .and_then(|s| s.get("size_in_bytes"))
        .and_then(Value::as_u64)
        .unwrap_or(0);

    Some(IndexStatistics {
        doc_count,
        size_in_bytes,
    })
}
