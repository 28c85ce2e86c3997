//! Stat aggregator.
//!
//! Combines the health, version and size of the remote index with the time
//! of the last successful full reindex.

use std::sync::Arc;

use catalog_sync_repository::{SearchIndexClient, StateStore};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::errors::SyncError;
use crate::pipeline::LAST_REINDEX_KEY;

const KILOBYTE: u64 = 1024;
const MEGABYTE: u64 = 1024 * 1024;

/// Snapshot of the remote index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexStats {
    pub version: Option<String>,
    pub name: String,
    pub reachable: bool,
    pub doc_count: u64,
    pub size_bytes: u64,
    pub last_reindex_at: Option<DateTime<Utc>>,
}

impl IndexStats {
    fn empty(name: &str) -> Self {
        Self {
            version: None,
            name: name.to_string(),
            reachable: false,
            doc_count: 0,
            size_bytes: 0,
            last_reindex_at: None,
        }
    }

    /// Size in the largest unit it fits: `512 Bytes`, `12 Kb`, `3.46 Mb`.
    pub fn display_size(&self) -> String {
        match self.size_bytes {
            bytes if bytes < KILOBYTE => format!("{} Bytes", bytes),
            bytes if bytes < MEGABYTE => {
                format!("{} Kb", (bytes as f64 / KILOBYTE as f64).round())
            }
            bytes => format!("{:.2} Mb", bytes as f64 / MEGABYTE as f64),
        }
    }

    pub fn display_version(&self) -> &str {
        self.version.as_deref().unwrap_or("-")
    }

    pub fn display_ping(&self) -> &'static str {
        if self.reachable {
            "Yes"
        } else {
            "No"
        }
    }

    pub fn display_last_reindex(&self) -> String {
        self.last_reindex_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

pub struct StatAggregator {
    client: Arc<dyn SearchIndexClient>,
    state: Arc<dyn StateStore>,
    index: String,
}

impl StatAggregator {
    pub fn new(
        client: Arc<dyn SearchIndexClient>,
        state: Arc<dyn StateStore>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            client,
            state,
            index: config.index_name().to_string(),
        }
    }

    /// Collect the current stats.
    ///
    /// Ping, version and index statistics are queried independently; a
    /// failing query leaves its part of the snapshot empty. A missing index
    /// yields zeroed counters.
    pub async fn get_stats(&self) -> Result<IndexStats, SyncError> {
        let mut stats = IndexStats::empty(&self.index);
        stats.last_reindex_at = self.last_reindex_at().await?;
        stats.reachable = self.client.ping().await.unwrap_or(false);

        if !stats.reachable {
            warn!(index = %self.index, "Search index did not answer ping");
        }

        match self.client.info().await {
            Ok(info) => stats.version = info.version,
            Err(e) => warn!(error = %e, "Failed to read search index version"),
        }

        match self.client.stats(&self.index).await {
            Ok(Some(index_stats)) => {
                stats.doc_count = index_stats.doc_count;
                stats.size_bytes = index_stats.size_in_bytes;
            }
            Ok(None) => debug!(index = %self.index, "Index does not exist"),
            Err(e) => warn!(index = %self.index, error = %e, "Failed to read index statistics"),
        }

        Ok(stats)
    }

    async fn last_reindex_at(&self) -> Result<Option<DateTime<Utc>>, SyncError> {
        let Some(value) = self.state.get(LAST_REINDEX_KEY).await? else {
            return Ok(None);
        };

        let parsed = value
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
        if parsed.is_none() {
            warn!(value = %value, "Ignoring unreadable last reindex date");
        }
        Ok(parsed)
    }
}
