//! Command surface of the `catalog-sync` binary.

mod render;

pub use render::{render_document, render_index_stats};

use clap::{Parser, Subcommand};
use tracing::info;

use crate::engine::CatalogSyncEngine;
use crate::errors::SyncError;
use crate::pipeline::ReindexProgressReporter;

#[derive(Parser, Debug)]
#[command(
    name = "catalog-sync",
    version,
    about = "Keep a product catalog in sync with an OpenSearch index"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Manage the search index.
    Index {
        #[command(subcommand)]
        action: IndexAction,
    },
    /// Manage single products in the search index.
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexAction {
    /// Show version, health, size and last reindex date.
    Stat,
    /// Create the index; fails if it exists.
    Create,
    /// Apply the current schema to the index, creating it if needed.
    Update,
    /// Delete the index and all of its documents.
    Delete,
    /// Delete and recreate the index.
    Rebuild,
    /// Submit every eligible product to the index.
    Reindex,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
    /// Show the fields stored in the index for a product.
    Stat { id: i64 },
    /// Add or update a product in the index.
    Add { id: i64 },
    /// Remove a product from the index.
    Delete { id: i64 },
}

/// Run one command and return the text to print on success.
pub async fn execute(
    command: &Commands,
    engine: &CatalogSyncEngine,
    progress: &dyn ReindexProgressReporter,
) -> Result<String, SyncError> {
    match command {
        Commands::Index { action } => execute_index(*action, engine, progress).await,
        Commands::Product { action } => execute_product(*action, engine).await,
    }
}

async fn execute_index(
    action: IndexAction,
    engine: &CatalogSyncEngine,
    progress: &dyn ReindexProgressReporter,
) -> Result<String, SyncError> {
    let index = engine.index_name();
    let schema = engine.schema();

    match action {
        IndexAction::Stat => {
            let stats = engine.stats().get_stats().await?;
            Ok(render_index_stats(&stats))
        }
        IndexAction::Create => {
            schema.create(&schema.build_schema()).await?;
            Ok(format!("Index [{}] created", index))
        }
        IndexAction::Update => {
            schema.update(&schema.build_schema()).await?;
            Ok(format!("Index [{}] updated", index))
        }
        IndexAction::Delete => {
            schema.delete().await?;
            Ok(format!("Index [{}] deleted", index))
        }
        IndexAction::Rebuild => {
            schema.rebuild(&schema.build_schema()).await?;
            Ok(format!(
                "Rebuild of index [{}] completed. Run [catalog-sync index reindex] to add products",
                index
            ))
        }
        IndexAction::Reindex => {
            match engine
                .pipeline()
                .run_full_reindex_with_progress(progress)
                .await?
            {
                Some(summary) => Ok(format!(
                    "Reindex completed: {} products in {} pages",
                    summary.documents, summary.pages
                )),
                None => Ok("Nothing to reindex".to_string()),
            }
        }
    }
}

async fn execute_product(
    action: ProductAction,
    engine: &CatalogSyncEngine,
) -> Result<String, SyncError> {
    let index = engine.index_name();
    let single = engine.single();

    match action {
        ProductAction::Stat { id } => {
            let source = single.fetch(id).await?;
            Ok(render_document(&source))
        }
        ProductAction::Add { id } => {
            let item = single.add_by_id(id).await?;
            info!(product_id = id, "Product added from the command line");
            Ok(format!(
                "Product [{}] added/updated to index [{}]",
                item.name, index
            ))
        }
        ProductAction::Delete { id } => {
            single.remove(id).await?;
            Ok(format!("Product [{}] deleted from index [{}]", id, index))
        }
    }
}
