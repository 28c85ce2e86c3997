//! Interface definitions for the collaborators of the sync engine.
//!
//! These traits allow dependency injection of the remote search index, the
//! product repository and the key-value store, so the engine can be driven
//! against real backends or in-memory mocks.

mod product_repository;
mod search_index_client;
mod state_store;

pub use product_repository::ProductRepository;
pub use search_index_client::SearchIndexClient;
pub use state_store::StateStore;
