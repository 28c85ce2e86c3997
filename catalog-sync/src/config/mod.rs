//! Configuration, extension hooks and dependency wiring.

mod dependencies;
mod extenders;
mod settings;

pub use dependencies::Dependencies;
pub use extenders::{DocumentExtender, SchemaExtender};
pub use settings::{default_index_name, SyncConfig};
