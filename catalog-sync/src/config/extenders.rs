//! Extension points for the index schema and the mapped documents.

use catalog_sync_shared::{CatalogItem, IndexDocument, IndexSchema};

/// Adjusts the index schema after the base fields have been laid out.
///
/// Applied once per schema operation.
pub trait SchemaExtender: Send + Sync {
    fn extend(&self, schema: IndexSchema) -> IndexSchema;
}

/// Adjusts a mapped document after the base fields have been derived.
///
/// Extenders add keys through [`IndexDocument::extra`] or change base field
/// values; the document id must stay the one of the item.
pub trait DocumentExtender: Send + Sync {
    fn extend(&self, document: IndexDocument, item: &CatalogItem) -> IndexDocument;
}

impl<F> SchemaExtender for F
where
    F: Fn(IndexSchema) -> IndexSchema + Send + Sync,
{
    fn extend(&self, schema: IndexSchema) -> IndexSchema {
        self(schema)
    }
}

impl<F> DocumentExtender for F
where
    F: Fn(IndexDocument, &CatalogItem) -> IndexDocument + Send + Sync,
{
    fn extend(&self, document: IndexDocument, item: &CatalogItem) -> IndexDocument {
        self(document, item)
    }
}
