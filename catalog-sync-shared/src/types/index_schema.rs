//! Index schema types.
//!
//! The schema is a mapping from field name to field type plus an optional
//! settings block. It is built fresh for every schema operation and only
//! persisted as the remote index's live mapping.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Field type of one schema property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Integer,
    Long,
    Text,
    Keyword,
    Float,
    Boolean,
    Date,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Text => "text",
            Self::Keyword => "keyword",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index schema: field types plus optional index settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexSchema {
    fields: BTreeMap<String, FieldType>,
    settings: Option<Map<String, Value>>,
}

impl IndexSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a field, builder style.
    pub fn with_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.insert_field(name, field_type);
        self
    }

    /// Add or replace a field.
    pub fn insert_field(&mut self, name: impl Into<String>, field_type: FieldType) {
        self.fields.insert(name.into(), field_type);
    }

    pub fn remove_field(&mut self, name: &str) -> Option<FieldType> {
        self.fields.remove(name)
    }

    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).copied()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Set a single index setting (e.g. `number_of_replicas`).
    pub fn with_setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.settings
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    pub fn settings(&self) -> Option<&Map<String, Value>> {
        self.settings.as_ref()
    }

    /// The `mappings` body: `{"properties": {"field": {"type": "..."}}}`.
    pub fn mappings_body(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, ty)| (name.clone(), json!({ "type": ty.as_str() })))
            .collect();

        json!({ "properties": properties })
    }

    /// The settings body, if the schema carries any settings.
    pub fn settings_body(&self) -> Option<Value> {
        self.settings
            .as_ref()
            .map(|settings| Value::Object(settings.clone()))
    }

    /// Body of an index creation request.
    pub fn create_body(&self) -> Value {
        let mut body = json!({ "mappings": self.mappings_body() });
        if let Some(settings) = self.settings_body() {
            body["settings"] = settings;
        }
        body
    }
}
