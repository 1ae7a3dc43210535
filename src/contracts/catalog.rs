//! Catalog tree entities and labels

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A key-value label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Label {
    /// Label key
    pub key: String,
    /// Label value
    pub value: String,
}

impl Label {
    /// Creates a label
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Any entity stored in the catalog tree
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogEntity {
    /// Identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Key of the parent entity
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent_key: String,
    /// Value of the parent entity
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent_value: String,
    /// Entity key
    #[serde(rename = "entity_key", default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    /// Entity value
    #[serde(rename = "entity_value", default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    /// Full repository path of the pipeline this entity is linked to
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub linked_pipeline: String,
    /// Labels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    /// Free form metadata
    #[serde(rename = "entity_metadata", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// First time the entity was seen
    #[serde(rename = "firstVisit", default, skip_serializing_if = "Option::is_none")]
    pub first_visit: Option<DateTime<Utc>>,
    /// Last time the entity was seen
    #[serde(rename = "lastVisit", default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<DateTime<Utc>>,
}

impl CatalogEntity {
    /// Returns the value of the label with `key`
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.key == key)
            .map(|l| l.value.as_str())
    }
}
