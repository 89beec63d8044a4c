//! Domain models for collections served by the pagination layer.
//!
//! A [`Record`] is the generic node type: a collection name (`kind`), an
//! integer key and an open set of JSON fields. Datasets are JSON arrays of
//! flat objects, e.g. `[{"kind": "Letter", "id": 1, "letter": "A"}]`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Records
// =============================================================================

/// A node stored in a keyed collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Collection (object type) this record belongs to.
    pub kind: String,
    /// Key within the collection; records are ordered by it.
    pub id: i64,
    /// Every other field of the source object.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(kind: impl Into<String>, id: i64) -> Self {
        Self {
            kind: kind.into(),
            id,
            fields: Map::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Key extractor for record collections.
pub fn record_key(record: &Record) -> i64 {
    record.id
}

// =============================================================================
// Datasets
// =============================================================================

/// Parse a JSON dataset (an array of records).
pub fn parse_dataset(json: &str) -> serde_json::Result<Vec<Record>> {
    serde_json::from_str(json)
}
