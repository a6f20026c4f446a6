//! Canonical plugin entities and the raw records they are built from

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One release of a plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginVersion {
    pub version: String,
    pub released_at: DateTime<Utc>,
    pub download_url: String,
    pub changelog: Option<String>,
}

/// Normalized catalog entry, persisted as one JSON file per plugin.
///
/// `id` and `name` are never empty and `versions` always holds at least one
/// entry; records that cannot satisfy this are skipped by the normalizer
/// instead of being constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    pub id: String,
    pub name: String,
    pub author: String,
    pub description: String,
    pub categories: Vec<String>,
    pub total_downloads: u64,
    pub latest_version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub versions: Vec<PluginVersion>,
}

/// Unprocessed catalog record, one element of the search endpoint's `data`
/// array. Accessors are thin and typed; every absence and wrong-type
/// fallback decision belongs to the normalizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wrap a JSON value, when it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Field as a string, when present and actually a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Field as an unsigned integer. Numeric strings are accepted because
    /// the catalog is inconsistent about quoting counters.
    pub fn u64_field(&self, key: &str) -> Option<u64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
