//! Domain Entities - Core business objects
//!
//! These entities describe what the backends exchange with their
//! collaborators: cluster nodes, metrics store responses and scale requests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known node label carrying the host name reported to the metrics store.
pub const HOSTNAME_LABEL: &str = "kubernetes.io/hostname";

/// A cluster node as seen by the node lister.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Node {
    /// Node object name
    pub name: String,
    /// Node labels
    pub labels: BTreeMap<String, String>,
}

impl Node {
    /// Create a node with no labels.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: BTreeMap::new(),
        }
    }

    /// Add a label.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Host name used to filter metrics for this node.
    ///
    /// Falls back to the node name when the hostname label is missing.
    pub fn hostname(&self) -> &str {
        self.labels
            .get(HOSTNAME_LABEL)
            .map(String::as_str)
            .filter(|h| !h.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Response body of an InfluxDB `/query` call.
///
/// `results` holds one entry per statement. Either level may carry an
/// error string instead of data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<QueryResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResponse {
    /// First error reported by the store, top-level before per-statement.
    pub fn error(&self) -> Option<&str> {
        self.error
            .as_deref()
            .filter(|e| !e.is_empty())
            .or_else(|| {
                self.results
                    .iter()
                    .find_map(|r| r.error.as_deref().filter(|e| !e.is_empty()))
            })
    }
}

/// Result of one statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub statement_id: u32,
    #[serde(default)]
    pub series: Vec<Series>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A named series of rows. Column 0 is the timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

/// Desired size for a node pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleNodePoolRequest {
    pub count: i32,
}
