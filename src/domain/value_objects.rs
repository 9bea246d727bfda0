//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared between calls.

use std::collections::{BTreeMap, HashMap};

/// Signal a metric backend can be asked for.
///
/// The wire names are what the autoscaling controller passes to
/// `get_value`; anything else is rejected as an unknown metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Percentage of CPU in use across the selected hosts
    CpuPercentUtilization,
    /// Percentage of memory in use across the selected hosts
    MemoryPercentUtilization,
    /// Operator-supplied query template
    Custom,
}

impl MetricKind {
    /// Parse a metric kind from its wire name.
    ///
    /// # Examples
    /// ```
    /// use autoscale_backends::MetricKind;
    ///
    /// assert_eq!(MetricKind::from_name("custom"), Some(MetricKind::Custom));
    /// assert_eq!(MetricKind::from_name("disk"), None);
    /// ```
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "cpu_percent_utilization" => Some(Self::CpuPercentUtilization),
            "memory_percent_utilization" => Some(Self::MemoryPercentUtilization),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    /// Convert to wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CpuPercentUtilization => "cpu_percent_utilization",
            Self::MemoryPercentUtilization => "memory_percent_utilization",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregation function applied to the selected field over the time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Aggregation {
    #[default]
    Mean,
    Median,
    Mode,
    Max,
    Min,
    Sum,
    Count,
    Spread,
    Stddev,
}

impl Aggregation {
    /// Every accepted aggregation, in the order they are reported in errors.
    pub const ALL: [Aggregation; 9] = [
        Self::Mean,
        Self::Median,
        Self::Mode,
        Self::Max,
        Self::Min,
        Self::Sum,
        Self::Count,
        Self::Spread,
        Self::Stddev,
    ];

    /// Parse an aggregation by its InfluxQL function name.
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }

    /// InfluxQL function name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
            Self::Max => "max",
            Self::Min => "min",
            Self::Sum => "sum",
            Self::Count => "count",
            Self::Spread => "spread",
            Self::Stddev => "stddev",
        }
    }

    /// Comma separated list of accepted names.
    pub fn allowed() -> String {
        Self::ALL
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Aggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a scaling backend chooses which nodes to add or remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScaleStrategy {
    /// Set the desired pool size and let the provider pick nodes.
    #[default]
    Random,
}

impl ScaleStrategy {
    /// Parse a strategy name. The empty string selects the default.
    ///
    /// # Examples
    /// ```
    /// use autoscale_backends::ScaleStrategy;
    ///
    /// assert_eq!(ScaleStrategy::from_name(""), Some(ScaleStrategy::Random));
    /// assert_eq!(ScaleStrategy::from_name("random"), Some(ScaleStrategy::Random));
    /// assert_eq!(ScaleStrategy::from_name("unknown"), None);
    /// ```
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "" | "random" => Some(Self::Random),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Random => "random",
        }
    }
}

impl std::fmt::Display for ScaleStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Equality label selector restricting which nodes take part in an operation.
///
/// An empty selector matches every node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSelector {
    labels: BTreeMap<String, String>,
}

impl NodeSelector {
    /// Build a selector from the controller's label map.
    pub fn from_labels(labels: &HashMap<String, String>) -> Self {
        Self {
            labels: labels
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Add a required label.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Value required for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Render as a Kubernetes label selector (`k1=v1,k2=v2`, keys sorted).
    pub fn label_selector(&self) -> String {
        self.labels
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Whether a node carrying `labels` satisfies every requirement.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.labels
            .iter()
            .all(|(k, v)| labels.get(k).is_some_and(|actual| actual == v))
    }
}

impl std::fmt::Display for NodeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label_selector())
    }
}
