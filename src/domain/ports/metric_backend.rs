//! Metric Backend Port
//!
//! Defines the capability the autoscaling controller uses to read load.

use crate::domain::error::BackendError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Source of a single scalar describing current cluster load.
///
/// This is an inbound port: the controller holds backends as
/// `Arc<dyn MetricBackend>` and invokes them identically regardless of the
/// metrics system behind them. Implementations keep no mutable state between
/// calls, so one backend can serve concurrent callers.
#[async_trait]
pub trait MetricBackend: Send + Sync {
    /// Name assigned at construction.
    fn name(&self) -> &str;

    /// Read the current value of `metric` over the nodes matching `node_selector`.
    ///
    /// `configuration` is re-validated on every call and may customize the
    /// aggregation, time range or carry a raw query for custom metrics.
    async fn get_value(
        &self,
        metric: &str,
        configuration: &HashMap<String, String>,
        node_selector: &HashMap<String, String>,
    ) -> Result<f64, BackendError>;
}
