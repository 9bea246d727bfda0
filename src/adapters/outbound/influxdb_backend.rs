//! InfluxDB Metric Backend
//!
//! Implements MetricBackend by querying InfluxDB for host-level metrics
//! collected by telegraf.

use crate::adapters::outbound::InfluxDbHttpClient;
use crate::domain::configuration::{InfluxDbConfig, MetricConfiguration};
use crate::domain::entities::Node;
use crate::domain::error::BackendError;
use crate::domain::ports::{InfluxClient, MetricBackend, NodeLister};
use crate::domain::services::{extract_value, QueryBuilder};
use crate::domain::value_objects::{MetricKind, NodeSelector};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Metric backend for InfluxDB.
///
/// Construction fixes the store address; every `get_value` call lists the
/// selected nodes, builds a query from its own configuration and reduces the
/// response to one value.
pub struct InfluxDbBackend {
    name: String,
    config: InfluxDbConfig,
    influx: Arc<dyn InfluxClient>,
    node_lister: Arc<dyn NodeLister>,
    queries: QueryBuilder,
}

impl InfluxDbBackend {
    /// Create a backend from a construction-time configuration map.
    ///
    /// Recognized keys: `address` (required).
    pub fn new(
        name: impl Into<String>,
        configuration: &HashMap<String, String>,
        node_lister: Arc<dyn NodeLister>,
    ) -> Result<Self, BackendError> {
        let config = InfluxDbConfig::default_and_validate(configuration)?;
        let influx = InfluxDbHttpClient::new(&config.address).map_err(|source| {
            BackendError::ClientSetup {
                client: "InfluxDB",
                source,
            }
        })?;

        Self::with_client(name, config, Arc::new(influx), node_lister)
    }

    /// Create a backend around an existing InfluxDB client.
    pub fn with_client(
        name: impl Into<String>,
        config: InfluxDbConfig,
        influx: Arc<dyn InfluxClient>,
        node_lister: Arc<dyn NodeLister>,
    ) -> Result<Self, BackendError> {
        let name = name.into();
        if name.is_empty() {
            return Err(BackendError::MissingName);
        }

        Ok(Self {
            name,
            config,
            influx,
            node_lister,
            queries: QueryBuilder::new()?,
        })
    }

    /// Construction-time configuration.
    pub fn config(&self) -> &InfluxDbConfig {
        &self.config
    }

    /// Host names of the nodes matching `selector`, in listing order.
    async fn hostnames(&self, selector: &NodeSelector) -> Result<Vec<String>, BackendError> {
        let nodes = self
            .node_lister
            .list(selector)
            .await
            .map_err(|source| BackendError::NodeListing {
                selector: selector.label_selector(),
                source,
            })?;

        Ok(nodes.iter().map(Node::hostname).map(str::to_string).collect())
    }

    async fn perform_query(&self, db: &str, query: String) -> Result<f64, BackendError> {
        tracing::debug!("performing InfluxDB query: {}", query);

        let result = self.influx.query(db, &query).await;
        let response = match result {
            Ok(response) => response,
            Err(source) => return Err(BackendError::Query { query, source }),
        };

        extract_value(&response).map_err(|source| BackendError::Extract { query, source })
    }
}

#[async_trait]
impl MetricBackend for InfluxDbBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_value(
        &self,
        metric: &str,
        configuration: &HashMap<String, String>,
        node_selector: &HashMap<String, String>,
    ) -> Result<f64, BackendError> {
        let selector = NodeSelector::from_labels(node_selector);
        let hostnames = self.hostnames(&selector).await?;

        let config = MetricConfiguration::default_and_validate(configuration)
            .map_err(BackendError::MetricConfiguration)?;

        let kind = MetricKind::from_name(metric)
            .ok_or_else(|| BackendError::UnknownMetric(metric.to_string()))?;

        let query = self.queries.build(kind, &hostnames, &config)?;
        self.perform_query(&config.db, query).await
    }
}
