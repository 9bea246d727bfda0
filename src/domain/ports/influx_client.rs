//! InfluxDB Client Port
//!
//! Defines the wire client the InfluxDB metric backend executes queries with.

use crate::domain::entities::QueryResponse;
use async_trait::async_trait;

/// Executes InfluxQL against a database.
#[async_trait]
pub trait InfluxClient: Send + Sync {
    /// Run `command` against `db`.
    ///
    /// Transport failures are errors. A response the store answered with,
    /// including one carrying an embedded error, is returned as-is.
    async fn query(&self, db: &str, command: &str) -> anyhow::Result<QueryResponse>;
}
