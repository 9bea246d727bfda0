//! InfluxDB HTTP Client
//!
//! Implements InfluxClient over the InfluxDB 1.x HTTP `/query` endpoint.

use crate::domain::entities::QueryResponse;
use crate::domain::ports::InfluxClient;
use anyhow::Context;
use async_trait::async_trait;

/// Client for the InfluxDB 1.x query API.
pub struct InfluxDbHttpClient {
    query_url: String,
    client: reqwest::Client,
}

impl InfluxDbHttpClient {
    /// Create a client for `address` (e.g. `http://influxdb:8086`).
    pub fn new(address: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("building HTTP client")?;

        Self::with_client(address, client)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(address: &str, client: reqwest::Client) -> anyhow::Result<Self> {
        let url = reqwest::Url::parse(address)
            .with_context(|| format!("parsing InfluxDB address {:?}", address))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("InfluxDB address must be http(s), got {:?}", address);
        }

        Ok(Self {
            query_url: format!("{}/query", address.trim_end_matches('/')),
            client,
        })
    }
}

#[async_trait]
impl InfluxClient for InfluxDbHttpClient {
    async fn query(&self, db: &str, command: &str) -> anyhow::Result<QueryResponse> {
        let response = self
            .client
            .get(&self.query_url)
            .query(&[("db", db), ("q", command)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Rejected queries come back as 4xx with an error body; hand
            // those to the caller as a response carrying the error.
            if let Ok(decoded) = serde_json::from_str::<QueryResponse>(&body) {
                if decoded.error().is_some() {
                    return Ok(decoded);
                }
            }
            anyhow::bail!("InfluxDB query failed: {} - {}", status, body);
        }

        let decoded = serde_json::from_str(&body).context("decoding InfluxDB response")?;
        Ok(decoded)
    }
}
