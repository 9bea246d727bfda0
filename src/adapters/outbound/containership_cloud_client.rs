//! Containership Cloud Client
//!
//! Implements ProvisionClient over the Containership Cloud provision REST API.

use crate::domain::entities::ScaleNodePoolRequest;
use crate::domain::ports::ProvisionClient;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;

/// Client for the Containership Cloud provision API.
pub struct ContainershipCloudClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl ContainershipCloudClient {
    /// Create a client for the provision API at `address`, authenticating with `token`.
    pub fn new(address: &str, token: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("building HTTP client")?;

        Self::with_client(address, token, client)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(
        address: &str,
        token: String,
        client: reqwest::Client,
    ) -> anyhow::Result<Self> {
        let url = reqwest::Url::parse(address)
            .with_context(|| format!("parsing provision address {:?}", address))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("provision address must be http(s), got {:?}", address);
        }
        if token.is_empty() {
            anyhow::bail!("Containership Cloud token must not be empty");
        }

        Ok(Self {
            base_url: address.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    fn scale_url(&self, organization_id: &str, cluster_id: &str, node_pool_id: &str) -> String {
        format!(
            "{}/v3/organizations/{}/clusters/{}/node-pools/{}/scale",
            self.base_url, organization_id, cluster_id, node_pool_id
        )
    }
}

#[async_trait]
impl ProvisionClient for ContainershipCloudClient {
    async fn scale_node_pool(
        &self,
        organization_id: &str,
        cluster_id: &str,
        node_pool_id: &str,
        request: &ScaleNodePoolRequest,
    ) -> anyhow::Result<()> {
        let url = self.scale_url(organization_id, cluster_id, node_pool_id);
        let response = self
            .client
            .patch(&url)
            .header(AUTHORIZATION, format!("JWT {}", self.token))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Containership Cloud scale request failed: {} - {}", status, body);
        }

        Ok(())
    }
}
