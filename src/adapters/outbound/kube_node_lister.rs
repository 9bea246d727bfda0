//! Kubernetes Node Lister
//!
//! Implements NodeLister with the Kubernetes API.

use crate::domain::entities::Node;
use crate::domain::ports::NodeLister;
use crate::domain::value_objects::NodeSelector;
use anyhow::Context;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node as KubeNode;
use kube::api::{Api, ListParams};

/// Lists cluster nodes through the Kubernetes API server.
pub struct KubeNodeLister {
    nodes: Api<KubeNode>,
}

impl KubeNodeLister {
    /// Create a lister from an existing client.
    pub fn new(client: kube::Client) -> Self {
        Self {
            nodes: Api::all(client),
        }
    }

    /// Connect using the in-cluster or kubeconfig defaults.
    pub async fn try_default() -> anyhow::Result<Self> {
        let client = kube::Client::try_default()
            .await
            .context("connecting to Kubernetes")?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl NodeLister for KubeNodeLister {
    async fn list(&self, selector: &NodeSelector) -> anyhow::Result<Vec<Node>> {
        let mut params = ListParams::default();
        if !selector.is_empty() {
            params = params.labels(&selector.label_selector());
        }

        let list = self
            .nodes
            .list(&params)
            .await
            .with_context(|| {
                format!(
                    "listing nodes with selector {:?}",
                    selector.label_selector()
                )
            })?;

        tracing::debug!("listed {} nodes for selector {}", list.items.len(), selector);

        Ok(list.items.into_iter().map(node_from_kube).collect())
    }
}

fn node_from_kube(node: KubeNode) -> Node {
    Node {
        name: node.metadata.name.unwrap_or_default(),
        labels: node.metadata.labels.unwrap_or_default(),
    }
}
