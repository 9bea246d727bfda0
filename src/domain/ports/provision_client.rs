//! Provision Client Port
//!
//! Defines the wire client the Containership engine scales node pools with.

use crate::domain::entities::ScaleNodePoolRequest;
use async_trait::async_trait;

/// Remote provisioning API.
#[async_trait]
pub trait ProvisionClient: Send + Sync {
    /// Set the desired size of a node pool.
    async fn scale_node_pool(
        &self,
        organization_id: &str,
        cluster_id: &str,
        node_pool_id: &str,
        request: &ScaleNodePoolRequest,
    ) -> anyhow::Result<()>;
}
