//! Containership Scaling Engine
//!
//! Implements ScalingBackend by asking Containership Cloud to resize the node
//! pool named by the selector.

use crate::adapters::outbound::ContainershipCloudClient;
use crate::domain::configuration::CloudConfig;
use crate::domain::entities::ScaleNodePoolRequest;
use crate::domain::error::BackendError;
use crate::domain::ports::{ProvisionClient, ScalingBackend};
use crate::domain::value_objects::ScaleStrategy;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Node label whose value identifies the Containership node pool.
pub const NODE_POOL_ID_LABEL: &str = "containership.io/node-pool-id";

/// Scaling backend for Containership Cloud node pools.
pub struct ContainershipEngine {
    name: String,
    config: CloudConfig,
    cloud: Arc<dyn ProvisionClient>,
}

impl ContainershipEngine {
    /// Create an engine from a construction-time configuration map.
    ///
    /// Recognized keys: `address` (defaults to the public provision API),
    /// `tokenEnvVarName`, `organizationID` and `clusterID` (all required).
    /// The variable named by `tokenEnvVarName` must be set when this runs.
    pub fn new(
        name: impl Into<String>,
        configuration: &HashMap<String, String>,
    ) -> Result<Self, BackendError> {
        let name = name.into();
        if name.is_empty() {
            return Err(BackendError::MissingName);
        }

        let config = CloudConfig::default_and_validate(configuration)?;
        let token = config.token()?;
        let cloud = ContainershipCloudClient::new(&config.address, token).map_err(|source| {
            BackendError::ClientSetup {
                client: "Containership Cloud",
                source,
            }
        })?;

        Self::with_client(name, config, Arc::new(cloud))
    }

    /// Create an engine around an existing provisioning client.
    pub fn with_client(
        name: impl Into<String>,
        config: CloudConfig,
        cloud: Arc<dyn ProvisionClient>,
    ) -> Result<Self, BackendError> {
        let name = name.into();
        if name.is_empty() {
            return Err(BackendError::MissingName);
        }

        Ok(Self {
            name,
            config,
            cloud,
        })
    }

    /// Construction-time configuration.
    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    /// Set the pool's desired size and let Containership Cloud pick which
    /// nodes to add or remove.
    async fn scale_strategy_random(
        &self,
        node_pool_id: &str,
        count: i32,
    ) -> Result<bool, BackendError> {
        let request = ScaleNodePoolRequest { count };

        self.cloud
            .scale_node_pool(
                &self.config.organization_id,
                &self.config.cluster_id,
                node_pool_id,
                &request,
            )
            .await
            .map_err(|source| BackendError::Provision {
                pool_id: node_pool_id.to_string(),
                source,
            })?;

        Ok(true)
    }
}

#[async_trait]
impl ScalingBackend for ContainershipEngine {
    fn name(&self) -> &str {
        &self.name
    }

    async fn set_target_node_count(
        &self,
        node_selector: &HashMap<String, String>,
        target_count: i64,
        strategy: &str,
    ) -> Result<bool, BackendError> {
        if target_count < 0 {
            return Err(BackendError::NegativeTargetCount(target_count));
        }
        let count = i32::try_from(target_count)
            .map_err(|_| BackendError::TargetCountOutOfRange(target_count))?;

        let node_pool_id = node_selector
            .get(NODE_POOL_ID_LABEL)
            .filter(|id| !id.is_empty())
            .ok_or(BackendError::MissingNodePool(NODE_POOL_ID_LABEL))?;

        tracing::info!(
            engine = %self.name,
            node_pool_id = %node_pool_id,
            "requesting Containership Cloud to set target nodes {:?} to {}",
            node_selector,
            count
        );

        match ScaleStrategy::from_name(strategy) {
            Some(ScaleStrategy::Random) => self.scale_strategy_random(node_pool_id, count).await,
            None => Err(BackendError::UnsupportedStrategy(strategy.to_string())),
        }
    }
}
