//! Node Lister Port
//!
//! Defines how backends find the nodes matching a selector.

use crate::domain::entities::Node;
use crate::domain::value_objects::NodeSelector;
use async_trait::async_trait;

/// Lists cluster nodes.
///
/// This is an outbound port. An empty result is valid and means no node
/// currently matches.
#[async_trait]
pub trait NodeLister: Send + Sync {
    /// List the nodes matching `selector`, in a stable order.
    async fn list(&self, selector: &NodeSelector) -> anyhow::Result<Vec<Node>>;
}
