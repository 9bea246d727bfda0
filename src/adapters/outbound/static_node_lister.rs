//! Static Node Lister
//!
//! Implements NodeLister over an in-memory node set.

use crate::domain::entities::Node;
use crate::domain::ports::NodeLister;
use crate::domain::value_objects::NodeSelector;
use async_trait::async_trait;
use parking_lot::RwLock;

/// In-memory node lister.
///
/// Holds a fixed node set that can be replaced at runtime. Selection uses the
/// same equality semantics as a Kubernetes label selector.
#[derive(Default)]
pub struct StaticNodeLister {
    nodes: RwLock<Vec<Node>>,
}

impl StaticNodeLister {
    /// Create a lister serving `nodes`, in the given order.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes: RwLock::new(nodes),
        }
    }

    /// Replace the node set.
    pub fn set_nodes(&self, nodes: Vec<Node>) {
        *self.nodes.write() = nodes;
    }

    /// Number of nodes held.
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }
}

#[async_trait]
impl NodeLister for StaticNodeLister {
    async fn list(&self, selector: &NodeSelector) -> anyhow::Result<Vec<Node>> {
        Ok(self
            .nodes
            .read()
            .iter()
            .filter(|n| selector.matches(&n.labels))
            .cloned()
            .collect())
    }
}
