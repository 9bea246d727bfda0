//! Scaling Backend Port
//!
//! Defines the capability the autoscaling controller uses to act on a decision.

use crate::domain::error::BackendError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Applies a target size to the node pool identified by a selector.
///
/// Implementations keep no mutable state between calls; only the remote
/// system changes.
#[async_trait]
pub trait ScalingBackend: Send + Sync {
    /// Name assigned at construction.
    fn name(&self) -> &str;

    /// Ask the provider to run `target_count` nodes in the selected pool.
    ///
    /// Returns `Ok(true)` once the provider accepted the request. A negative
    /// count, a selector without a pool id or an unknown `strategy` fail
    /// before any remote call is made.
    async fn set_target_node_count(
        &self,
        node_selector: &HashMap<String, String>,
        target_count: i64,
        strategy: &str,
    ) -> Result<bool, BackendError>;
}
