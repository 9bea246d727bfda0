//! Autoscaler Backends Library
//!
//! Pluggable metric and scaling backends for a cluster autoscaler: an
//! InfluxDB metric backend and a Containership Cloud scaling engine,
//! plus a registry that holds them by name.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

// Re-export commonly used types
pub use adapters::outbound::{
    ContainershipCloudClient, ContainershipEngine, InfluxDbBackend, InfluxDbHttpClient,
    KubeNodeLister, StaticNodeLister, NODE_POOL_ID_LABEL,
};
pub use application::BackendRegistry;
pub use config::load_config;
pub use domain::entities::{Node, QueryResponse};
pub use domain::error::{BackendError, ErrorKind};
pub use domain::ports::{MetricBackend, ScalingBackend};
pub use domain::value_objects::{Aggregation, MetricKind, NodeSelector, ScaleStrategy};
