//! Domain Layer
//!
//! Backend capabilities, collaborator ports and the query pipeline.
//! Nothing in here knows which metrics store or cloud API is behind a port.

pub mod configuration;
pub mod entities;
pub mod error;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use configuration::{CloudConfig, InfluxDbConfig, MetricConfiguration};
pub use entities::{Node, QueryResponse, QueryResult, ScaleNodePoolRequest, Series, HOSTNAME_LABEL};
pub use error::{BackendError, ConfigError, ErrorKind, ExtractError, QueryBuildError};
pub use value_objects::{Aggregation, MetricKind, NodeSelector, ScaleStrategy};
