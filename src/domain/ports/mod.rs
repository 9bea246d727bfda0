mod influx_client;
mod metric_backend;
mod node_lister;
mod provision_client;
mod scaling_backend;

pub use influx_client::InfluxClient;
pub use metric_backend::MetricBackend;
pub use node_lister::NodeLister;
pub use provision_client::ProvisionClient;
pub use scaling_backend::ScalingBackend;
