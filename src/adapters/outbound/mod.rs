mod containership_cloud_client;
mod containership_engine;
mod influxdb_backend;
mod influxdb_http_client;
mod kube_node_lister;
mod static_node_lister;

pub use containership_cloud_client::ContainershipCloudClient;
pub use containership_engine::{ContainershipEngine, NODE_POOL_ID_LABEL};
pub use influxdb_backend::InfluxDbBackend;
pub use influxdb_http_client::InfluxDbHttpClient;
pub use kube_node_lister::KubeNodeLister;
pub use static_node_lister::StaticNodeLister;
