//! Application Layer - Services built on the domain ports

mod backend_registry;

pub use backend_registry::BackendRegistry;
