//! Backend Registry - Application service
//!
//! Holds named metric and scaling backends so the controller can look them
//! up by the names its configuration refers to.

use crate::domain::ports::{MetricBackend, ScalingBackend};
use dashmap::DashMap;
use std::sync::Arc;

/// Named registry of metric and scaling backends.
///
/// Uses DashMap so registration and lookup can happen from any task.
/// Metric and scaling backends live in separate namespaces.
#[derive(Default)]
pub struct BackendRegistry {
    metric_backends: DashMap<String, Arc<dyn MetricBackend>>,
    scaling_backends: DashMap<String, Arc<dyn ScalingBackend>>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a metric backend under its own name.
    ///
    /// Returns the backend previously registered under that name, if any.
    pub fn register_metric_backend(
        &self,
        backend: Arc<dyn MetricBackend>,
    ) -> Option<Arc<dyn MetricBackend>> {
        let name = backend.name().to_string();
        let previous = self.metric_backends.insert(name.clone(), backend);
        if previous.is_some() {
            tracing::debug!("replaced metric backend {}", name);
        } else {
            tracing::debug!("registered metric backend {}", name);
        }
        previous
    }

    /// Register a scaling backend under its own name.
    ///
    /// Returns the backend previously registered under that name, if any.
    pub fn register_scaling_backend(
        &self,
        backend: Arc<dyn ScalingBackend>,
    ) -> Option<Arc<dyn ScalingBackend>> {
        let name = backend.name().to_string();
        let previous = self.scaling_backends.insert(name.clone(), backend);
        if previous.is_some() {
            tracing::debug!("replaced scaling backend {}", name);
        } else {
            tracing::debug!("registered scaling backend {}", name);
        }
        previous
    }

    pub fn get_metric_backend(&self, name: &str) -> Option<Arc<dyn MetricBackend>> {
        self.metric_backends.get(name).map(|e| e.value().clone())
    }

    pub fn get_scaling_backend(&self, name: &str) -> Option<Arc<dyn ScalingBackend>> {
        self.scaling_backends.get(name).map(|e| e.value().clone())
    }

    pub fn remove_metric_backend(&self, name: &str) -> Option<Arc<dyn MetricBackend>> {
        self.metric_backends.remove(name).map(|(_, backend)| backend)
    }

    pub fn remove_scaling_backend(&self, name: &str) -> Option<Arc<dyn ScalingBackend>> {
        self.scaling_backends.remove(name).map(|(_, backend)| backend)
    }

    /// Names of all registered metric backends, sorted.
    pub fn metric_backend_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .metric_backends
            .iter()
            .map(|e| e.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Names of all registered scaling backends, sorted.
    pub fn scaling_backend_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .scaling_backends
            .iter()
            .map(|e| e.key().clone())
            .collect();
        names.sort();
        names
    }
}
