//! autoscale-check - Exercise the autoscaler backends once
//!
//! This is the composition root that wires together all the components.

use anyhow::Context;
use autoscale_backends::adapters::outbound::{
    ContainershipEngine, InfluxDbBackend, KubeNodeLister, StaticNodeLister,
};
use autoscale_backends::application::BackendRegistry;
use autoscale_backends::config::load_config;
use autoscale_backends::domain::ports::NodeLister;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;

const METRIC_BACKEND_NAME: &str = "influxdb";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting autoscale-check influxdb={} metric={}",
        cfg.influxdb_address,
        cfg.metric
    );

    let timeout = Duration::from_secs(cfg.request_timeout_secs);

    // ===== COMPOSITION ROOT =====

    // 1. Node lister (Kubernetes, or an empty static set outside a cluster)
    let node_lister: Arc<dyn NodeLister> = match KubeNodeLister::try_default().await {
        Ok(lister) => Arc::new(lister),
        Err(e) => {
            tracing::warn!(
                "Kubernetes unavailable, querying without a host filter: {:?}",
                e
            );
            Arc::new(StaticNodeLister::default())
        }
    };

    // 2. Backends
    let registry = BackendRegistry::new();

    let mut influx_config = HashMap::new();
    influx_config.insert("address".to_string(), cfg.influxdb_address.clone());
    let influx = InfluxDbBackend::new(METRIC_BACKEND_NAME, &influx_config, node_lister)
        .context("creating InfluxDB backend")?;
    registry.register_metric_backend(Arc::new(influx));

    if cfg.target_node_count.is_some() {
        let engine = ContainershipEngine::new(cfg.engine_name.clone(), &cfg.engine_configuration)
            .context("creating Containership engine")?;
        registry.register_scaling_backend(Arc::new(engine));
    }

    // 3. Read the metric once
    let metrics = registry
        .get_metric_backend(METRIC_BACKEND_NAME)
        .context("metric backend not registered")?;

    let value = tokio::time::timeout(
        timeout,
        metrics.get_value(&cfg.metric, &cfg.metric_configuration, &cfg.node_selector),
    )
    .await
    .with_context(|| format!("reading {} timed out after {:?}", cfg.metric, timeout))?
    .with_context(|| format!("reading {}", cfg.metric))?;

    println!("{} = {}", cfg.metric, value);

    // 4. Scale once, if asked to
    if let Some(count) = cfg.target_node_count {
        let engine = registry
            .get_scaling_backend(&cfg.engine_name)
            .context("scaling backend not registered")?;

        let scaled = tokio::time::timeout(
            timeout,
            engine.set_target_node_count(&cfg.node_selector, count, &cfg.strategy),
        )
        .await
        .with_context(|| format!("scaling to {} timed out after {:?}", count, timeout))?
        .with_context(|| format!("scaling to {} nodes", count))?;

        tracing::info!("scale request to {} nodes accepted={}", count, scaled);
    }

    Ok(())
}
