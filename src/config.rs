use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Metric backend settings
    pub influxdb_address: String,
    pub metric: String,
    pub metric_configuration: HashMap<String, String>,
    pub node_selector: HashMap<String, String>,

    // Scaling backend settings
    pub engine_name: String,
    pub engine_configuration: HashMap<String, String>,
    pub target_node_count: Option<i64>,
    pub strategy: String,

    pub request_timeout_secs: u64,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            influxdb_address: "http://localhost:8086".to_string(),
            metric: "cpu_percent_utilization".to_string(),
            metric_configuration: HashMap::new(),
            node_selector: HashMap::new(),
            engine_name: "containership".to_string(),
            engine_configuration: HashMap::new(),
            target_node_count: None,
            strategy: String::new(),
            request_timeout_secs: 10,
            debug: false,
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    let influxdb_address = std::env::var("AUTOSCALE_INFLUXDB_ADDRESS")
        .unwrap_or_else(|_| "http://localhost:8086".to_string());

    let metric = std::env::var("AUTOSCALE_METRIC")
        .unwrap_or_else(|_| "cpu_percent_utilization".to_string());

    let metric_configuration = parse_key_values(
        &std::env::var("AUTOSCALE_METRIC_CONFIGURATION").unwrap_or_default(),
    )
    .context("parsing AUTOSCALE_METRIC_CONFIGURATION")?;

    let node_selector =
        parse_key_values(&std::env::var("AUTOSCALE_NODE_SELECTOR").unwrap_or_default())
            .context("parsing AUTOSCALE_NODE_SELECTOR")?;

    let engine_name = std::env::var("AUTOSCALE_ENGINE_NAME")
        .unwrap_or_else(|_| "containership".to_string());

    let engine_configuration = parse_key_values(
        &std::env::var("AUTOSCALE_ENGINE_CONFIGURATION").unwrap_or_default(),
    )
    .context("parsing AUTOSCALE_ENGINE_CONFIGURATION")?;

    let target_node_count =
        parse_target_node_count(std::env::var("AUTOSCALE_TARGET_NODE_COUNT").ok().as_deref())?;

    let strategy = std::env::var("AUTOSCALE_STRATEGY").unwrap_or_default();

    let request_timeout_secs = std::env::var("AUTOSCALE_REQUEST_TIMEOUT_SECS")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .unwrap_or(10);

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config {
        influxdb_address,
        metric,
        metric_configuration,
        node_selector,
        engine_name,
        engine_configuration,
        target_node_count,
        strategy,
        request_timeout_secs,
        debug,
    })
}

/// Unset or blank means no scale request; anything else must be an integer.
fn parse_target_node_count(raw: Option<&str>) -> anyhow::Result<Option<i64>> {
    match raw.map(str::trim) {
        Some(v) if !v.is_empty() => {
            let count = v
                .parse()
                .with_context(|| format!("parsing AUTOSCALE_TARGET_NODE_COUNT {:?}", v))?;
            Ok(Some(count))
        }
        _ => Ok(None),
    }
}

/// Parse `key=value,key2=value2` into a map.
///
/// Whitespace around keys and values is trimmed and empty segments are
/// skipped. Values may contain `=`; only the first one splits.
pub fn parse_key_values(raw: &str) -> anyhow::Result<HashMap<String, String>> {
    let mut map = HashMap::new();

    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("expected key=value, got {:?}", pair))?;
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("empty key in {:?}", pair);
        }
        map.insert(key.to_string(), value.trim().to_string());
    }

    Ok(map)
}
