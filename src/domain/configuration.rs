//! Backend configuration
//!
//! Configuration reaches the backends as untyped string maps. Each map is
//! decoded into a struct (unknown keys are ignored) and then every field is
//! defaulted and validated by its own step, in a fixed order, so later steps
//! can rely on earlier defaults.

use crate::domain::error::ConfigError;
use crate::domain::value_objects::Aggregation;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;

pub const DEFAULT_RANGE: &str = "5m";
pub const DEFAULT_DB: &str = "telegraf";
pub const DEFAULT_RETENTION_POLICY: &str = "autogen";
pub const DEFAULT_PROVISION_ADDRESS: &str = "https://provision.containership.io";

/// Decode a string map into a configuration struct.
fn decode<T: DeserializeOwned>(configuration: &HashMap<String, String>) -> Result<T, ConfigError> {
    serde_json::to_value(configuration)
        .and_then(serde_json::from_value)
        .map_err(|e| ConfigError::InvalidField {
            field: "configuration",
            value: String::new(),
            reason: e.to_string(),
        })
}

fn require(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField(field));
    }
    Ok(())
}

// ===== Per-call metric configuration =====

// Aliases accept the other casings operators have written these keys in.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawMetricConfiguration {
    #[serde(alias = "Aggregation")]
    aggregation: String,
    #[serde(alias = "Range")]
    range: String,
    #[serde(alias = "DB", alias = "Db")]
    db: String,
    #[serde(alias = "RetentionPolicy", alias = "retention_policy", alias = "retentionpolicy")]
    retention_policy: String,
    #[serde(alias = "Query")]
    query: Option<String>,
}

/// Per-call configuration of a metric query.
///
/// Re-parsed on every `get_value` call; never stored on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricConfiguration {
    pub aggregation: Aggregation,
    pub range: String,
    pub db: String,
    pub retention_policy: String,
    /// Raw query template, only consulted for custom metrics
    pub query: Option<String>,
}

impl Default for MetricConfiguration {
    fn default() -> Self {
        Self {
            aggregation: Aggregation::default(),
            range: DEFAULT_RANGE.to_string(),
            db: DEFAULT_DB.to_string(),
            retention_policy: DEFAULT_RETENTION_POLICY.to_string(),
            query: None,
        }
    }
}

impl MetricConfiguration {
    /// Default and validate a per-call configuration map.
    pub fn default_and_validate(
        configuration: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let raw: RawMetricConfiguration = decode(configuration)?;

        Ok(Self {
            aggregation: default_and_validate_aggregation(&raw.aggregation)?,
            range: default_and_validate_range(&raw.range)?,
            db: default_and_validate_db(&raw.db),
            retention_policy: default_and_validate_retention_policy(&raw.retention_policy),
            query: raw.query.filter(|q| !q.trim().is_empty()),
        })
    }
}

pub fn default_and_validate_aggregation(value: &str) -> Result<Aggregation, ConfigError> {
    if value.is_empty() {
        return Ok(Aggregation::default());
    }

    Aggregation::from_name(value).ok_or_else(|| ConfigError::InvalidField {
        field: "aggregation",
        value: value.to_string(),
        reason: format!("expected one of {}", Aggregation::allowed()),
    })
}

pub fn default_and_validate_range(value: &str) -> Result<String, ConfigError> {
    if value.is_empty() {
        return Ok(DEFAULT_RANGE.to_string());
    }

    if !is_duration_literal(value) {
        return Err(ConfigError::InvalidField {
            field: "range",
            value: value.to_string(),
            reason: "expected a duration such as 30s, 5m or 1h30m".to_string(),
        });
    }

    Ok(value.to_string())
}

pub fn default_and_validate_db(value: &str) -> String {
    if value.is_empty() {
        DEFAULT_DB.to_string()
    } else {
        value.to_string()
    }
}

pub fn default_and_validate_retention_policy(value: &str) -> String {
    if value.is_empty() {
        DEFAULT_RETENTION_POLICY.to_string()
    } else {
        value.to_string()
    }
}

/// Whether `s` is an InfluxQL duration literal: one or more `<digits><unit>`.
fn is_duration_literal(s: &str) -> bool {
    const UNITS: [&str; 9] = ["ns", "ms", "u", "µ", "s", "m", "h", "d", "w"];

    let mut rest = s;
    if rest.is_empty() {
        return false;
    }

    while !rest.is_empty() {
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return false;
        }
        rest = &rest[digits..];

        match UNITS.iter().find(|unit| rest.starts_with(*unit)) {
            Some(unit) => rest = &rest[unit.len()..],
            None => return false,
        }
    }

    true
}

// ===== InfluxDB backend configuration =====

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawInfluxDbConfig {
    #[serde(alias = "Address")]
    address: String,
}

/// Construction-time configuration of the InfluxDB metric backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfluxDbConfig {
    /// Base URL of the InfluxDB HTTP API, e.g. `http://influxdb:8086`
    pub address: String,
}

impl InfluxDbConfig {
    pub fn default_and_validate(
        configuration: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let raw: RawInfluxDbConfig = decode(configuration)?;

        // No default: the address is deployment specific.
        require("address", &raw.address)?;

        Ok(Self {
            address: raw.address,
        })
    }
}

// ===== Containership Cloud engine configuration =====

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCloudConfig {
    #[serde(alias = "Address")]
    address: String,
    #[serde(
        rename = "tokenEnvVarName",
        alias = "TokenEnvVarName",
        alias = "tokenenvvarname"
    )]
    token_env_var_name: String,
    #[serde(
        rename = "organizationID",
        alias = "organizationId",
        alias = "OrganizationID",
        alias = "organizationid"
    )]
    organization_id: String,
    #[serde(
        rename = "clusterID",
        alias = "clusterId",
        alias = "ClusterID",
        alias = "clusterid"
    )]
    cluster_id: String,
}

/// Construction-time configuration of the Containership scaling engine.
///
/// The access token itself never appears here: `token_env_var_name` names
/// the environment variable holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudConfig {
    pub address: String,
    pub token_env_var_name: String,
    pub organization_id: String,
    pub cluster_id: String,
}

impl CloudConfig {
    pub fn default_and_validate(
        configuration: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let raw: RawCloudConfig = decode(configuration)?;

        let address = default_and_validate_address(&raw.address);
        let token_env_var_name = default_and_validate_token_env_var_name(&raw.token_env_var_name)?;
        require("organizationID", &raw.organization_id)?;
        require("clusterID", &raw.cluster_id)?;

        Ok(Self {
            address,
            token_env_var_name,
            organization_id: raw.organization_id,
            cluster_id: raw.cluster_id,
        })
    }

    /// Read the access token from the configured environment variable.
    pub fn token(&self) -> Result<String, ConfigError> {
        read_env_secret(&self.token_env_var_name)
    }
}

pub fn default_and_validate_address(value: &str) -> String {
    if value.is_empty() {
        DEFAULT_PROVISION_ADDRESS.to_string()
    } else {
        value.to_string()
    }
}

/// The variable must be named and must currently hold a value.
pub fn default_and_validate_token_env_var_name(value: &str) -> Result<String, ConfigError> {
    require("tokenEnvVarName", value)?;
    read_env_secret(value)?;
    Ok(value.to_string())
}

fn read_env_secret(var: &str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::EmptyEnvVar(var.to_string())),
    }
}
