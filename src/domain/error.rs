//! Backend errors
//!
//! Every failure is returned to the caller; nothing here is retried.

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be provided")]
    MissingField(&'static str),
    #[error("environment variable {0:?} is unset or empty")]
    EmptyEnvVar(String),
    #[error("invalid {field} {value:?}: {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors building a query string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryBuildError {
    #[error("single configuration key \"query\" must be provided for a custom query")]
    MissingCustomQuery,
    #[error("rendering template {template}: {detail}")]
    Template { template: String, detail: String },
}

/// Errors reducing a query response to a single value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("store reported an error: {0}")]
    Remote(String),
    #[error("response contains no results")]
    NoResults,
    #[error("first result contains no series")]
    NoSeries,
    #[error("first series contains no rows")]
    NoRows,
    #[error("first row has no value column ({0} cells)")]
    MissingValue(usize),
    #[error("value {0} is not a number")]
    NotANumber(String),
}

/// Broad class of a [`BackendError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid configuration or client setup; no backend was created
    Construction,
    /// Invalid call arguments
    Input,
    /// Node listing, query execution or provisioning failed
    Collaborator,
    /// The store answered with an empty or malformed response
    DataShape,
}

/// Error returned by metric and scaling backends.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("name must be provided")]
    MissingName,

    #[error("validating configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("validating metric configuration: {0}")]
    MetricConfiguration(#[source] ConfigError),

    #[error("instantiating {client} client: {source}")]
    ClientSetup {
        client: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("unknown metric {0:?}")]
    UnknownMetric(String),

    #[error("building query: {0}")]
    QueryBuild(#[from] QueryBuildError),

    #[error("cannot scale below 0 (requested {0})")]
    NegativeTargetCount(i64),

    #[error("target node count {0} is out of range")]
    TargetCountOutOfRange(i64),

    #[error("could not get node pool ID: selector has no {0:?} label")]
    MissingNodePool(&'static str),

    #[error("unable to scale node pool using strategy {0:?}")]
    UnsupportedStrategy(String),

    #[error("listing nodes with selector {selector:?}: {source}")]
    NodeListing {
        selector: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("querying InfluxDB with string {query:?}: {source}")]
    Query {
        query: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("reading InfluxDB response to {query:?}: {source}")]
    Extract {
        query: String,
        #[source]
        source: ExtractError,
    },

    #[error("scaling node pool {pool_id:?}: {source}")]
    Provision {
        pool_id: String,
        #[source]
        source: anyhow::Error,
    },
}

impl BackendError {
    /// Classify the error so callers can decide whether retrying makes sense.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingName | Self::Configuration(_) | Self::ClientSetup { .. } => {
                ErrorKind::Construction
            }
            Self::MetricConfiguration(_)
            | Self::UnknownMetric(_)
            | Self::QueryBuild(_)
            | Self::NegativeTargetCount(_)
            | Self::TargetCountOutOfRange(_)
            | Self::MissingNodePool(_)
            | Self::UnsupportedStrategy(_) => ErrorKind::Input,
            Self::NodeListing { .. } | Self::Query { .. } | Self::Provision { .. } => {
                ErrorKind::Collaborator
            }
            Self::Extract {
                source: ExtractError::Remote(_),
                ..
            } => ErrorKind::Collaborator,
            Self::Extract { .. } => ErrorKind::DataShape,
        }
    }
}
