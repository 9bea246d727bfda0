//! Query Builder - Domain service
//!
//! Renders InfluxQL from templates. Built-in metrics use fixed templates
//! compiled once; custom metrics carry their own template text, compiled on
//! every call.
//!
//! Every template sees the same substitution variables:
//!
//! | variable           | value                                      |
//! |--------------------|--------------------------------------------|
//! | `aggregation`      | validated aggregation function name        |
//! | `db`               | database name                              |
//! | `retention_policy` | retention policy name                      |
//! | `range`            | validated duration literal, e.g. `5m`      |
//! | `host_list`        | host filter clause, see [`build_host_list`] |
//!
//! Custom templates are authored by the cluster operator in backend
//! configuration. They are trusted: their text is rendered into the query
//! without escaping. Referencing any other variable is a render error.
//!
//! Templates use Tera syntax with the snake_case names above, e.g.
//! `WHERE {{ host_list }}`. Go template syntax such as `{{.HostList}}` is
//! not accepted and fails as a template parse error, so queries carried over
//! from Go-based autoscalers must be rewritten.

use crate::domain::configuration::MetricConfiguration;
use crate::domain::error::QueryBuildError;
use crate::domain::value_objects::MetricKind;
use tera::{Context, Tera};

const CPU_TEMPLATE: &str = "cpu";
const MEMORY_TEMPLATE: &str = "mem";
const CUSTOM_TEMPLATE: &str = "query";

/// CPU usage across the given hosts for the given range.
const CPU_QUERY_TEMPLATE: &str = r#"SELECT {{ aggregation }}("usage_idle") AS "{{ aggregation }}_usage_idle" FROM "{{ db }}"."{{ retention_policy }}"."cpu"
WHERE time > now() - {{ range }} AND {{ host_list }}"#;

/// Memory usage across the given hosts for the given range.
const MEMORY_QUERY_TEMPLATE: &str = r#"SELECT {{ aggregation }}("used_percent") AS "{{ aggregation }}_used_percent" FROM "{{ db }}"."{{ retention_policy }}"."mem"
WHERE time > now() - {{ range }} AND {{ host_list }}"#;

/// Builds query strings for the InfluxDB metric backend.
pub struct QueryBuilder {
    templates: Tera,
}

impl QueryBuilder {
    /// Compile the built-in templates.
    pub fn new() -> Result<Self, QueryBuildError> {
        let mut templates = Tera::default();
        templates.autoescape_on(vec![]);
        templates
            .add_raw_templates(vec![
                (CPU_TEMPLATE, CPU_QUERY_TEMPLATE),
                (MEMORY_TEMPLATE, MEMORY_QUERY_TEMPLATE),
            ])
            .map_err(|e| template_error("built-in", &e))?;

        Ok(Self { templates })
    }

    /// Build the query for `kind` restricted to `hostnames`.
    pub fn build(
        &self,
        kind: MetricKind,
        hostnames: &[String],
        config: &MetricConfiguration,
    ) -> Result<String, QueryBuildError> {
        let context = substitutions(hostnames, config);

        match kind {
            MetricKind::CpuPercentUtilization => self.render(CPU_TEMPLATE, &context),
            MetricKind::MemoryPercentUtilization => self.render(MEMORY_TEMPLATE, &context),
            MetricKind::Custom => {
                let query = config
                    .query
                    .as_deref()
                    .ok_or(QueryBuildError::MissingCustomQuery)?;
                render_custom(query, &context)
            }
        }
    }

    fn render(&self, name: &str, context: &Context) -> Result<String, QueryBuildError> {
        self.templates
            .render(name, context)
            .map_err(|e| template_error(name, &e))
    }
}

/// Compile and render an operator-supplied template.
fn render_custom(query: &str, context: &Context) -> Result<String, QueryBuildError> {
    Tera::one_off(query, context, false).map_err(|e| template_error(CUSTOM_TEMPLATE, &e))
}

fn substitutions(hostnames: &[String], config: &MetricConfiguration) -> Context {
    let mut context = Context::new();
    context.insert("aggregation", config.aggregation.as_str());
    context.insert("db", &config.db);
    context.insert("retention_policy", &config.retention_policy);
    context.insert("range", &config.range);
    context.insert("host_list", &build_host_list(hostnames));
    context
}

/// Render the host filter clause.
///
/// No hosts renders `(true)` so the query matches every host; otherwise the
/// clause ORs one `"host"='<name>'` predicate per host, in order.
pub fn build_host_list<S: AsRef<str>>(hostnames: &[S]) -> String {
    if hostnames.is_empty() {
        return "(true)".to_string();
    }

    let predicates = hostnames
        .iter()
        .map(|h| format!("\"host\"='{}'", escape_literal(h.as_ref())))
        .collect::<Vec<_>>()
        .join(" OR ");

    format!("({})", predicates)
}

/// Escape a value for use inside a single-quoted InfluxQL string literal.
fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Flatten a template error and its causes into one message.
fn template_error(template: &str, err: &tera::Error) -> QueryBuildError {
    let mut detail = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }

    QueryBuildError::Template {
        template: template.to_string(),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Aggregation;

    fn hosts(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn custom(query: &str) -> MetricConfiguration {
        MetricConfiguration {
            query: Some(query.to_string()),
            ..MetricConfiguration::default()
        }
    }

    // ===== build_host_list Tests =====

    #[test]
    fn test_host_list_empty_matches_all() {
        let none: Vec<String> = Vec::new();
        assert_eq!(build_host_list(&none), "(true)");
        assert_eq!(build_host_list::<&str>(&[]), "(true)");
    }

    #[test]
    fn test_host_list_single() {
        assert_eq!(build_host_list(&["hostname-0"]), "(\"host\"='hostname-0')");
    }

    #[test]
    fn test_host_list_multiple() {
        assert_eq!(
            build_host_list(&["hostname-0", "hostname-1", "hostname-2"]),
            "(\"host\"='hostname-0' OR \"host\"='hostname-1' OR \"host\"='hostname-2')"
        );
    }

    #[test]
    fn test_host_list_escapes_quotes() {
        assert_eq!(build_host_list(&["a'b"]), "(\"host\"='a\\'b')");
    }

    // ===== Built-in template Tests =====

    #[test]
    fn test_cpu_query_with_defaults() {
        let builder = QueryBuilder::new().unwrap();
        let query = builder
            .build(
                MetricKind::CpuPercentUtilization,
                &hosts(&["hostname-0"]),
                &MetricConfiguration::default(),
            )
            .unwrap();

        assert_eq!(
            query,
            "SELECT mean(\"usage_idle\") AS \"mean_usage_idle\" FROM \"telegraf\".\"autogen\".\"cpu\"\n\
             WHERE time > now() - 5m AND (\"host\"='hostname-0')"
        );
    }

    #[test]
    fn test_memory_query_uses_configuration() {
        let builder = QueryBuilder::new().unwrap();
        let config = MetricConfiguration {
            aggregation: Aggregation::Max,
            range: "10m".to_string(),
            db: "metrics".to_string(),
            retention_policy: "rp_90d".to_string(),
            query: None,
        };

        let query = builder
            .build(MetricKind::MemoryPercentUtilization, &[], &config)
            .unwrap();

        assert!(query.starts_with("SELECT max(\"used_percent\") AS \"max_used_percent\""));
        assert!(query.contains("FROM \"metrics\".\"rp_90d\".\"mem\""));
        assert!(query.ends_with("WHERE time > now() - 10m AND (true)"));
    }

    #[test]
    fn test_builtin_ignores_query_key() {
        let builder = QueryBuilder::new().unwrap();
        let query = builder
            .build(MetricKind::CpuPercentUtilization, &[], &custom("SELECT 1"))
            .unwrap();
        assert!(query.contains("\"cpu\""));
    }

    // ===== Custom template Tests =====

    #[test]
    fn test_custom_query_requires_query_key() {
        let builder = QueryBuilder::new().unwrap();
        let err = builder
            .build(MetricKind::Custom, &[], &MetricConfiguration::default())
            .unwrap_err();
        assert_eq!(err, QueryBuildError::MissingCustomQuery);
    }

    #[test]
    fn test_custom_query_without_variables_is_unchanged() {
        let builder = QueryBuilder::new().unwrap();
        let text = "SELECT mean(\"free\") AS \"mean_free\" FROM \"telegraf\".\"rp_90d\".\"disk\" WHERE time > now() - 1m";
        let query = builder
            .build(MetricKind::Custom, &hosts(&["hostname-0"]), &custom(text))
            .unwrap();
        assert_eq!(query, text);
    }

    #[test]
    fn test_custom_query_substitutes_host_list() {
        let builder = QueryBuilder::new().unwrap();
        let query = builder
            .build(
                MetricKind::Custom,
                &hosts(&["h0", "h1"]),
                &custom("SELECT last(\"n\") FROM \"{{ db }}\"..\"procs\" WHERE {{ host_list }}"),
            )
            .unwrap();
        assert_eq!(
            query,
            "SELECT last(\"n\") FROM \"telegraf\"..\"procs\" WHERE (\"host\"='h0' OR \"host\"='h1')"
        );
    }

    #[test]
    fn test_custom_query_malformed_template() {
        let builder = QueryBuilder::new().unwrap();
        let err = builder
            .build(MetricKind::Custom, &[], &custom("SELECT {{ host_list"))
            .unwrap_err();
        assert!(matches!(err, QueryBuildError::Template { .. }));
    }

    #[test]
    fn test_custom_query_go_template_syntax_is_rejected() {
        let builder = QueryBuilder::new().unwrap();
        let err = builder
            .build(
                MetricKind::Custom,
                &hosts(&["h0"]),
                &custom("SELECT last(\"n\") FROM \"procs\" WHERE {{.HostList}}"),
            )
            .unwrap_err();
        match err {
            QueryBuildError::Template { template, .. } => assert_eq!(template, "query"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_custom_query_unknown_variable() {
        let builder = QueryBuilder::new().unwrap();
        let err = builder
            .build(MetricKind::Custom, &[], &custom("SELECT {{ nope }}"))
            .unwrap_err();
        match err {
            QueryBuildError::Template { template, detail } => {
                assert_eq!(template, "query");
                assert!(detail.contains("nope"), "{}", detail);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
