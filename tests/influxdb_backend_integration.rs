//! Integration tests for the InfluxDB metric backend with Wiremock
//!
//! Drives the backend end to end over HTTP against a mock InfluxDB.

use autoscale_backends::domain::entities::HOSTNAME_LABEL;
use autoscale_backends::{
    BackendError, ErrorKind, InfluxDbBackend, MetricBackend, Node, StaticNodeLister,
};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn worker(name: &str) -> Node {
    Node::new(name)
        .with_label(HOSTNAME_LABEL, name)
        .with_label("kubernetes.io/role", "worker")
}

fn backend(server: &MockServer, nodes: Vec<Node>) -> InfluxDbBackend {
    let lister = Arc::new(StaticNodeLister::new(nodes));
    let address = server.uri();
    InfluxDbBackend::new("influxdb", &map(&[("address", address.as_str())]), lister).unwrap()
}

fn value_body(value: f64) -> serde_json::Value {
    serde_json::json!({
        "results": [{
            "statement_id": 0,
            "series": [{
                "name": "cpu",
                "columns": ["time", "mean_usage_idle"],
                "values": [["2018-12-25T16:12:06.249608977Z", value]]
            }]
        }]
    })
}

/// Test the CPU query is scoped to the selected hosts
#[tokio::test]
async fn test_cpu_query_for_selected_hosts() {
    let mock_server = MockServer::start().await;

    let expected = "SELECT mean(\"usage_idle\") AS \"mean_usage_idle\" FROM \"telegraf\".\"autogen\".\"cpu\"\n\
                    WHERE time > now() - 5m AND (\"host\"='node-a' OR \"host\"='node-b')";

    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("db", "telegraf"))
        .and(query_param("q", expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(value_body(36.5)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let nodes = vec![
        worker("node-a"),
        worker("node-b"),
        Node::new("master-0").with_label(HOSTNAME_LABEL, "master-0"),
    ];
    let backend = backend(&mock_server, nodes);

    let value = assert_ok!(
        backend
            .get_value(
                "cpu_percent_utilization",
                &HashMap::new(),
                &map(&[("kubernetes.io/role", "worker")]),
            )
            .await
    );
    assert_eq!(value, 36.5);
}

/// Test per-call configuration reaches the memory query
#[tokio::test]
async fn test_memory_query_with_configuration() {
    let mock_server = MockServer::start().await;

    let expected = "SELECT max(\"used_percent\") AS \"max_used_percent\" FROM \"metrics\".\"weekly\".\"mem\"\n\
                    WHERE time > now() - 1h AND (true)";

    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("db", "metrics"))
        .and(query_param("q", expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(value_body(71.25)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend(&mock_server, Vec::new());
    let configuration = map(&[
        ("aggregation", "max"),
        ("range", "1h"),
        ("db", "metrics"),
        ("retentionPolicy", "weekly"),
    ]);

    let value = backend
        .get_value("memory_percent_utilization", &configuration, &HashMap::new())
        .await
        .unwrap();
    assert_eq!(value, 71.25);
}

/// Test a custom template is rendered with the host list
#[tokio::test]
async fn test_custom_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param(
            "q",
            "SELECT last(\"load1\") FROM \"telegraf\".\"autogen\".\"system\" WHERE (\"host\"='node-a')",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(value_body(0.75)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = backend(&mock_server, vec![worker("node-a")]);
    let configuration = map(&[(
        "query",
        "SELECT last(\"load1\") FROM \"{{ db }}\".\"{{ retention_policy }}\".\"system\" WHERE {{ host_list }}",
    )]);

    let value = backend
        .get_value("custom", &configuration, &HashMap::new())
        .await
        .unwrap();
    assert_eq!(value, 0.75);
}

/// Test invalid input never reaches the store
#[tokio::test]
async fn test_invalid_input_sends_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(value_body(1.0)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let backend = backend(&mock_server, Vec::new());

    let err = assert_err!(
        backend
            .get_value("disk_percent_utilization", &HashMap::new(), &HashMap::new())
            .await
    );
    assert!(matches!(err, BackendError::UnknownMetric(_)));

    let err = backend
        .get_value(
            "cpu_percent_utilization",
            &map(&[("aggregation", "average")]),
            &HashMap::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::MetricConfiguration(_)));
    assert_eq!(err.kind(), ErrorKind::Input);

    let err = backend
        .get_value("custom", &HashMap::new(), &HashMap::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);
}

/// Test a rejected query surfaces the store's message
#[tokio::test]
async fn test_store_error_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "error": "database not found: telegraf" })),
        )
        .mount(&mock_server)
        .await;

    let backend = backend(&mock_server, Vec::new());
    let err = backend
        .get_value("cpu_percent_utilization", &HashMap::new(), &HashMap::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Collaborator);
    assert!(err.to_string().contains("database not found"));
}

/// Test an unavailable store is a collaborator failure
#[tokio::test]
async fn test_store_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock_server)
        .await;

    let backend = backend(&mock_server, Vec::new());
    let err = backend
        .get_value("cpu_percent_utilization", &HashMap::new(), &HashMap::new())
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Query { .. }));
    assert_eq!(err.kind(), ErrorKind::Collaborator);
}

/// Test an empty result set is an error, not zero
#[tokio::test]
async fn test_empty_series_is_data_shape_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "results": [{ "statement_id": 0 }] })),
        )
        .mount(&mock_server)
        .await;

    let backend = backend(&mock_server, Vec::new());
    let err = backend
        .get_value("cpu_percent_utilization", &HashMap::new(), &HashMap::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DataShape);
}

/// Test concurrent reads against one backend instance
#[tokio::test]
async fn test_concurrent_reads() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(value_body(12.0)))
        .expect(8)
        .mount(&mock_server)
        .await;

    let backend = Arc::new(backend(&mock_server, vec![worker("node-a")]));
    let aggregations = ["mean", "median", "mode", "max", "min", "sum", "count", "spread"];

    let reads = aggregations.iter().map(|aggregation| {
        let backend = backend.clone();
        let configuration = map(&[("aggregation", *aggregation)]);
        async move {
            backend
                .get_value("cpu_percent_utilization", &configuration, &HashMap::new())
                .await
        }
    });

    for result in join_all(reads).await {
        assert_eq!(result.unwrap(), 12.0);
    }
}
