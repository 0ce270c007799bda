// Management API client and falcon sink against a mock HTTP server.

use rmqmon::collectors::{Collector, CollectorSettings, MetricSink, StatsSource};
use rmqmon::errors::{FetchError, PushError};
use rmqmon::falcon::FalconSink;
use rmqmon::management::{ManagementClient, ManagementConfig};
use rmqmon::metric::RecordStamp;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// base64("guest:guest")
const BASIC_AUTH: &str = "Basic Z3Vlc3Q6Z3Vlc3Q=";

fn client(server: &MockServer, node: Option<&str>) -> ManagementClient {
    ManagementClient::new(&ManagementConfig {
        api_url: server.uri(),
        username: "guest".to_string(),
        password: "guest".to_string(),
        node: node.map(str::to_string),
        aliveness_vhost: "/".to_string(),
        timeout: Duration::from_secs(2),
    })
    .unwrap()
}

async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn probe_reports_reachable_api() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/whoami", json!({"name": "guest"})).await;

    assert!(client(&server, None).probe_liveness().await);
}

#[tokio::test]
async fn probe_is_false_when_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/whoami"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    assert!(!client(&server, None).probe_liveness().await);
}

#[tokio::test]
async fn probe_is_false_when_unreachable() {
    let server = MockServer::start().await;
    let mgmt = client(&server, None);
    drop(server);

    assert!(!mgmt.probe_liveness().await);
}

#[tokio::test]
async fn fetches_overview() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/overview",
        json!({
            "object_totals": {"queues": 5, "channels": 2, "connections": 1, "consumers": 1, "exchanges": 8},
            "queue_totals": {"messages": 10, "messages_ready": 7, "messages_unacknowledged": 3},
            "message_stats": {"publish": 40, "publish_details": {"rate": 1.5}},
            "statistics_db_event_queue": 0
        }),
    )
    .await;

    let ov = client(&server, None).fetch_overview().await.unwrap();
    assert_eq!(ov.object_totals.queues, 5);
    assert_eq!(ov.queue_totals.messages_ready, 7);
    assert_eq!(ov.message_stats.publish_details.rate, 1.5);
    assert_eq!(ov.message_stats.deliver_get, 0);
}

#[tokio::test]
async fn fetches_first_node_when_unset() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/nodes",
        json!([
            {"name": "rabbit@a", "fd_used": 10, "fd_total": 100, "partitions": []},
            {"name": "rabbit@b", "fd_used": 20, "fd_total": 100, "partitions": []}
        ]),
    )
    .await;

    let node = client(&server, None).fetch_node().await.unwrap();
    assert_eq!(node.name, "rabbit@a");
    assert_eq!(node.fd_used, 10);
}

#[tokio::test]
async fn fetches_named_node() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/nodes/rabbit@b",
        json!({"name": "rabbit@b", "run_queue": 2, "partitions": ["rabbit@a"]}),
    )
    .await;

    let node = client(&server, Some("rabbit@b")).fetch_node().await.unwrap();
    assert_eq!(node.run_queue, 2);
    assert_eq!(node.partitions, vec!["rabbit@a".to_string()]);
}

#[tokio::test]
async fn empty_node_list_is_an_error() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/nodes", json!([])).await;

    let err = client(&server, None).fetch_node().await.unwrap_err();
    assert!(matches!(err, FetchError::Empty { .. }));
}

#[tokio::test]
async fn fetches_aliveness_for_encoded_vhost() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/aliveness-test/%2F", json!({"status": "ok"})).await;

    let alive = client(&server, None).fetch_alive().await.unwrap();
    assert_eq!(alive.status, "ok");
}

#[tokio::test]
async fn fetches_queues() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/queues",
        json!([
            {"name": "q1", "vhost": "/", "state": "running", "messages": 4,
             "consumer_utilisation": 0.25,
             "message_stats": {"deliver_get_details": {"rate": 2.0}}},
            {"name": "q2", "vhost": "prod", "state": "idle", "consumer_utilisation": null}
        ]),
    )
    .await;

    let queues = client(&server, None).fetch_queues().await.unwrap();
    assert_eq!(queues.len(), 2);
    assert_eq!(queues[0].status, "running");
    assert_eq!(queues[0].consumer_utilisation, 0.25);
    assert_eq!(queues[0].message_stats.deliver_get_details.rate, 2.0);
    assert_eq!(queues[1].vhost, "prod");
    assert_eq!(queues[1].consumer_utilisation, 0.0);
}

#[tokio::test]
async fn server_error_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/queues"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client(&server, None).fetch_queues().await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 503, .. }));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/overview"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client(&server, None).fetch_overview().await.unwrap_err();
    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn falcon_sink_posts_json_array() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/push"))
        .respond_with(ResponseTemplate::new(200).set_body_string("success"))
        .expect(1)
        .mount(&server)
        .await;

    let sink = FalconSink::new(format!("{}/v1/push", server.uri()), Duration::from_secs(2)).unwrap();
    let stamp = RecordStamp::at("mq-01", 60, 1_700_000_000);
    let records = vec![
        stamp.gauge("rabbitmq.overview.isUp", 1_i64, ""),
        stamp.gauge("rabbitmq.queue.consumer_utilisation", 25.0, "name=q1,vhost=/"),
    ];
    sink.send(&records).await.unwrap();

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(
        body,
        json!([
            {"endpoint": "mq-01", "metric": "rabbitmq.overview.isUp", "value": 1,
             "counterType": "GAUGE", "tags": "", "timestamp": 1_700_000_000, "step": 60},
            {"endpoint": "mq-01", "metric": "rabbitmq.queue.consumer_utilisation", "value": 25.0,
             "counterType": "GAUGE", "tags": "name=q1,vhost=/", "timestamp": 1_700_000_000, "step": 60}
        ])
    );
}

#[tokio::test]
async fn falcon_sink_reports_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/push"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sink = FalconSink::new(format!("{}/v1/push", server.uri()), Duration::from_secs(2)).unwrap();
    let stamp = RecordStamp::at("mq-01", 60, 100);
    let err = sink
        .send(&[stamp.gauge("rabbitmq.overview.isUp", 0_i64, "")])
        .await
        .unwrap_err();
    assert!(matches!(err, PushError::Status { status: 500, records: 1, .. }));
}

#[tokio::test]
async fn full_cycle_against_mock_broker() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/whoami", json!({"name": "guest"})).await;
    mount_json(&server, "/api/overview", json!({"object_totals": {"queues": 1}})).await;
    mount_json(
        &server,
        "/api/nodes",
        json!([{"name": "rabbit@a", "mem_used": 50, "mem_limit": 200, "partitions": []}]),
    )
    .await;
    mount_json(&server, "/api/aliveness-test/%2F", json!({"status": "ok"})).await;
    mount_json(
        &server,
        "/api/queues",
        json!([{"name": "q1", "vhost": "/", "state": "running"}]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/v1/push"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sink = FalconSink::new(format!("{}/v1/push", server.uri()), Duration::from_secs(2)).unwrap();
    let collector = Collector::new(
        client(&server, None),
        sink,
        CollectorSettings {
            endpoint: "mq-01".to_string(),
            step: 60,
            healthy_states: vec!["running".to_string()],
            verbose: false,
        },
    );

    let sent = collector.run_cycle().await.unwrap();
    assert_eq!(sent, 25 + 12);

    let pushed = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.url.path() == "/v1/push")
        .unwrap();
    let body: Vec<serde_json::Value> = serde_json::from_slice(&pushed.body).unwrap();
    let value = |metric: &str| {
        body.iter()
            .find(|r| r["metric"] == metric)
            .map(|r| r["value"].clone())
            .unwrap()
    };
    assert_eq!(value("rabbitmq.overview.memUsedPct"), json!(25.0));
    assert_eq!(value("rabbitmq.overview.isAlive"), json!(1));
    assert_eq!(value("rabbitmq.queue.status"), json!(1));
}
