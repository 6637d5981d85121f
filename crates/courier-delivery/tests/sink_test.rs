//! End-to-end tests for the HTTP delivery sink.
//!
//! Drives `process()` against a wiremock endpoint and an in-memory
//! transactional queue, asserting the full decision table: which statuses
//! consume the event, which roll it back for redelivery, and which paths
//! never touch the wire.

use std::{sync::Arc, time::Duration};

use wiremock::{
    matchers::{body_bytes, header, method},
    Mock, MockServer, ResponseTemplate,
};

use courier_core::Event;
use courier_delivery::{DeliveryConfig, DeliveryOutcome, HttpSink};
use test_harness::InMemoryQueue;

fn sink_for(queue: &Arc<InMemoryQueue>, endpoint: String) -> HttpSink {
    HttpSink::new(Arc::clone(queue) as Arc<dyn courier_core::EventQueue>, DeliveryConfig::new(endpoint))
        .expect("sink should construct")
}

async fn queue_with_event(body: &str) -> Arc<InMemoryQueue> {
    let queue = Arc::new(InMemoryQueue::new());
    queue.push(Event::new(body.as_bytes().to_vec())).await;
    queue
}

#[tokio::test]
async fn status_200_commits_and_reports_ready() {
    test_harness::init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let queue = queue_with_event("event payload").await;
    let sink = sink_for(&queue, server.uri());

    let outcome = sink.process().await.expect("process should not fail");

    assert_eq!(outcome, DeliveryOutcome::Ready);
    assert!(queue.is_empty().await, "200 must consume the event");
}

#[tokio::test]
async fn status_503_rolls_back_and_redelivers() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(503)).mount(&server).await;

    let queue = queue_with_event("retry me").await;
    let sink = sink_for(&queue, server.uri());

    let outcome = sink.process().await.expect("process should not fail");

    assert_eq!(outcome, DeliveryOutcome::Backoff);
    assert_eq!(queue.len().await, 1, "503 must leave the event for redelivery");

    // Once the receiver recovers, the same event goes through.
    server.reset().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).mount(&server).await;

    let outcome = sink.process().await.expect("process should not fail");

    assert_eq!(outcome, DeliveryOutcome::Ready);
    assert!(queue.is_empty().await);
}

#[tokio::test]
async fn status_404_consumes_event_as_undeliverable() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(404)).mount(&server).await;

    let queue = queue_with_event("poison").await;
    let sink = sink_for(&queue, server.uri());

    let outcome = sink.process().await.expect("process should not fail");

    assert_eq!(outcome, DeliveryOutcome::Ready);
    assert!(queue.is_empty().await, "4xx must drop the event rather than retry forever");
}

#[tokio::test]
async fn status_400_consumes_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(400)).mount(&server).await;

    let queue = queue_with_event("bad payload").await;
    let sink = sink_for(&queue, server.uri());

    assert_eq!(sink.process().await.unwrap(), DeliveryOutcome::Ready);
    assert!(queue.is_empty().await);
}

#[tokio::test]
async fn unexpected_5xx_consumes_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(500)).mount(&server).await;

    let queue = queue_with_event("unlucky").await;
    let sink = sink_for(&queue, server.uri());

    assert_eq!(sink.process().await.unwrap(), DeliveryOutcome::Ready);
    assert!(queue.is_empty().await, "unclassified statuses are consumed, not retried");
}

#[tokio::test]
async fn redirect_is_not_followed_and_consumes_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "http://example.invalid/"))
        .expect(1)
        .mount(&server)
        .await;

    let queue = queue_with_event("redirected").await;
    let sink = sink_for(&queue, server.uri());

    assert_eq!(sink.process().await.unwrap(), DeliveryOutcome::Ready);
    assert!(queue.is_empty().await);
}

#[tokio::test]
async fn empty_queue_backs_off_without_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let queue = Arc::new(InMemoryQueue::new());
    let sink = sink_for(&queue, server.uri());

    let outcome = sink.process().await.expect("process should not fail");

    assert_eq!(outcome, DeliveryOutcome::Backoff);
}

#[tokio::test]
async fn empty_body_event_is_committed_without_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let queue = queue_with_event("").await;
    let sink = sink_for(&queue, server.uri());

    let outcome = sink.process().await.expect("process should not fail");

    assert_eq!(outcome, DeliveryOutcome::Backoff);
    assert!(queue.is_empty().await, "empty events are consumed by the no-op commit");
}

#[tokio::test]
async fn transport_failure_rolls_back_for_redelivery() {
    // Nothing listens on port 1; the connection attempt is refused.
    let queue = queue_with_event("unreachable").await;
    let sink = sink_for(&queue, "http://127.0.0.1:1/events".to_string());

    let outcome = sink.process().await.expect("process should not fail");

    assert_eq!(outcome, DeliveryOutcome::Backoff);
    assert_eq!(queue.len().await, 1, "transport failures must not consume the event");
}

#[tokio::test]
async fn request_timeout_rolls_back_for_redelivery() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let queue = queue_with_event("slow receiver").await;
    let mut config = DeliveryConfig::new(server.uri());
    config.request_timeout_ms = 50;
    let sink = HttpSink::new(Arc::clone(&queue) as Arc<dyn courier_core::EventQueue>, config)
        .expect("sink should construct");

    let outcome = sink.process().await.expect("process should not fail");

    assert_eq!(outcome, DeliveryOutcome::Backoff);
    assert_eq!(queue.len().await, 1);
}

#[tokio::test]
async fn configured_headers_and_raw_body_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("Content-Type", "application/json"))
        .and(header("Accept", "application/json"))
        .and(body_bytes(r#"{"k":"v"}"#.as_bytes().to_vec()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let queue = queue_with_event(r#"{"k":"v"}"#).await;
    let mut config = DeliveryConfig::new(server.uri());
    config.content_type = "application/json".to_string();
    config.accept = "application/json".to_string();
    let sink = HttpSink::new(Arc::clone(&queue) as Arc<dyn courier_core::EventQueue>, config)
        .expect("sink should construct");

    assert_eq!(sink.process().await.unwrap(), DeliveryOutcome::Ready);
    assert!(queue.is_empty().await);
}

#[tokio::test]
async fn default_headers_are_text_plain() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("Content-Type", "text/plain"))
        .and(header("Accept", "text/plain"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let queue = queue_with_event("plain payload").await;
    let sink = sink_for(&queue, server.uri());

    assert_eq!(sink.process().await.unwrap(), DeliveryOutcome::Ready);
}

#[tokio::test]
async fn each_invocation_delivers_at_most_one_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let queue = Arc::new(InMemoryQueue::new());
    queue.push(Event::new("first")).await;
    queue.push(Event::new("second")).await;
    let sink = sink_for(&queue, server.uri());

    assert_eq!(sink.process().await.unwrap(), DeliveryOutcome::Ready);
    assert_eq!(queue.len().await, 1);

    assert_eq!(sink.process().await.unwrap(), DeliveryOutcome::Ready);
    assert!(queue.is_empty().await);
}
