//! `/log` 端点集成测试

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use slidedeck::analytics::sink::SinkResult;
use slidedeck::analytics::{EventRecorder, LogSink, MemoryLogSink, SinkError, StreamDescription};
use slidedeck::api::services::log_routes;

const GROUP: &str = "/test/slide-events";

/// Sink whose storage is always unavailable
struct BrokenSink;

#[async_trait]
impl LogSink for BrokenSink {
    async fn ensure_group(&self, _group: &str) -> SinkResult<()> {
        Err(SinkError::Storage("disk on fire".to_string()))
    }

    async fn create_stream(&self, _group: &str, _stream: &str) -> SinkResult<()> {
        Err(SinkError::Storage("disk on fire".to_string()))
    }

    async fn describe_stream(
        &self,
        _group: &str,
        _stream: &str,
    ) -> SinkResult<Option<StreamDescription>> {
        Err(SinkError::Storage("disk on fire".to_string()))
    }

    async fn put_event(
        &self,
        _group: &str,
        _stream: &str,
        _message: &str,
        _timestamp_ms: i64,
        _sequence_token: Option<&str>,
    ) -> SinkResult<String> {
        Err(SinkError::Storage("disk on fire".to_string()))
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

/// Sink that hands out a stale token: another writer always appends first
struct ContendedSink {
    inner: MemoryLogSink,
}

#[async_trait]
impl LogSink for ContendedSink {
    async fn ensure_group(&self, group: &str) -> SinkResult<()> {
        self.inner.ensure_group(group).await
    }

    async fn create_stream(&self, group: &str, stream: &str) -> SinkResult<()> {
        self.inner.create_stream(group, stream).await
    }

    async fn describe_stream(
        &self,
        group: &str,
        stream: &str,
    ) -> SinkResult<Option<StreamDescription>> {
        self.inner.describe_stream(group, stream).await
    }

    async fn put_event(
        &self,
        group: &str,
        stream: &str,
        message: &str,
        timestamp_ms: i64,
        sequence_token: Option<&str>,
    ) -> SinkResult<String> {
        self.inner
            .put_event(group, stream, "{}", timestamp_ms, sequence_token)
            .await?;
        self.inner
            .put_event(group, stream, message, timestamp_ms, sequence_token)
            .await
    }

    fn name(&self) -> &'static str {
        "contended"
    }
}

macro_rules! log_app {
    ($sink:expr) => {{
        let recorder = Arc::new(EventRecorder::new($sink, GROUP, "slide-events-", "test"));
        test::init_service(
            App::new()
                .app_data(web::Data::new(recorder))
                .service(log_routes()),
        )
        .await
    }};
}

fn assert_cors(resp: &actix_web::dev::ServiceResponse) {
    let headers = resp.headers();
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(
        headers.get("access-control-allow-headers").unwrap(),
        "Content-Type"
    );
    assert_eq!(
        headers.get("access-control-allow-methods").unwrap(),
        "POST, OPTIONS"
    );
}

#[actix_rt::test]
async fn test_preflight() {
    let app = log_app!(Arc::new(MemoryLogSink::new()));

    let req = TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/log")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_cors(&resp);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "CORS enabled");
}

#[actix_rt::test]
async fn test_valid_event_is_stored() {
    let sink = Arc::new(MemoryLogSink::new());
    let app = log_app!(sink.clone());

    let req = TestRequest::post()
        .uri("/log")
        .set_json(json!({
            "eventType": "slide_navigation",
            "sessionId": "session_abc",
            "timestamp": "2024-05-01T10:00:00.000Z",
            "fromSlide": "1-intro-welcome",
            "toSlide": "1-intro-agenda",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_cors(&resp);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);

    let streams = sink.streams(GROUP);
    assert!(streams.contains(&"slide-events-init".to_string()));
    let daily = streams
        .iter()
        .find(|s| s.as_str() != "slide-events-init")
        .expect("daily stream");

    let events = sink.events(GROUP, daily);
    assert_eq!(events.len(), 1);
    let stored: Value = serde_json::from_str(&events[0].message).unwrap();
    assert_eq!(stored["toSlide"], "1-intro-agenda");
    assert_eq!(stored["source"], "test");
    assert!(stored["recordedAt"].as_str().unwrap().ends_with('Z'));
}

#[actix_rt::test]
async fn test_sequential_events_share_the_daily_stream() {
    let sink = Arc::new(MemoryLogSink::new());
    let app = log_app!(sink.clone());

    for n in 0..3 {
        let req = TestRequest::post()
            .uri("/log")
            .set_json(json!({ "eventType": "user_interaction", "n": n }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let total: usize = sink
        .streams(GROUP)
        .iter()
        .map(|s| sink.events(GROUP, s).len())
        .sum();
    assert_eq!(total, 3);
}

#[actix_rt::test]
async fn test_invalid_json_is_400() {
    let app = log_app!(Arc::new(MemoryLogSink::new()));

    let req = TestRequest::post()
        .uri("/log")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_cors(&resp);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid JSON in request body");
}

#[actix_rt::test]
async fn test_missing_event_type_is_400() {
    let sink = Arc::new(MemoryLogSink::new());
    let app = log_app!(sink.clone());

    for payload in [json!({ "sessionId": "x" }), json!({ "eventType": "" }), json!([1, 2])] {
        let req = TestRequest::post().uri("/log").set_json(payload).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Missing required fields in log event");
    }
    assert!(sink.streams(GROUP).is_empty());
}

#[actix_rt::test]
async fn test_sink_failure_is_500() {
    let app = log_app!(Arc::new(BrokenSink));

    let req = TestRequest::post()
        .uri("/log")
        .set_json(json!({ "eventType": "slide_navigation" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&resp);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to log event");
    assert!(body["message"].as_str().unwrap().contains("disk on fire"));
}

#[actix_rt::test]
async fn test_stale_sequence_token_is_500() {
    let sink = Arc::new(ContendedSink {
        inner: MemoryLogSink::new(),
    });
    let app = log_app!(sink.clone());

    let req = TestRequest::post()
        .uri("/log")
        .set_json(json!({ "eventType": "slide_navigation", "toSlide": "lost" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&resp);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to log event");
    assert!(body["message"].as_str().unwrap().contains("sequence token"));

    let stored: Vec<String> = sink
        .inner
        .streams(GROUP)
        .iter()
        .flat_map(|s| sink.inner.events(GROUP, s))
        .map(|e| e.message)
        .collect();
    assert_eq!(stored, vec!["{}".to_string()]);
}
