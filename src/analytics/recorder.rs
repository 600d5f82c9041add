//! Receiving side of the event log
//!
//! For each accepted event the recorder makes sure today's stream exists,
//! fetches its sequence token and appends the event. Concurrent requests
//! race on the token; the loser's append fails with a stale-token error
//! and the event is dropped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::event::validate;
use super::sink::{LogSink, SinkError};
use crate::config::AnalyticsConfig;
use crate::errors::{DeckError, Result};

pub struct EventRecorder {
    sink: Arc<dyn LogSink>,
    log_group: String,
    stream_prefix: String,
    source: String,
}

impl EventRecorder {
    pub fn new(
        sink: Arc<dyn LogSink>,
        log_group: impl Into<String>,
        stream_prefix: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            sink,
            log_group: log_group.into(),
            stream_prefix: stream_prefix.into(),
            source: source.into(),
        }
    }

    pub fn from_config(sink: Arc<dyn LogSink>, config: &AnalyticsConfig) -> Self {
        info!(
            "Event recorder using {} sink, log group {}",
            sink.name(),
            config.log_group
        );
        Self::new(
            sink,
            config.log_group.clone(),
            config.stream_prefix.clone(),
            config.source.clone(),
        )
    }

    pub fn log_group(&self) -> &str {
        &self.log_group
    }

    /// Daily stream name, `<prefix>YYYY-MM-DD` in UTC
    pub fn stream_name(&self, now: DateTime<Utc>) -> String {
        format!("{}{}", self.stream_prefix, now.format("%Y-%m-%d"))
    }

    /// Validate and store one event body
    pub async fn record(&self, event: Value) -> Result<()> {
        self.record_at(event, Utc::now()).await
    }

    pub async fn record_at(&self, event: Value, now: DateTime<Utc>) -> Result<()> {
        let event_type = validate(&event)?.to_string();

        let stream = self.ensure_stream(now).await?;

        let token = self
            .sink
            .describe_stream(&self.log_group, &stream)
            .await?
            .and_then(|d| d.upload_sequence_token);

        let message = self.stamp(event, now)?;
        self.sink
            .put_event(
                &self.log_group,
                &stream,
                &message,
                now.timestamp_millis(),
                token.as_deref(),
            )
            .await?;

        debug!("Recorded {} event in {}", event_type, stream);
        Ok(())
    }

    /// Create the group, the `init` marker stream and today's stream as needed
    async fn ensure_stream(&self, now: DateTime<Utc>) -> Result<String> {
        self.sink.ensure_group(&self.log_group).await?;

        let init = format!("{}init", self.stream_prefix);
        match self.sink.create_stream(&self.log_group, &init).await {
            Ok(()) | Err(SinkError::AlreadyExists(_)) => {}
            Err(e) => warn!("Unable to create {} stream: {}", init, e),
        }

        let stream = self.stream_name(now);
        if self
            .sink
            .describe_stream(&self.log_group, &stream)
            .await?
            .is_none()
        {
            match self.sink.create_stream(&self.log_group, &stream).await {
                Ok(()) => info!("Created log stream {}", stream),
                Err(SinkError::AlreadyExists(_)) => {
                    debug!("Log stream {} created concurrently", stream)
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(stream)
    }

    /// Message body: the event plus `source` and `recordedAt`
    fn stamp(&self, event: Value, now: DateTime<Utc>) -> Result<String> {
        let Value::Object(mut object) = event else {
            return Err(DeckError::validation("log event must be a JSON object"));
        };
        object.insert("source".to_string(), Value::from(self.source.clone()));
        object.insert(
            "recordedAt".to_string(),
            Value::from(now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
        );
        Ok(serde_json::to_string(&object)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::sink::{MemoryLogSink, SinkResult, StreamDescription};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Another writer creates today's stream between our describe and create
    struct CreateRaceSink {
        inner: MemoryLogSink,
        hide_once: AtomicBool,
    }

    #[async_trait]
    impl LogSink for CreateRaceSink {
        async fn ensure_group(&self, group: &str) -> SinkResult<()> {
            self.inner.ensure_group(group).await
        }

        async fn create_stream(&self, group: &str, stream: &str) -> SinkResult<()> {
            self.inner.create_stream(group, stream).await?;
            if stream.ends_with("init") {
                return Ok(());
            }
            Err(SinkError::AlreadyExists(stream.to_string()))
        }

        async fn describe_stream(
            &self,
            group: &str,
            stream: &str,
        ) -> SinkResult<Option<StreamDescription>> {
            if !stream.ends_with("init") && self.hide_once.swap(false, Ordering::SeqCst) {
                return Ok(None);
            }
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
                .put_event(group, stream, message, timestamp_ms, sequence_token)
                .await
        }

        fn name(&self) -> &'static str {
            "create-race"
        }
    }

    /// Another writer appends between our describe and put
    struct AppendRaceSink {
        inner: MemoryLogSink,
    }

    #[async_trait]
    impl LogSink for AppendRaceSink {
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
                .put_event(group, stream, "{\"eventType\":\"other\"}", timestamp_ms, sequence_token)
                .await?;
            self.inner
                .put_event(group, stream, message, timestamp_ms, sequence_token)
                .await
        }

        fn name(&self) -> &'static str {
            "append-race"
        }
    }

    fn recorder(sink: Arc<MemoryLogSink>) -> EventRecorder {
        EventRecorder::new(sink, "/talks/events", "slide-events-", "test-source")
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 30).unwrap()
    }

    #[test]
    fn test_stream_name_is_utc_date() {
        let recorder = recorder(Arc::new(MemoryLogSink::new()));
        assert_eq!(recorder.stream_name(fixed_now()), "slide-events-2024-05-01");
    }

    #[tokio::test]
    async fn test_record_creates_streams_and_appends() {
        let sink = Arc::new(MemoryLogSink::new());
        let recorder = recorder(sink.clone());

        recorder
            .record_at(json!({"eventType": "slide_navigation", "toSlide": "b"}), fixed_now())
            .await
            .unwrap();
        recorder
            .record_at(json!({"eventType": "user_interaction"}), fixed_now())
            .await
            .unwrap();

        assert_eq!(
            sink.streams("/talks/events"),
            vec!["slide-events-2024-05-01", "slide-events-init"]
        );

        let events = sink.events("/talks/events", "slide-events-2024-05-01");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].timestamp, fixed_now().timestamp_millis());

        let stored: Value = serde_json::from_str(&events[0].message).unwrap();
        assert_eq!(stored["eventType"], "slide_navigation");
        assert_eq!(stored["toSlide"], "b");
        assert_eq!(stored["source"], "test-source");
        assert_eq!(stored["recordedAt"], "2024-05-01T23:59:30.000Z");
    }

    #[tokio::test]
    async fn test_invalid_event_not_stored() {
        let sink = Arc::new(MemoryLogSink::new());
        let recorder = recorder(sink.clone());

        let err = recorder.record(json!({"sessionId": "s"})).await.unwrap_err();
        assert_eq!(err.code(), "E006");
        assert!(sink.streams("/talks/events").is_empty());
    }

    #[tokio::test]
    async fn test_stream_created_concurrently_still_records() {
        let sink = Arc::new(CreateRaceSink {
            inner: MemoryLogSink::new(),
            hide_once: AtomicBool::new(true),
        });
        let recorder = EventRecorder::new(sink.clone(), "/talks/events", "slide-events-", "test");

        recorder
            .record_at(json!({"eventType": "slide_navigation"}), fixed_now())
            .await
            .unwrap();

        let events = sink.inner.events("/talks/events", "slide-events-2024-05-01");
        assert_eq!(events.len(), 1);
        assert!(events[0].message.contains("slide_navigation"));
    }

    #[tokio::test]
    async fn test_stale_token_drops_event() {
        let sink = Arc::new(AppendRaceSink {
            inner: MemoryLogSink::new(),
        });
        let recorder = EventRecorder::new(sink.clone(), "/talks/events", "slide-events-", "test");

        let err = recorder
            .record_at(json!({"eventType": "slide_navigation"}), fixed_now())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E009");
        assert!(err.to_string().contains("invalid sequence token"));

        let events = sink.inner.events("/talks/events", "slide-events-2024-05-01");
        assert_eq!(events.len(), 1);
        assert!(events[0].message.contains("other"));
    }

    #[tokio::test]
    async fn test_new_day_new_stream() {
        let sink = Arc::new(MemoryLogSink::new());
        let recorder = recorder(sink.clone());
        let next_day = fixed_now() + chrono::Duration::minutes(1);

        recorder
            .record_at(json!({"eventType": "a"}), fixed_now())
            .await
            .unwrap();
        recorder
            .record_at(json!({"eventType": "b"}), next_day)
            .await
            .unwrap();

        assert_eq!(sink.events("/talks/events", "slide-events-2024-05-01").len(), 1);
        assert_eq!(sink.events("/talks/events", "slide-events-2024-05-02").len(), 1);
    }
}
