use std::collections::HashMap;

use parking_lot::Mutex;

use super::{LogSink, SinkError, SinkResult, StoredEvent, StreamDescription, token_for};

type Group = HashMap<String, Vec<StoredEvent>>;

/// In-process sink, used by tests and `analytics.sink = "memory"`
#[derive(Default)]
pub struct MemoryLogSink {
    groups: Mutex<HashMap<String, Group>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored events of a stream, oldest first
    pub fn events(&self, group: &str, stream: &str) -> Vec<StoredEvent> {
        self.groups
            .lock()
            .get(group)
            .and_then(|g| g.get(stream))
            .cloned()
            .unwrap_or_default()
    }

    /// Stream names of a group, sorted
    pub fn streams(&self, group: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .groups
            .lock()
            .get(group)
            .map(|g| g.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

#[async_trait::async_trait]
impl LogSink for MemoryLogSink {
    async fn ensure_group(&self, group: &str) -> SinkResult<()> {
        self.groups.lock().entry(group.to_string()).or_default();
        Ok(())
    }

    async fn create_stream(&self, group: &str, stream: &str) -> SinkResult<()> {
        let mut groups = self.groups.lock();
        let streams = groups
            .get_mut(group)
            .ok_or_else(|| SinkError::GroupNotFound(group.to_string()))?;

        if streams.contains_key(stream) {
            return Err(SinkError::AlreadyExists(stream.to_string()));
        }
        streams.insert(stream.to_string(), Vec::new());
        Ok(())
    }

    async fn describe_stream(
        &self,
        group: &str,
        stream: &str,
    ) -> SinkResult<Option<StreamDescription>> {
        let groups = self.groups.lock();
        let streams = groups
            .get(group)
            .ok_or_else(|| SinkError::GroupNotFound(group.to_string()))?;

        Ok(streams.get(stream).map(|events| StreamDescription {
            name: stream.to_string(),
            upload_sequence_token: token_for(events.len()),
            stored_events: events.len(),
        }))
    }

    async fn put_event(
        &self,
        group: &str,
        stream: &str,
        message: &str,
        timestamp_ms: i64,
        sequence_token: Option<&str>,
    ) -> SinkResult<String> {
        let mut groups = self.groups.lock();
        let events = groups
            .get_mut(group)
            .ok_or_else(|| SinkError::GroupNotFound(group.to_string()))?
            .get_mut(stream)
            .ok_or_else(|| SinkError::StreamNotFound(stream.to_string()))?;

        let expected = token_for(events.len());
        if expected.as_deref() != sequence_token {
            return Err(SinkError::InvalidSequenceToken { expected });
        }

        events.push(StoredEvent {
            timestamp: timestamp_ms,
            message: message.to_string(),
        });
        Ok(events.len().to_string())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stream_lifecycle() {
        let sink = MemoryLogSink::new();
        sink.ensure_group("g").await.unwrap();
        sink.ensure_group("g").await.unwrap();

        assert_eq!(sink.describe_stream("g", "s").await.unwrap(), None);
        sink.create_stream("g", "s").await.unwrap();
        assert_eq!(
            sink.create_stream("g", "s").await,
            Err(SinkError::AlreadyExists("s".to_string()))
        );

        let desc = sink.describe_stream("g", "s").await.unwrap().unwrap();
        assert_eq!(desc.upload_sequence_token, None);

        let next = sink.put_event("g", "s", "one", 1, None).await.unwrap();
        assert_eq!(next, "1");
        let next = sink.put_event("g", "s", "two", 2, Some(&next)).await.unwrap();
        assert_eq!(next, "2");

        let messages: Vec<String> = sink.events("g", "s").into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_stale_token_rejected() {
        let sink = MemoryLogSink::new();
        sink.ensure_group("g").await.unwrap();
        sink.create_stream("g", "s").await.unwrap();
        sink.put_event("g", "s", "first", 1, None).await.unwrap();

        let err = sink.put_event("g", "s", "racer", 2, None).await.unwrap_err();
        assert_eq!(
            err,
            SinkError::InvalidSequenceToken {
                expected: Some("1".to_string())
            }
        );
        assert_eq!(sink.events("g", "s").len(), 1);
    }

    #[tokio::test]
    async fn test_missing_group_and_stream() {
        let sink = MemoryLogSink::new();
        assert!(matches!(
            sink.create_stream("nope", "s").await,
            Err(SinkError::GroupNotFound(_))
        ));

        sink.ensure_group("g").await.unwrap();
        assert!(matches!(
            sink.put_event("g", "missing", "x", 0, None).await,
            Err(SinkError::StreamNotFound(_))
        ));
    }
}
