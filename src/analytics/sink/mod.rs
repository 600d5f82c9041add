//! Log sink abstraction
//!
//! Modeled on a managed log service: a sink holds groups, a group holds
//! named streams, and appending to a stream requires the stream's current
//! upload sequence token. A stale token is rejected, which is how concurrent
//! writers racing on one stream find out they lost.

mod file;
mod memory;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

pub use file::FileLogSink;
pub use memory::MemoryLogSink;

use crate::config::AnalyticsConfig;
use crate::errors::{DeckError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    GroupNotFound(String),
    StreamNotFound(String),
    AlreadyExists(String),
    InvalidSequenceToken { expected: Option<String> },
    Storage(String),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::GroupNotFound(name) => write!(f, "log group not found: {}", name),
            SinkError::StreamNotFound(name) => write!(f, "log stream not found: {}", name),
            SinkError::AlreadyExists(name) => write!(f, "resource already exists: {}", name),
            SinkError::InvalidSequenceToken { expected } => write!(
                f,
                "invalid sequence token, expected {}",
                expected.as_deref().unwrap_or("none")
            ),
            SinkError::Storage(msg) => write!(f, "sink storage error: {}", msg),
        }
    }
}

impl std::error::Error for SinkError {}

impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        SinkError::Storage(err.to_string())
    }
}

impl From<SinkError> for DeckError {
    fn from(err: SinkError) -> Self {
        DeckError::log_sink(err.to_string())
    }
}

pub type SinkResult<T> = std::result::Result<T, SinkError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamDescription {
    pub name: String,
    /// Token the next append must present, `None` for an empty stream
    pub upload_sequence_token: Option<String>,
    pub stored_events: usize,
}

/// One stored log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEvent {
    pub timestamp: i64,
    pub message: String,
}

/// Token that follows a stream holding `count` events
pub(crate) fn token_for(count: usize) -> Option<String> {
    (count > 0).then(|| count.to_string())
}

#[async_trait::async_trait]
pub trait LogSink: Send + Sync {
    /// Create `group` unless it already exists
    async fn ensure_group(&self, group: &str) -> SinkResult<()>;

    /// Create a stream; `AlreadyExists` when it is present
    async fn create_stream(&self, group: &str, stream: &str) -> SinkResult<()>;

    async fn describe_stream(
        &self,
        group: &str,
        stream: &str,
    ) -> SinkResult<Option<StreamDescription>>;

    /// Append one event and return the next sequence token
    async fn put_event(
        &self,
        group: &str,
        stream: &str,
        message: &str,
        timestamp_ms: i64,
        sequence_token: Option<&str>,
    ) -> SinkResult<String>;

    fn name(&self) -> &'static str;
}

/// Build the sink selected by `analytics.sink`
pub fn create_sink(config: &AnalyticsConfig) -> Result<Arc<dyn LogSink>> {
    match config.sink.trim().to_ascii_lowercase().as_str() {
        "file" => Ok(Arc::new(FileLogSink::new(&config.sink_directory))),
        "memory" => Ok(Arc::new(MemoryLogSink::new())),
        other => Err(DeckError::config(format!(
            "unknown analytics.sink \"{}\" (expected \"file\" or \"memory\")",
            other
        ))),
    }
}
