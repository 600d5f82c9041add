use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{DeckError, Result};

pub const SLIDE_NAVIGATION: &str = "slide_navigation";
pub const USER_INTERACTION: &str = "user_interaction";

/// Keys owned by the envelope; caller fields never replace them
pub const ENVELOPE_KEYS: [&str; 4] = ["eventType", "sessionId", "timestamp", "userAgent"];

/// Event envelope posted to `<api_base>/log`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub event_type: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Caller-supplied fields, flattened into the envelope
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl LogEvent {
    pub fn new(event_type: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            session_id: session_id.into(),
            timestamp: Utc::now(),
            user_agent: None,
            fields: Map::new(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Merge caller fields, dropping any that collide with envelope keys
    pub fn with_fields(mut self, fields: Map<String, Value>) -> Self {
        for (key, value) in fields {
            if ENVELOPE_KEYS.contains(&key.as_str()) {
                continue;
            }
            self.fields.insert(key, value);
        }
        self
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        if !ENVELOPE_KEYS.contains(&key) {
            self.fields.insert(key.to_string(), value.into());
        }
        self
    }
}

/// Check a received body before it is stored.
///
/// The body must be a JSON object carrying a non-empty string `eventType`.
pub fn validate(value: &Value) -> Result<&str> {
    let object = value
        .as_object()
        .ok_or_else(|| DeckError::validation("log event must be a JSON object"))?;

    match object.get("eventType").and_then(Value::as_str) {
        Some(event_type) if !event_type.trim().is_empty() => Ok(event_type),
        _ => Err(DeckError::validation("Missing required fields in log event")),
    }
}
