//! Sending side of the event log
//!
//! Events are POSTed as JSON to `<api_base>/log`. Delivery is best effort:
//! [`LogClient::log`] returns immediately and failures only show up in the
//! tracing output.

use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, error, trace, warn};
use ureq::Agent;

use super::event::{LogEvent, SLIDE_NAVIGATION, USER_INTERACTION};
use crate::config::AnalyticsConfig;
use crate::errors::{DeckError, Result};

const SESSION_ID_LEN: usize = 13;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `session_` followed by 13 random base36 characters
pub fn generate_session_id() -> String {
    let suffix: String = (0..SESSION_ID_LEN)
        .map(|_| BASE36[rand::random_range(0..BASE36.len())] as char)
        .collect();
    format!("session_{}", suffix)
}

/// Response of a synchronous delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub status: u16,
    pub body: String,
}

impl DeliveryReport {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Clone)]
pub struct LogClient {
    endpoint: Option<String>,
    session_id: String,
    user_agent: String,
    agent: Agent,
}

impl LogClient {
    /// `api_base` of `None` disables delivery
    pub fn new(api_base: Option<&str>, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            endpoint: api_base.map(|base| format!("{}/log", base.trim_end_matches('/'))),
            session_id: generate_session_id(),
            user_agent: format!("slidedeck/{}", env!("CARGO_PKG_VERSION")),
            agent,
        }
    }

    pub fn from_config(config: &AnalyticsConfig) -> Self {
        Self::new(
            config.endpoint(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Envelope for `event_type` stamped with this client's session
    pub fn event(&self, event_type: &str, fields: Map<String, Value>) -> LogEvent {
        LogEvent::new(event_type, self.session_id.clone())
            .with_user_agent(self.user_agent.clone())
            .with_fields(fields)
    }

    /// Fire-and-forget delivery; a no-op without an endpoint
    pub fn log(&self, event_type: &str, fields: Map<String, Value>) {
        let Some(endpoint) = self.endpoint.clone() else {
            debug!("Event logging disabled (no api_base configured)");
            return;
        };

        let event = self.event(event_type, fields);
        let agent = self.agent.clone();
        let task = move || {
            match post(&agent, &endpoint, &event) {
                Ok(report) if report.is_success() => {
                    trace!("Logged {} event", event.event_type);
                }
                Ok(report) => {
                    error!(
                        "Failed to log {} event: HTTP {} {}",
                        event.event_type, report.status, report.body
                    );
                }
                Err(e) => warn!("Error logging {} event: {}", event.event_type, e),
            }
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(task);
            }
            Err(_) => {
                std::thread::spawn(task);
            }
        }
    }

    pub fn log_slide_navigation(&self, from_slide: &str, to_slide: &str) {
        let mut fields = Map::new();
        fields.insert("fromSlide".to_string(), Value::from(from_slide));
        fields.insert("toSlide".to_string(), Value::from(to_slide));
        self.log(SLIDE_NAVIGATION, fields);
    }

    pub fn log_user_interaction(&self, slide_id: &str, element_id: &str, action: &str) {
        let mut fields = Map::new();
        fields.insert("slideId".to_string(), Value::from(slide_id));
        fields.insert("elementId".to_string(), Value::from(element_id));
        fields.insert("action".to_string(), Value::from(action));
        self.log(USER_INTERACTION, fields);
    }

    /// Blocking delivery that reports the response
    pub fn send(&self, event: &LogEvent) -> Result<DeliveryReport> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| DeckError::config("analytics.api_base is not configured"))?;
        post(&self.agent, endpoint, event)
    }
}

fn post(agent: &Agent, endpoint: &str, event: &LogEvent) -> Result<DeliveryReport> {
    let resp = agent
        .post(endpoint)
        .send_json(event)
        .map_err(|e| DeckError::http_client(format!("POST {}: {}", endpoint, e)))?;

    let status = resp.status().as_u16();
    let body = resp
        .into_body()
        .read_to_string()
        .map_err(|e| DeckError::http_client(format!("reading response from {}: {}", endpoint, e)))?;

    Ok(DeliveryReport { status, body })
}
