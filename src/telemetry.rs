use std::fmt::{Display, Formatter, Result};

use serde_json::Value;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Business telemetry markers reported by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusinessEvent {
    /// 401 or 403 from the notification API, or the token call failed.
    NotifAuthIssue,
    /// 5xx from the notification API.
    NotifError,
    /// Any other 4xx from the notification API.
    NotifRequestIssue,
    MessageReceived,
    MessageValidationError,
    MessageProcessedSuccessfully,
    MessageProcessingFailed,
}

impl BusinessEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessEvent::NotifAuthIssue => "DR_NOTIF_AUTH_ISSUE",
            BusinessEvent::NotifError => "DR_NOTIF_ERROR",
            BusinessEvent::NotifRequestIssue => "DR_NOTIF_REQUEST_ISSUE",
            BusinessEvent::MessageReceived => "DR_MESSAGE_RECEIVED",
            BusinessEvent::MessageValidationError => "DR_MESSAGE_VALIDATION_ERROR",
            BusinessEvent::MessageProcessedSuccessfully => "DR_MESSAGE_PROCESSED_SUCCESSFULLY",
            BusinessEvent::MessageProcessingFailed => "DR_MESSAGE_PROCESSING_FAILED",
        }
    }
}

impl Display for BusinessEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.as_str())
    }
}

/// Destination of business telemetry events.
pub trait EventSink: Send + Sync {
    fn event(&self, event: BusinessEvent, message: &str, properties: Value);
}

/// Emits business events as structured log records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn event(&self, event: BusinessEvent, message: &str, properties: Value) {
        info!(
            event = event.as_str(),
            properties = %properties,
            "{}",
            message
        );
    }
}

/// JSON log output filtered by `RUST_LOG`, `info` when unset.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_current_span(false))
        .init();
}
