//! Error types surfaced by the result pipeline.
//!
//! Every failure is reported and then returned unchanged to the caller, so the
//! hosting consumer can decide between redelivery and dead-lettering.

use thiserror::Error;

use crate::models::validation::ValidationError;

/// Failure of a single HTTP request made by the notification transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("Request failed with status code {status}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
        retry_after: Option<String>,
    },

    /// No response was received.
    #[error("Network error calling {method} {url}: {source}")]
    Network {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Network { .. } => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            TransportError::Status { body, .. } => Some(body.as_str()),
            TransportError::Network { .. } => None,
        }
    }

    pub fn method(&self) -> &str {
        match self {
            TransportError::Status { method, .. } | TransportError::Network { method, .. } => {
                method
            }
        }
    }

    pub fn url(&self) -> &str {
        match self {
            TransportError::Status { url, .. } | TransportError::Network { url, .. } => url,
        }
    }

    pub fn is_too_many_requests(&self) -> bool {
        self.status() == Some(429)
    }

    /// Network failures, 5xx and 429 responses are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self.status() {
            None => true,
            Some(status) => status == 429 || (500..=599).contains(&status),
        }
    }
}

/// Failure while rendering localized email content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Licence number must be at least 4 characters long, got {0}")]
    LicenceTooShort(usize),

    #[error("Unknown {field} code {code}")]
    UnknownCode { field: &'static str, code: u8 },

    #[error("Invalid date '{value}': {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum ProcessError {
    /// The message does not match the envelope or result body schema.
    #[error("validateMessage: Result record schema validation failed")]
    Validation(Vec<ValidationError>),

    /// Schema-valid message that still could not be decoded into its typed form.
    #[error("Failed to decode result message: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to acquire notification API auth header: {0}")]
    Auth(#[source] anyhow::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Content(#[from] ContentError),
}

impl ProcessError {
    /// Whether redelivering the same message could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ProcessError::Validation(_) | ProcessError::Decode(_))
    }

    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            ProcessError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
