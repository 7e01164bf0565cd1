use std::sync::Arc;

use anyhow::{Error, Result};
use serde_json::{Value, json};

use crate::{
    error::ProcessError,
    models::validation::ValidationError,
    telemetry::{BusinessEvent, EventSink},
    validation::schema::SchemaValidator,
};

const RESULT_MESSAGE_SCHEMA: &str = include_str!("../../schemas/result-message.schema.json");
const RESULT_BODY_SCHEMA: &str = include_str!("../../schemas/saras-result-body-v4.schema.json");

const VALIDATION_FAILED: &str = "validateMessage: Result record schema validation failed";

/// Two-stage gate: the message envelope first, then the embedded result body.
pub struct MessageValidator {
    envelope: SchemaValidator,
    result_body: SchemaValidator,
    events: Arc<dyn EventSink>,
}

impl MessageValidator {
    pub fn new(events: Arc<dyn EventSink>) -> Result<Self, Error> {
        Ok(Self::with_schemas(
            SchemaValidator::from_json("result message", RESULT_MESSAGE_SCHEMA)?,
            SchemaValidator::from_json("result body v4", RESULT_BODY_SCHEMA)?,
            events,
        ))
    }

    pub fn with_schemas(
        envelope: SchemaValidator,
        result_body: SchemaValidator,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            envelope,
            result_body,
            events,
        }
    }

    pub fn validate(&self, message: &Value) -> Result<(), ProcessError> {
        if let Some(errors) = self.envelope.validate(message) {
            return Err(self.reject(errors));
        }

        let results = message.get("results").unwrap_or(&Value::Null);
        if let Some(errors) = self.result_body.validate(results) {
            return Err(self.reject(errors));
        }

        Ok(())
    }

    fn reject(&self, errors: Vec<ValidationError>) -> ProcessError {
        self.events.event(
            BusinessEvent::MessageValidationError,
            VALIDATION_FAILED,
            json!({ "validationErrors": errors }),
        );

        ProcessError::Validation(errors)
    }
}
