use serde::Serialize;
use serde_json::Value;

/// Correlation identifiers attached to every log line and telemetry event of
/// one invocation. Read from the raw message so they exist even when the
/// message fails validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BusinessIdentifiers {
    #[serde(rename = "appointmentId", skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,

    #[serde(rename = "candidateId", skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl BusinessIdentifiers {
    pub fn from_message(message: &Value) -> Self {
        let text = |pointer: &str| {
            message
                .pointer(pointer)
                .and_then(Value::as_str)
                .map(str::to_owned)
        };

        Self {
            appointment_id: text("/tracing/AppointmentId"),
            candidate_id: text("/results/Candidate/CandidateID"),
            reference: text("/tracing/reference"),
            context_id: text("/tracing/context_id"),
            trace_id: text("/tracing/trace_id"),
        }
    }

    /// Identifiers merged with extra telemetry properties.
    pub fn with(&self, extra: Value) -> Value {
        let mut properties =
            serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Default::default()));

        if let (Value::Object(base), Value::Object(extra)) = (&mut properties, extra) {
            base.extend(extra);
        }

        properties
    }
}
