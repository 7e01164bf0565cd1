use std::sync::{Arc, Mutex};

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use result_processor::{
    clients::{
        auth::{AuthHeaderProvider, StaticTokenProvider},
        http::RetryableHttpClient,
        notifications::NotificationsGateway,
    },
    content::ContentResolver,
    models::{notification::DeliveryMode, retry::RetryPolicy},
    processor::{ProcessorSettings, ResultProcessor},
    telemetry::{BusinessEvent, EventSink},
    validation::message::MessageValidator,
};
use serde_json::{Value, json};

pub const TOKEN: &str = "1234-5678";
pub const CONTEXT_ID: &str = "BOOKING-APP";

pub fn result_message() -> Value {
    json!({
        "bookingId": "mockBookingId",
        "email": "email@company.com",
        "licence": "JONES061102W97YT",
        "target": "gb",
        "results": {
            "Candidate": {
                "CandidateID": "4ddab30e-f90e-eb11-a813-000d3a7f128d",
                "Name": "Wendy",
                "Surname": "Jones",
                "DOB": "2002-11-10",
                "Gender": 3,
                "DrivingLicenseNumber": "JONES061102W97YT"
            },
            "Admission": { "DateTime": "2022-09-12T13:30:00.000Z" },
            "Appointment": { "DateTime": "2022-09-12T13:00:00.000Z" },
            "TestCentre": { "TestCentreCode": "7678", "Region": 0 },
            "TestInformation": {
                "StartTime": "2022-09-12T13:50:00.000Z",
                "CertificateExpiryDate": "2023-09-12T13:30:00.000Z",
                "DeliveryMode": 0,
                "TestType": 0,
                "TextLanguage": 0,
                "OverallStatus": 1,
                "CertificationID": "123456781",
                "EndTime": "2022-09-12T15:50:00.000Z"
            }
        },
        "tracing": {
            "AppointmentId": "fake-appointment-id",
            "bookingProductId": "fake-booking-product-id",
            "context_id": "fake-context-id",
            "reference": "fake-reference",
            "trace_id": "fake-trace-id"
        }
    })
}

/// Sets a value inside the message by JSON pointer.
pub fn set(message: &mut Value, pointer: &str, value: Value) {
    *message
        .pointer_mut(pointer)
        .unwrap_or_else(|| panic!("no field at {pointer}")) = value;
}

pub fn remove(message: &mut Value, pointer: &str) {
    let (parent, key) = pointer.rsplit_once('/').expect("pointer has a parent");
    message
        .pointer_mut(parent)
        .and_then(Value::as_object_mut)
        .expect("parent is an object")
        .remove(key);
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(BusinessEvent, String, Value)>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<(BusinessEvent, String, Value)> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<BusinessEvent> {
        self.events().into_iter().map(|(event, _, _)| event).collect()
    }
}

impl EventSink for RecordingSink {
    fn event(&self, event: BusinessEvent, message: &str, properties: Value) {
        self.events
            .lock()
            .unwrap()
            .push((event, message.to_string(), properties));
    }
}

pub struct FailingAuth;

#[async_trait]
impl AuthHeaderProvider for FailingAuth {
    async fn auth_header(&self) -> Result<String, Error> {
        Err(anyhow!("failed to get token"))
    }
}

pub fn fast_retry_policy() -> RetryPolicy {
    RetryPolicy {
        base_delay_ms: 10,
        exponential_backoff: false,
        max_retries: 3,
        max_retry_after_ms: 1000,
    }
}

pub fn gateway(
    base_url: &str,
    auth: Arc<dyn AuthHeaderProvider>,
    events: Arc<RecordingSink>,
) -> NotificationsGateway {
    NotificationsGateway::new(
        auth,
        RetryableHttpClient::new(fast_retry_policy()),
        base_url,
        CONTEXT_ID,
        events,
    )
}

pub fn settings(delivery_mode: DeliveryMode) -> ProcessorSettings {
    ProcessorSettings {
        delivery_mode,
        disable_success_event_logs: false,
    }
}

pub fn processor(
    base_url: &str,
    settings: ProcessorSettings,
    events: Arc<RecordingSink>,
) -> Result<ResultProcessor> {
    let validator = MessageValidator::new(events.clone())?;

    Ok(ResultProcessor::new(
        Arc::new(validator),
        ContentResolver::new(chrono_tz::Europe::London),
        gateway(base_url, Arc::new(StaticTokenProvider::new(TOKEN)), events.clone()),
        events,
        settings,
    ))
}
