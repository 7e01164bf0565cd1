use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::{
    clients::{auth::AuthHeaderProvider, http::RetryableHttpClient},
    error::{ProcessError, TransportError},
    models::notification::{
        Agency, Channel, Delivery, EmailPayload, NotificationPayload, OutboundPayload,
    },
    telemetry::{BusinessEvent, EventSink},
};

const SEND_EMAIL_FAILED: &str =
    "NotificationsGateway::sendEmail: Notification API send email request failed";
const SEND_NOTIFICATION_FAILED: &str =
    "NotificationsGateway::sendNotification: Notification API send email notification request failed";
const TOKEN_CALL_FAILED: &str = "NotificationsGateway::getToken: Token call failed";

/// Telemetry bucket of a failed notification API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    AuthIssue,
    ServerError,
    RequestIssue,
    Unknown,
}

impl FailureCategory {
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(401 | 403) => FailureCategory::AuthIssue,
            Some(500..=599) => FailureCategory::ServerError,
            Some(400..=499) => FailureCategory::RequestIssue,
            _ => FailureCategory::Unknown,
        }
    }

    pub fn event(&self) -> Option<BusinessEvent> {
        match self {
            FailureCategory::AuthIssue => Some(BusinessEvent::NotifAuthIssue),
            FailureCategory::ServerError => Some(BusinessEvent::NotifError),
            FailureCategory::RequestIssue => Some(BusinessEvent::NotifRequestIssue),
            FailureCategory::Unknown => None,
        }
    }
}

/// Client of the downstream notification API.
pub struct NotificationsGateway {
    auth: Arc<dyn AuthHeaderProvider>,
    http_client: RetryableHttpClient,
    base_url: String,
    context_id: String,
    events: Arc<dyn EventSink>,
}

impl NotificationsGateway {
    pub fn new(
        auth: Arc<dyn AuthHeaderProvider>,
        http_client: RetryableHttpClient,
        base_url: impl Into<String>,
        context_id: impl Into<String>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let base_url = base_url.into();

        info!(base_url = %base_url, "Notifications gateway initialized");

        Self {
            auth,
            http_client,
            base_url,
            context_id: context_id.into(),
            events,
        }
    }

    /// Sends one delivery. Failures are classified and reported, then
    /// returned unchanged.
    pub async fn send(&self, delivery: Delivery) -> Result<(), ProcessError> {
        let reference = delivery.reference().map(str::to_owned);
        let payload = self.build_payload(delivery);
        let error_message = match &payload {
            OutboundPayload::Email(_) => SEND_EMAIL_FAILED,
            OutboundPayload::Notification(_) => SEND_NOTIFICATION_FAILED,
        };

        let authorization = self.auth_header().await?;

        if let Err(error) = self.send_request(&payload, &authorization).await {
            self.handle_error(&error, error_message, reference.as_deref());
            return Err(error.into());
        }

        Ok(())
    }

    pub fn build_payload(&self, delivery: Delivery) -> OutboundPayload {
        match delivery {
            Delivery::Email {
                email_address,
                content,
                reference,
                target,
            } => OutboundPayload::Email(EmailPayload {
                email_address,
                message_subject: content.subject,
                message_content: content.body,
                reference,
                target,
                context_id: self.context_id.clone(),
            }),
            Delivery::Notification {
                booking_id,
                booking_product_id,
                target,
                language,
                category,
                email_address,
                reference,
                context_id,
            } => OutboundPayload::Notification(NotificationPayload {
                booking_id,
                booking_product_id,
                channel: Channel::Email,
                agency: Agency::from(target),
                language,
                category,
                email_address,
                reference,
                context_id,
            }),
        }
    }

    async fn auth_header(&self) -> Result<String, ProcessError> {
        match self.auth.auth_header().await {
            Ok(header) => Ok(header),
            Err(e) => {
                self.events.event(
                    BusinessEvent::NotifAuthIssue,
                    TOKEN_CALL_FAILED,
                    json!({ "error": e.to_string() }),
                );
                Err(ProcessError::Auth(e))
            }
        }
    }

    async fn send_request(
        &self,
        payload: &OutboundPayload,
        authorization: &str,
    ) -> Result<(), TransportError> {
        let url = format!("{}{}", self.base_url, payload.endpoint());

        debug!(url = %url, "Sending notification API request");

        let response = self.http_client.post(&url, payload, authorization).await?;

        debug!(url = %url, response = %response, "Notification API request succeeded");

        Ok(())
    }

    fn handle_error(&self, error: &TransportError, error_message: &str, reference: Option<&str>) {
        error!(error = %error, "{}", error_message);

        let status = error.status();
        let properties = json!({
            "reference": reference,
            "error": error.to_string(),
            "status": status,
            "response": error.body(),
        });

        match FailureCategory::from_status(status).event() {
            Some(event) => self.events.event(event, error_message, properties),
            None => warn!(
                error_message,
                properties = %properties,
                "NotificationsGateway::sendEmail: Notification API email send failed"
            ),
        }
    }
}
