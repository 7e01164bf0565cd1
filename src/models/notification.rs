use serde::{Deserialize, Serialize};

use crate::models::{
    content::EmailContent,
    message::{OverallStatus, Region, TextLanguage},
};

pub const EMAIL_ENDPOINT: &str = "email";
pub const NOTIFICATION_ENDPOINT: &str = "send-notification";

/// Which notification API endpoint results are delivered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    Email,
    Notification,
}

impl DeliveryMode {
    pub fn from_flag(use_send_notification_endpoint: bool) -> Self {
        if use_send_notification_endpoint {
            DeliveryMode::Notification
        } else {
            DeliveryMode::Email
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Agency {
    #[serde(rename = "DVSA")]
    Dvsa,
    #[serde(rename = "DVA")]
    Dva,
}

impl From<Region> for Agency {
    fn from(region: Region) -> Self {
        match region {
            Region::Gb => Agency::Dvsa,
            Region::Ni => Agency::Dva,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmailCategory {
    #[serde(rename = "digital-results-pass")]
    DigitalResultsPass,
    #[serde(rename = "digital-results-fail")]
    DigitalResultsFail,
}

impl From<OverallStatus> for EmailCategory {
    fn from(status: OverallStatus) -> Self {
        match status {
            OverallStatus::Pass => EmailCategory::DigitalResultsPass,
            OverallStatus::Fail => EmailCategory::DigitalResultsFail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationLanguage {
    English,
    Welsh,
}

impl From<TextLanguage> for NotificationLanguage {
    fn from(language: TextLanguage) -> Self {
        match language {
            TextLanguage::English => NotificationLanguage::English,
            TextLanguage::Welsh => NotificationLanguage::Welsh,
        }
    }
}

/// A delivery request chosen by the processor. The gateway turns it into the
/// wire payload for the matching endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Email {
        email_address: String,
        content: EmailContent,
        reference: Option<String>,
        target: Region,
    },
    Notification {
        booking_id: String,
        booking_product_id: String,
        target: Region,
        language: NotificationLanguage,
        category: EmailCategory,
        email_address: String,
        reference: Option<String>,
        context_id: Option<String>,
    },
}

impl Delivery {
    pub fn reference(&self) -> Option<&str> {
        match self {
            Delivery::Email { reference, .. } | Delivery::Notification { reference, .. } => {
                reference.as_deref()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailPayload {
    pub email_address: String,
    pub message_subject: String,
    pub message_content: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    pub target: Region,
    pub context_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub booking_id: String,
    pub booking_product_id: String,
    pub channel: Channel,
    pub agency: Agency,
    pub language: NotificationLanguage,
    pub category: EmailCategory,

    #[serde(rename = "email_address")]
    pub email_address: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(rename = "context_id", skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundPayload {
    Email(EmailPayload),
    Notification(NotificationPayload),
}

impl OutboundPayload {
    pub fn endpoint(&self) -> &'static str {
        match self {
            OutboundPayload::Email(_) => EMAIL_ENDPOINT,
            OutboundPayload::Notification(_) => NOTIFICATION_ENDPOINT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DlqMessage {
    pub original_message: serde_json::Value,
    pub failure_reason: String,
    pub failed_at: String,
}
