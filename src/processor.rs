use std::sync::Arc;

use anyhow::{Error, Result};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::{
    clients::{
        auth::{AuthHeaderProvider, GcpTokenProvider, StaticTokenProvider},
        http::RetryableHttpClient,
        notifications::NotificationsGateway,
    },
    config::Config,
    content::ContentResolver,
    error::ProcessError,
    models::{
        identifiers::BusinessIdentifiers,
        message::ResultEvent,
        notification::{Delivery, DeliveryMode, EmailCategory, NotificationLanguage},
    },
    telemetry::{BusinessEvent, EventSink, TracingEventSink},
    validation::message::MessageValidator,
};

#[derive(Debug, Clone, Copy)]
pub struct ProcessorSettings {
    pub delivery_mode: DeliveryMode,
    pub disable_success_event_logs: bool,
}

/// Validates one result message, renders or selects its notification and
/// delivers it. Every failure is reported and returned unchanged.
pub struct ResultProcessor {
    validator: Arc<MessageValidator>,
    content: ContentResolver,
    gateway: NotificationsGateway,
    events: Arc<dyn EventSink>,
    settings: ProcessorSettings,
}

impl ResultProcessor {
    pub fn new(
        validator: Arc<MessageValidator>,
        content: ContentResolver,
        gateway: NotificationsGateway,
        events: Arc<dyn EventSink>,
        settings: ProcessorSettings,
    ) -> Self {
        Self {
            validator,
            content,
            gateway,
            events,
            settings,
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self, Error> {
        let events: Arc<dyn EventSink> = Arc::new(TracingEventSink);

        let auth: Arc<dyn AuthHeaderProvider> = match &config.notification_api_token {
            Some(token) => Arc::new(StaticTokenProvider::new(token.clone())),
            None => Arc::new(GcpTokenProvider::new(config.notification_api_scope.clone()).await?),
        };

        let gateway = NotificationsGateway::new(
            auth,
            RetryableHttpClient::new(config.retry_policy()),
            config.notification_base_url(),
            config.website_site_name.clone(),
            Arc::clone(&events),
        );

        Ok(Self::new(
            Arc::new(MessageValidator::new(Arc::clone(&events))?),
            ContentResolver::new(config.default_time_zone),
            gateway,
            events,
            ProcessorSettings {
                delivery_mode: config.delivery_mode(),
                disable_success_event_logs: config.disable_success_event_logs,
            },
        ))
    }

    /// Processes a raw queue payload.
    pub async fn process_payload(&self, payload: &[u8]) -> Result<(), ProcessError> {
        let message: Value = serde_json::from_slice(payload).inspect_err(|e| {
            error!(error = %e, "Result message is not valid JSON");
        })?;

        self.process(&message).await
    }

    pub async fn process(&self, message: &Value) -> Result<(), ProcessError> {
        let identifiers = BusinessIdentifiers::from_message(message);

        match self.try_process(message, &identifiers).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.events.event(
                    BusinessEvent::MessageProcessingFailed,
                    "processResult:: result processing failed",
                    identifiers.with(json!({})),
                );
                error!(
                    error = %e,
                    trace_id = ?identifiers.trace_id,
                    appointment_id = ?identifiers.appointment_id,
                    reference = ?identifiers.reference,
                    context_id = ?identifiers.context_id,
                    "processResult:: failed to process results"
                );
                Err(e)
            }
        }
    }

    async fn try_process(
        &self,
        message: &Value,
        identifiers: &BusinessIdentifiers,
    ) -> Result<(), ProcessError> {
        let test_end_time = message.pointer("/results/TestInformation/EndTime").cloned();

        if !self.settings.disable_success_event_logs {
            self.events.event(
                BusinessEvent::MessageReceived,
                "processResult:: sending results as email",
                identifiers.with(json!({ "testEndTime": test_end_time })),
            );
        }

        self.validator.validate(message)?;
        let event: ResultEvent = serde_json::from_value(message.clone())?;

        let delivery = match self.settings.delivery_mode {
            DeliveryMode::Notification => notification_delivery(&event, identifiers),
            DeliveryMode::Email => Delivery::Email {
                content: self.content.build_email_content(&event)?,
                email_address: event.email,
                reference: identifiers.trace_id.clone(),
                target: event.target,
            },
        };

        self.gateway.send(delivery).await?;

        if !self.settings.disable_success_event_logs {
            self.events.event(
                BusinessEvent::MessageProcessedSuccessfully,
                "processResult:: result processed successfully",
                identifiers.with(json!({ "testEndTime": test_end_time })),
            );
        }

        info!(trace_id = ?identifiers.trace_id, "Result processed");

        Ok(())
    }
}

fn notification_delivery(event: &ResultEvent, identifiers: &BusinessIdentifiers) -> Delivery {
    let information = &event.results.test_information;

    Delivery::Notification {
        booking_id: event.booking_id.clone(),
        booking_product_id: event.tracing.booking_product_id.clone(),
        target: event.target,
        language: NotificationLanguage::from(information.text_language),
        category: EmailCategory::from(information.overall_status),
        email_address: event.email.clone(),
        reference: identifiers.appointment_id.clone(),
        context_id: identifiers.trace_id.clone(),
    }
}
