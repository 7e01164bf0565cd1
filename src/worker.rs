use anyhow::{Error, Result};
use chrono::Utc;
use futures_util::StreamExt;
use lapin::message::Delivery;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{
    clients::rbmq::RabbitMqClient, error::ProcessError, models::notification::DlqMessage,
    processor::ResultProcessor,
};

/// What to do with a queue delivery once the processor has finished with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Ack,
    Requeue,
    DeadLetter,
}

impl Disposition {
    /// Non-retryable failures go straight to the failed queue. Anything else
    /// gets one redelivery before it is dead-lettered.
    pub fn for_outcome(outcome: &Result<(), ProcessError>, redelivered: bool) -> Self {
        match outcome {
            Ok(()) => Disposition::Ack,
            Err(e) if !e.is_retryable() || redelivered => Disposition::DeadLetter,
            Err(_) => Disposition::Requeue,
        }
    }
}

pub async fn run(rbmq_client: RabbitMqClient, processor: ResultProcessor) -> Result<(), Error> {
    let mut consumer = rbmq_client.consume_results().await?;

    info!("Result processor worker started");

    while let Some(delivery) = consumer.next().await {
        let delivery = match delivery {
            Ok(delivery) => delivery,
            Err(e) => {
                error!(error = %e, "Failed to receive delivery");
                continue;
            }
        };

        if let Err(e) = handle_delivery(&rbmq_client, &processor, delivery).await {
            error!(error = %e, "Failed to settle delivery");
        }
    }

    warn!("Consumer stream ended");

    Ok(())
}

async fn handle_delivery(
    rbmq_client: &RabbitMqClient,
    processor: &ResultProcessor,
    delivery: Delivery,
) -> Result<(), Error> {
    let outcome = processor.process_payload(&delivery.data).await;

    match Disposition::for_outcome(&outcome, delivery.redelivered) {
        Disposition::Ack => rbmq_client.acknowledge(delivery.delivery_tag).await,
        Disposition::Requeue => {
            warn!(delivery_tag = delivery.delivery_tag, "Requeueing failed result message");
            rbmq_client.requeue(delivery.delivery_tag).await
        }
        Disposition::DeadLetter => {
            let failure_reason = match &outcome {
                Err(e) => e.to_string(),
                Ok(()) => String::new(),
            };

            let dlq_message = DlqMessage {
                original_message: serde_json::from_slice(&delivery.data).unwrap_or_else(|_| {
                    Value::String(String::from_utf8_lossy(&delivery.data).into_owned())
                }),
                failure_reason,
                failed_at: Utc::now().to_rfc3339(),
            };

            rbmq_client
                .dead_letter(delivery.delivery_tag, &dlq_message)
                .await?;
            warn!(delivery_tag = delivery.delivery_tag, "Result message moved to failed queue");
            Ok(())
        }
    }
}
