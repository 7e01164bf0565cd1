use anyhow::{Error, Result, anyhow};
use lapin::{
    BasicProperties, Channel, Connection, ConnectionProperties, Consumer,
    options::{
        BasicAckOptions, BasicConsumeOptions, BasicPublishOptions, BasicQosOptions,
        BasicRejectOptions, QueueDeclareOptions,
    },
    types::{AMQPValue, FieldTable, LongString, ShortString},
};
use tracing::{info, warn};

use crate::models::notification::DlqMessage;

const PERSISTENT: u8 = 2;

/// Where result messages are consumed from and where failures are parked.
#[derive(Debug, Clone)]
pub struct QueueSettings {
    pub url: String,
    pub result_queue: String,
    pub failed_queue: String,
    pub prefetch_count: u16,
    pub consumer_tag: String,
}

pub struct RabbitMqClient {
    channel: Channel,
    settings: QueueSettings,
}

impl RabbitMqClient {
    pub async fn connect(settings: QueueSettings) -> Result<Self, Error> {
        info!(result_queue = %settings.result_queue, "Connecting to RabbitMQ");

        let connection = Connection::connect(&settings.url, ConnectionProperties::default())
            .await
            .map_err(|e| anyhow!("Failed to connect to RabbitMQ: {}", e))?;

        let channel = connection
            .create_channel()
            .await
            .map_err(|e| anyhow!("RabbitMQ channel creation failed: {}", e))?;

        // One unsettled result per prefetch slot; each is settled only after delivery.
        channel
            .basic_qos(settings.prefetch_count, BasicQosOptions::default())
            .await
            .map_err(|e| anyhow!("Failed to set up QoS: {}", e))?;

        let client = Self { channel, settings };
        let pending = client.declare(&client.settings.result_queue).await?;
        let parked = client.declare(&client.settings.failed_queue).await?;

        info!(
            pending_results = pending,
            failed_results = parked,
            prefetch_count = client.settings.prefetch_count,
            "Result queues ready"
        );

        if parked > 0 {
            warn!(
                failed_queue = %client.settings.failed_queue,
                failed_results = parked,
                "Failed queue holds results awaiting manual replay"
            );
        }

        Ok(client)
    }

    /// Declares a durable queue and returns how many messages it holds.
    async fn declare(&self, queue: &str) -> Result<u32, Error> {
        let declared = self
            .channel
            .queue_declare(
                queue,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| anyhow!("Failed to declare queue {}: {}", queue, e))?;

        Ok(declared.message_count())
    }

    pub async fn consume_results(&self) -> Result<Consumer, Error> {
        let consumer = self
            .channel
            .basic_consume(
                &self.settings.result_queue,
                &self.settings.consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await
            .map_err(|e| anyhow!("Failed to consume {}: {}", self.settings.result_queue, e))?;

        info!(
            queue = %self.settings.result_queue,
            consumer_tag = %self.settings.consumer_tag,
            "Consuming result messages"
        );

        Ok(consumer)
    }

    pub async fn acknowledge(&self, delivery_tag: u64) -> Result<(), Error> {
        self.channel
            .basic_ack(delivery_tag, BasicAckOptions::default())
            .await
            .map_err(|e| anyhow!("Failed to acknowledge result {}: {}", delivery_tag, e))?;

        Ok(())
    }

    /// Returns the result to the queue for one more attempt.
    pub async fn requeue(&self, delivery_tag: u64) -> Result<(), Error> {
        self.channel
            .basic_reject(delivery_tag, BasicRejectOptions { requeue: true })
            .await
            .map_err(|e| anyhow!("Failed to requeue result {}: {}", delivery_tag, e))?;

        Ok(())
    }

    /// Parks the result on the failed queue, then settles the original
    /// delivery. The original stays unsettled if the publish fails.
    pub async fn dead_letter(&self, delivery_tag: u64, message: &DlqMessage) -> Result<(), Error> {
        let payload = serde_json::to_vec(message)?;

        let mut headers = FieldTable::default();
        headers.insert(
            ShortString::from("x-failure-reason"),
            AMQPValue::LongString(LongString::from(message.failure_reason.as_str())),
        );
        headers.insert(
            ShortString::from("x-failed-at"),
            AMQPValue::LongString(LongString::from(message.failed_at.as_str())),
        );

        self.channel
            .basic_publish(
                "",
                &self.settings.failed_queue,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default()
                    .with_delivery_mode(PERSISTENT)
                    .with_content_type(ShortString::from("application/json"))
                    .with_headers(headers),
            )
            .await
            .map_err(|e| anyhow!("Failed to publish result to {}: {}", self.settings.failed_queue, e))?;

        self.acknowledge(delivery_tag).await
    }
}
