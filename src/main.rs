use anyhow::{Error, Result};
use result_processor::{
    clients::rbmq::RabbitMqClient, config::Config, processor::ResultProcessor, telemetry, worker,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::load()?;
    telemetry::init_tracing();

    let processor = ResultProcessor::from_config(&config).await?;
    let rbmq_client = RabbitMqClient::connect(config.queue_settings()).await?;

    info!(
        delivery_mode = ?config.delivery_mode(),
        time_zone = %config.default_time_zone,
        "Configuration validated. Worker is ready to start."
    );

    worker::run(rbmq_client, processor).await
}
