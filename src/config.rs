use anyhow::{Error, Result, anyhow};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::Deserialize;

use crate::{
    clients::rbmq::QueueSettings,
    models::{notification::DeliveryMode, retry::RetryPolicy},
};

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub notification_api_base_url: String,
    pub notification_api_scope: String,

    #[serde(default)]
    pub notification_api_token: Option<String>,

    #[serde(
        default = "default_retry_delay_ms",
        alias = "notification_retry_client_default_delay"
    )]
    pub notification_retry_default_delay_ms: u64,
    #[serde(default, alias = "notification_retry_client_exponetial_backoff")]
    pub notification_retry_exponential_backoff: bool,
    #[serde(
        default = "default_max_retries",
        alias = "notification_retry_client_max_retries"
    )]
    pub notification_retry_max_retries: u32,
    #[serde(
        default = "default_max_retry_after_ms",
        alias = "notification_retry_client_max_retry_after"
    )]
    pub notification_retry_max_retry_after_ms: u64,

    #[serde(default)]
    pub enable_send_notification_endpoint: bool,
    #[serde(default)]
    pub disable_success_event_logs: bool,

    #[serde(rename = "tz", default = "default_time_zone")]
    pub default_time_zone: Tz,
    #[serde(default = "default_site_name")]
    pub website_site_name: String,

    pub rabbitmq_url: String,
    pub result_queue_name: String,
    pub failed_queue_name: String,
    #[serde(default = "default_prefetch_count")]
    pub prefetch_count: u16,
    #[serde(default = "default_consumer_tag")]
    pub consumer_tag: String,
}

fn default_retry_delay_ms() -> u64 {
    300
}

fn default_max_retries() -> u32 {
    3
}

fn default_max_retry_after_ms() -> u64 {
    1000
}

fn default_time_zone() -> Tz {
    chrono_tz::Europe::London
}

fn default_site_name() -> String {
    "ftts-dr-processor".to_string()
}

fn default_prefetch_count() -> u16 {
    10
}

fn default_consumer_tag() -> String {
    "result_processor".to_string()
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Builds the configuration from explicit `(NAME, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Self>(vars)
            .map_err(|e| anyhow!("Invalid or missing environmental variable: {}", e))?;
        Ok(config)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            base_delay_ms: self.notification_retry_default_delay_ms,
            exponential_backoff: self.notification_retry_exponential_backoff,
            max_retries: self.notification_retry_max_retries,
            max_retry_after_ms: self.notification_retry_max_retry_after_ms,
        }
    }

    pub fn queue_settings(&self) -> QueueSettings {
        QueueSettings {
            url: self.rabbitmq_url.clone(),
            result_queue: self.result_queue_name.clone(),
            failed_queue: self.failed_queue_name.clone(),
            prefetch_count: self.prefetch_count,
            consumer_tag: self.consumer_tag.clone(),
        }
    }

    pub fn delivery_mode(&self) -> DeliveryMode {
        DeliveryMode::from_flag(self.enable_send_notification_endpoint)
    }

    /// The base URL with a trailing slash, so endpoint names can be appended.
    pub fn notification_base_url(&self) -> String {
        if self.notification_api_base_url.ends_with('/') {
            self.notification_api_base_url.clone()
        } else {
            format!("{}/", self.notification_api_base_url)
        }
    }
}
