use serde::Deserialize;

/// Retry behaviour of the notification transport. Loaded once and shared
/// read-only by every delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RetryPolicy {
    pub base_delay_ms: u64,
    pub exponential_backoff: bool,
    pub max_retries: u32,
    pub max_retry_after_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay_ms: 300,
            exponential_backoff: false,
            max_retries: 3,
            max_retry_after_ms: 1000,
        }
    }
}
