use chrono::{DateTime, Utc};
use tracing::warn;

use crate::{error::TransportError, models::retry::RetryPolicy};

/// Parses a `Retry-After` header value into milliseconds.
///
/// The header is either a non-negative number of seconds (fractions allowed)
/// or an HTTP date. Dates in the past, and anything else, yield `None`.
pub fn parse_retry_after(header: &str, now: DateTime<Utc>) -> Option<u64> {
    let header = header.trim();

    if let Ok(seconds) = header.parse::<f64>() {
        if seconds.is_finite() && seconds >= 0.0 {
            return Some((seconds * 1000.0).round() as u64);
        }
        return None;
    }

    let date = DateTime::parse_from_rfc2822(header).ok()?;
    let remaining = date.with_timezone(&Utc) - now;

    u64::try_from(remaining.num_milliseconds()).ok()
}

/// Delay in milliseconds before retry number `retry_count` (1-indexed), or
/// `None` when a 429 asks for a longer wait than the policy allows and the
/// request must not be retried.
pub fn calculate_retry_delay(
    retry_count: u32,
    error: &TransportError,
    policy: &RetryPolicy,
    now: DateTime<Utc>,
) -> Option<u64> {
    let mut delay = if policy.exponential_backoff {
        policy.base_delay_ms.saturating_mul(u64::from(retry_count))
    } else {
        policy.base_delay_ms
    };

    if let TransportError::Status {
        status: 429,
        retry_after: Some(header),
        ..
    } = error
    {
        delay = parse_retry_after(header, now).unwrap_or(policy.base_delay_ms);

        if delay > policy.max_retry_after_ms {
            warn!(
                method = error.method(),
                url = error.url(),
                retry_after = %header,
                retry_delay_ms = delay,
                max_retry_after_ms = policy.max_retry_after_ms,
                "Retry-After exceeds the maximum allowed wait, giving up"
            );
            return None;
        }
    }

    warn!(
        error = %error,
        status = ?error.status(),
        url = error.url(),
        retry_delay_ms = delay,
        "Retrying failed {} request to {} - attempt {} of {}",
        error.method(),
        error.url(),
        retry_count,
        policy.max_retries
    );

    Some(delay)
}
