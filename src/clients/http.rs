use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, Response, header::RETRY_AFTER};
use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{error::TransportError, models::retry::RetryPolicy, utils::calculate_retry_delay};

/// HTTP transport that retries network failures, 5xx and 429 responses
/// according to a [`RetryPolicy`]. Attempts are strictly sequential.
#[derive(Debug, Clone)]
pub struct RetryableHttpClient {
    http_client: Client,
    retry_policy: RetryPolicy,
}

impl RetryableHttpClient {
    pub fn new(retry_policy: RetryPolicy) -> Self {
        Self::with_client(Client::new(), retry_policy)
    }

    pub fn with_client(http_client: Client, retry_policy: RetryPolicy) -> Self {
        Self {
            http_client,
            retry_policy,
        }
    }

    /// POSTs `payload` as JSON, returning the successful response body.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &T,
        authorization: &str,
    ) -> Result<String, TransportError> {
        let mut retry_count = 0;

        loop {
            let error = match self.post_once(url, payload, authorization).await {
                Ok(body) => {
                    if retry_count > 0 {
                        info!(
                            url,
                            retries = retry_count,
                            max_retries = self.retry_policy.max_retries,
                            "Retry succeeded"
                        );
                    }
                    return Ok(body);
                }
                Err(error) => error,
            };

            if !error.is_retryable() {
                debug!(url, status = ?error.status(), "Request failed with non-retryable error");
                return Err(error);
            }

            if retry_count >= self.retry_policy.max_retries {
                warn!(
                    url,
                    max_retries = self.retry_policy.max_retries,
                    error = %error,
                    "Retry failed after exhausting all attempts"
                );
                return Err(error);
            }

            retry_count += 1;

            let Some(delay_ms) =
                calculate_retry_delay(retry_count, &error, &self.retry_policy, Utc::now())
            else {
                return Err(error);
            };

            sleep(Duration::from_millis(delay_ms)).await;
        }
    }

    async fn post_once<T: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &T,
        authorization: &str,
    ) -> Result<String, TransportError> {
        let response = self
            .http_client
            .post(url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .json(payload)
            .send()
            .await
            .map_err(|source| TransportError::Network {
                method: "POST".to_string(),
                url: url.to_string(),
                source,
            })?;

        Self::read_response(url, response).await
    }

    async fn read_response(url: &str, response: Response) -> Result<String, TransportError> {
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                // The status already decides the outcome; only the body text is lost.
                warn!(url, status = status.as_u16(), error = %e, "Failed to read response body");
                String::new()
            }
        };

        if status.is_success() {
            Ok(body)
        } else {
            Err(TransportError::Status {
                method: "POST".to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body,
                retry_after,
            })
        }
    }
}
