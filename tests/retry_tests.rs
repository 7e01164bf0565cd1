use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use result_processor::{
    clients::http::RetryableHttpClient,
    error::TransportError,
    models::retry::RetryPolicy,
    utils::{calculate_retry_delay, parse_retry_after},
};
use serde_json::json;
use tokio::time::Instant;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

use crate::support::fast_retry_policy;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 7, 16, 12, 0, 0).unwrap()
}

fn status_error(status: u16, retry_after: Option<&str>) -> TransportError {
    TransportError::Status {
        method: "POST".to_string(),
        url: "http://localhost/email".to_string(),
        status,
        body: String::new(),
        retry_after: retry_after.map(str::to_owned),
    }
}

async fn received(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}

/// Test: Retry-After seconds are converted to milliseconds
#[tokio::test]
async fn test_parse_retry_after_seconds() -> Result<()> {
    assert_eq!(parse_retry_after("120", now()), Some(120_000));
    assert_eq!(parse_retry_after("0.5", now()), Some(500));
    assert_eq!(parse_retry_after("0", now()), Some(0));

    Ok(())
}

/// Test: Retry-After HTTP dates are measured from now
#[tokio::test]
async fn test_parse_retry_after_http_date() -> Result<()> {
    assert_eq!(
        parse_retry_after("Sun, 17 Jul 2022 22:23:32 GMT", now()),
        Some(123_812_000)
    );

    Ok(())
}

/// Test: Unusable Retry-After values are ignored
#[tokio::test]
async fn test_parse_retry_after_rejects_garbage() -> Result<()> {
    assert_eq!(parse_retry_after("soon", now()), None);
    assert_eq!(parse_retry_after("-5", now()), None);
    assert_eq!(parse_retry_after("Fri, 15 Jul 2022 12:00:00 GMT", now()), None);

    Ok(())
}

/// Test: Linear policy waits the base delay before every retry
#[tokio::test]
async fn test_linear_delay_is_constant() -> Result<()> {
    let policy = RetryPolicy::default();
    let error = status_error(503, None);

    for retry_count in 1..=3 {
        assert_eq!(
            calculate_retry_delay(retry_count, &error, &policy, now()),
            Some(300)
        );
    }

    Ok(())
}

/// Test: Exponential policy scales the base delay by the retry number
#[tokio::test]
async fn test_exponential_delay_grows_with_retry_count() -> Result<()> {
    let policy = RetryPolicy {
        exponential_backoff: true,
        ..RetryPolicy::default()
    };
    let error = status_error(500, None);

    let delays: Vec<_> = (1..=3)
        .map(|retry_count| calculate_retry_delay(retry_count, &error, &policy, now()))
        .collect();

    assert_eq!(delays, vec![Some(300), Some(600), Some(900)]);

    Ok(())
}

/// Test: 429 responses honour Retry-After within the cap
#[tokio::test]
async fn test_too_many_requests_uses_retry_after() -> Result<()> {
    let policy = RetryPolicy::default();

    assert_eq!(
        calculate_retry_delay(1, &status_error(429, Some("0.8")), &policy, now()),
        Some(800)
    );
    assert_eq!(
        calculate_retry_delay(1, &status_error(429, Some("whenever")), &policy, now()),
        Some(300)
    );
    assert_eq!(
        calculate_retry_delay(2, &status_error(429, None), &policy, now()),
        Some(300)
    );

    Ok(())
}

/// Test: 429 responses asking for more than the cap are not retried
#[tokio::test]
async fn test_too_many_requests_over_cap_gives_up() -> Result<()> {
    let policy = RetryPolicy::default();

    assert_eq!(
        calculate_retry_delay(1, &status_error(429, Some("120")), &policy, now()),
        None
    );
    assert_eq!(
        calculate_retry_delay(
            1,
            &status_error(429, Some("Sun, 17 Jul 2022 22:23:32 GMT")),
            &policy,
            now()
        ),
        None
    );

    Ok(())
}

/// Test: Transient 5xx responses are retried until the request succeeds
#[tokio::test]
async fn test_transient_failures_are_retried() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/email"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/email"))
        .and(header("authorization", "Bearer token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("sent"))
        .mount(&server)
        .await;

    let policy = RetryPolicy {
        base_delay_ms: 100,
        ..fast_retry_policy()
    };
    let client = RetryableHttpClient::new(policy);
    let start = Instant::now();
    let body = client
        .post(&format!("{}/email", server.uri()), &json!({}), "Bearer token")
        .await?;
    let elapsed = start.elapsed();

    assert_eq!(body, "sent");
    assert_eq!(received(&server).await, 3, "Should succeed on the 3rd attempt");
    assert!(
        elapsed >= Duration::from_millis(2 * policy.base_delay_ms),
        "Two base delays expected before the 3rd attempt, took {elapsed:?}"
    );

    Ok(())
}

/// Test: Client errors are returned after a single attempt
#[tokio::test]
async fn test_client_errors_are_not_retried() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .mount(&server)
        .await;

    let client = RetryableHttpClient::new(fast_retry_policy());
    let error = client
        .post(&format!("{}/email", server.uri()), &json!({}), "Bearer token")
        .await
        .expect_err("400 must fail");

    assert_eq!(error.status(), Some(400));
    assert_eq!(error.body(), Some("bad request"));
    assert_eq!(error.to_string(), "Request failed with status code 400");
    assert_eq!(received(&server).await, 1);

    Ok(())
}

/// Test: Retries stop once max_retries is exhausted
#[tokio::test]
async fn test_retries_are_bounded() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = RetryableHttpClient::new(fast_retry_policy());
    let error = client
        .post(&format!("{}/email", server.uri()), &json!({}), "Bearer token")
        .await
        .expect_err("persistent 503 must fail");

    assert_eq!(error.status(), Some(503));
    assert_eq!(received(&server).await, 4, "One attempt plus three retries");

    Ok(())
}

/// Test: Zero max_retries means exactly one attempt
#[tokio::test]
async fn test_zero_retries_makes_one_attempt() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let policy = RetryPolicy {
        max_retries: 0,
        ..fast_retry_policy()
    };
    let result = RetryableHttpClient::new(policy)
        .post(&format!("{}/email", server.uri()), &json!({}), "Bearer token")
        .await;

    assert!(result.is_err());
    assert_eq!(received(&server).await, 1);

    Ok(())
}

/// Test: A 429 with a short Retry-After waits and then retries
#[tokio::test]
async fn test_too_many_requests_waits_for_retry_after() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0.2"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = RetryableHttpClient::new(fast_retry_policy());
    let start = Instant::now();
    client
        .post(&format!("{}/email", server.uri()), &json!({}), "Bearer token")
        .await?;

    assert!(start.elapsed() >= Duration::from_millis(200));
    assert_eq!(received(&server).await, 2);

    Ok(())
}

/// Test: A 429 asking for too long a wait fails without retrying
#[tokio::test]
async fn test_too_many_requests_over_cap_fails_fast() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "120"))
        .mount(&server)
        .await;

    let client = RetryableHttpClient::new(fast_retry_policy());
    let error = client
        .post(&format!("{}/email", server.uri()), &json!({}), "Bearer token")
        .await
        .expect_err("429 over the cap must fail");

    assert!(error.is_too_many_requests());
    assert_eq!(received(&server).await, 1);

    Ok(())
}

/// Test: Network failures are retried and surface without a status
#[tokio::test]
async fn test_network_failures_are_retried() -> Result<()> {
    let policy = RetryPolicy {
        base_delay_ms: 150,
        max_retries: 2,
        ..fast_retry_policy()
    };
    let http_client = reqwest::Client::builder()
        .connect_timeout(Duration::from_millis(500))
        .build()?;
    let client = RetryableHttpClient::with_client(http_client, policy);

    let start = Instant::now();
    let error = client
        .post("http://127.0.0.1:9/email", &json!({}), "Bearer token")
        .await
        .expect_err("closed port must fail");
    let elapsed = start.elapsed();

    assert!(matches!(error, TransportError::Network { .. }));
    assert!(
        elapsed >= Duration::from_millis(2 * policy.base_delay_ms),
        "Both retries should have waited, took {elapsed:?}"
    );
    assert_eq!(error.status(), None);
    assert!(error.is_retryable());

    Ok(())
}
