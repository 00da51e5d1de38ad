use anyhow::{Context, bail};
use reqwest::StatusCode;
use reqwest::blocking::{RequestBuilder, Response};
use reqwest::header::HeaderMap;
use std::time::Duration;
use tracing::warn;
use vizserver_core::error::ServerError;

use crate::session_models::ErrorResponse;
use crate::xml::parse_response;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Sends the request built by `build`, retrying throttled responses. Any other
/// non-success status is returned as a [`ServerError`].
pub(crate) fn send_with_retry<F>(max_attempts: u32, mut build: F) -> anyhow::Result<Response>
where
    F: FnMut() -> anyhow::Result<RequestBuilder>,
{
    let max_attempts = max_attempts.max(1);
    for attempt in 1..=max_attempts {
        let response = build()?.send().context("send request")?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if is_retryable(status) && attempt < max_attempts {
            let delay = retry_after_seconds(response.headers())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_RETRY_DELAY);
            warn!(
                status = status.as_u16(),
                attempt,
                delay_secs = delay.as_secs(),
                "server throttled request, retrying"
            );
            let _ = response.bytes();
            std::thread::sleep(delay);
            continue;
        }
        return Err(server_error(response).into());
    }
    bail!("request failed after retries");
}

fn is_retryable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE
    )
}

fn retry_after_seconds(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}

fn server_error(response: Response) -> ServerError {
    let status = response.status();
    let body = response.text().unwrap_or_default();
    parse_error_body(status, &body)
}

pub(crate) fn parse_error_body(status: StatusCode, body: &str) -> ServerError {
    match parse_response::<ErrorResponse>(body) {
        Ok(parsed) => ServerError {
            status: status.as_u16(),
            code: parsed.error.code,
            summary: parsed.error.summary.unwrap_or_default(),
            detail: parsed.error.detail.unwrap_or_default(),
        },
        Err(_) => ServerError {
            status: status.as_u16(),
            code: String::new(),
            summary: status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string(),
            detail: body.trim().to_string(),
        },
    }
}
