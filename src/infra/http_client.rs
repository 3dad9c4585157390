//! HTTP client factory with consistent timeout configuration.
//!
//! Outbound clients (GitHub, Gemini) are built here rather than with
//! `reqwest::Client::new()` so every call carries the same timeouts and
//! `User-Agent`.

use reqwest::{Client, Response};
use std::time::Duration;

use crate::app_error::AppError;

/// Default connect timeout (TCP handshake + TLS).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default request timeout (total request/response time).
///
/// Generating a review can take a while on large diffs, hence more headroom
/// than a plain REST call needs.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// GitHub rejects API requests without a User-Agent.
pub const USER_AGENT: &str = concat!("reviewbot/", env!("CARGO_PKG_VERSION"));

pub fn try_build_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
}

/// Maps a transport failure (DNS, TLS, timeout) to a 502 upstream error.
pub fn transport_error(service: &'static str, err: reqwest::Error) -> AppError {
    AppError::Upstream {
        service,
        status: 502,
        message: if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        },
    }
}

/// Passes successful responses through; turns anything else into
/// `AppError::Upstream` carrying the status and a truncated body.
pub async fn expect_success(service: &'static str, resp: Response) -> Result<Response, AppError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    tracing::warn!(service, status = status.as_u16(), body = %truncate(&body, 300), "Upstream request failed");
    Err(AppError::Upstream {
        service,
        status: status.as_u16(),
        message: truncate(&body, 300).to_string(),
    })
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
