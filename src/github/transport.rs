//! HTTP transport helpers for the GitHub users endpoint.

use crate::error::AppError;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, RETRY_AFTER, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATELIMIT_RESET: &str = "x-ratelimit-reset";

/// Failure of a single request attempt, before it is mapped for callers.
#[derive(Debug)]
pub(super) enum RequestError {
    /// Connection, TLS, body-read, or client-timeout failure.
    Transport(reqwest::Error),
    /// Non-2xx response.
    Status {
        code: u16,
        body: String,
        retry_after_secs: Option<u64>,
        rate_limited: bool,
    },
    /// 2xx response whose body is not a usable JSON object.
    Payload(String),
}

impl RequestError {
    pub(super) fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::Status {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }

    /// Map onto the public taxonomy once retries are exhausted.
    pub(super) fn into_app_error(self, username: &str, timeout: Duration) -> AppError {
        match self {
            Self::Transport(inner) if inner.is_timeout() => AppError::Timeout {
                stage: "profile request",
                secs: timeout.as_secs(),
            },
            Self::Transport(inner) => AppError::from(inner),
            Self::Status {
                rate_limited: true,
                retry_after_secs,
                ..
            } => AppError::RateLimited { retry_after_secs },
            Self::Status { code: 404, .. } => AppError::UserNotFound(username.to_string()),
            Self::Status { code, body, .. } => {
                AppError::Network(format!("GitHub API status {code}: {}", body.trim()))
            }
            Self::Payload(msg) => AppError::Network(format!("invalid profile payload: {msg}")),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "http: {e}"),
            Self::Status { code, .. } => write!(f, "status {code}"),
            Self::Payload(msg) => write!(f, "payload: {msg}"),
        }
    }
}

/// Build an HTTP client with the request timeout applied.
pub(super) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Network(format!("failed to build HTTP client: {e}")))
}

/// Build `{base}/users/{username}` with the username percent-encoded.
pub(super) fn users_url(base_url: &str, username: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(base_url).map_err(|e| {
        AppError::Config(format!("invalid GitHub API base URL `{base_url}`: {e}"))
    })?;
    url.path_segments_mut()
        .map_err(|_| {
            AppError::Config(format!("GitHub API base URL `{base_url}` cannot be a base"))
        })?
        .pop_if_empty()
        .extend(["users", username]);
    Ok(url)
}

/// Send one GET for the profile and return the decoded JSON object.
pub(super) async fn request_profile(
    http: &reqwest::Client,
    url: &Url,
    token: Option<&str>,
) -> Result<Value, RequestError> {
    debug!(%url, authenticated = token.is_some(), "requesting GitHub profile");
    let mut req = http
        .get(url.clone())
        .header(USER_AGENT, crate::build_info::user_agent())
        .header(ACCEPT, GITHUB_ACCEPT);
    if let Some(token) = token.filter(|value| !value.trim().is_empty()) {
        req = req.header(AUTHORIZATION, format!("Bearer {}", token.trim()));
    }

    let response = req.send().await.map_err(RequestError::Transport)?;
    let status = response.status();
    if !status.is_success() {
        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, &headers, body));
    }

    let value: Value = response.json().await.map_err(RequestError::Transport)?;
    if !value.is_object() {
        return Err(RequestError::Payload("expected a JSON object".to_string()));
    }
    Ok(value)
}

fn status_error(status: StatusCode, headers: &HeaderMap, body: String) -> RequestError {
    let code = status.as_u16();
    let exhausted = headers
        .get(RATELIMIT_REMAINING)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim() == "0");
    let retry_after = parse_retry_after_secs(headers);
    // Secondary rate limits answer 403 with `Retry-After` while quota remains.
    let rate_limited = code == 429 || (code == 403 && (exhausted || retry_after.is_some()));
    let retry_after_secs = retry_after.or_else(|| {
        rate_limited
            .then(|| parse_ratelimit_reset_secs(headers))
            .flatten()
    });
    RequestError::Status {
        code,
        body,
        retry_after_secs,
        rate_limited,
    }
}

/// Parse `Retry-After` as delta-seconds or an HTTP date.
pub(super) fn parse_retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    if let Ok(secs) = raw.parse::<u64>() {
        return Some(secs);
    }
    let at = httpdate::parse_http_date(raw).ok()?;
    Some(
        at.duration_since(SystemTime::now())
            .map(|delta| delta.as_secs())
            .unwrap_or(0),
    )
}

/// Seconds until the `x-ratelimit-reset` epoch timestamp.
fn parse_ratelimit_reset_secs(headers: &HeaderMap) -> Option<u64> {
    let reset = headers
        .get(RATELIMIT_RESET)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|delta| delta.as_secs())
        .unwrap_or(0);
    Some(reset.saturating_sub(now))
}
