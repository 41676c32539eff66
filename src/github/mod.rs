//! GitHub profile lookup.
//!
//! The client facade stays small:
//! - request building and status mapping are delegated to `transport`.
//! - retry policy logic is delegated to `retry`.

mod retry;
mod transport;

use crate::config::GithubConfig;
use crate::error::AppError;
use async_trait::async_trait;
use retry::RetryPolicy;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// The subset of a public GitHub profile the document needs, plus the raw
/// object for the data dump.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub login: String,
    /// Display name; falls back to `login` when GitHub reports none.
    pub name: String,
    pub avatar_url: String,
    pub raw: Value,
}

impl Profile {
    /// Build a profile from a `/users/{name}` response body.
    pub fn from_json(raw: Value) -> Result<Self, AppError> {
        let field = |key: &str| {
            raw.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        let avatar_url = field("avatar_url").ok_or_else(|| {
            AppError::Network("invalid profile payload: missing `avatar_url`".to_string())
        })?;
        let login = field("login").unwrap_or_default();
        let name = field("name").unwrap_or_else(|| login.clone());
        Ok(Self {
            login,
            name,
            avatar_url,
            raw,
        })
    }
}

/// Anything that can resolve a username into a profile.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch(&self, username: &str) -> Result<Profile, AppError>;
}

/// Client for the public GitHub REST users endpoint.
pub struct GithubClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl GithubClient {
    /// Build a client from resolved GitHub configuration.
    pub fn new(config: &GithubConfig) -> Result<Self, AppError> {
        Self::new_with_retry_policy(config, RetryPolicy::with_max_attempts(config.max_attempts))
    }

    fn new_with_retry_policy(
        config: &GithubConfig,
        retry_policy: RetryPolicy,
    ) -> Result<Self, AppError> {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        Ok(Self {
            http: transport::build_http_client(timeout)?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            timeout,
            retry_policy,
        })
    }

    /// Fetch and decode one user's public profile.
    pub async fn fetch(&self, username: &str) -> Result<Profile, AppError> {
        let url = transport::users_url(&self.base_url, username)?;
        let mut attempt: u32 = 0;
        let raw = loop {
            match transport::request_profile(&self.http, &url, self.token.as_deref()).await {
                Ok(raw) => break raw,
                Err(err) => {
                    if !self.retry_policy.should_retry(&err, attempt) {
                        return Err(err.into_app_error(username, self.timeout));
                    }
                    let delay = self.retry_policy.retry_delay_for(attempt, &err);
                    attempt = attempt.saturating_add(1);
                    warn!(
                        %username,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying GitHub profile request"
                    );
                    sleep(delay).await;
                }
            }
        };
        let profile = Profile::from_json(raw)?;
        info!(login = %profile.login, "fetched GitHub profile");
        Ok(profile)
    }
}

#[async_trait]
impl ProfileSource for GithubClient {
    async fn fetch(&self, username: &str) -> Result<Profile, AppError> {
        GithubClient::fetch(self, username).await
    }
}
