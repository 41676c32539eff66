//! Unified error type for the profile-to-PDF pipeline.
//!
//! Every stage returns `AppError`; the binary maps each variant onto a
//! distinct process exit code.

use std::fmt;
use std::path::PathBuf;

/// Top-level error for one run.
#[derive(Debug)]
pub enum AppError {
    /// The user aborted a prompt (Esc, Ctrl-C, or EOF on stdin).
    PromptCancelled,
    /// The chosen color is not one of the themes in the table.
    InvalidTheme(String),
    /// GitHub reported that the user does not exist.
    UserNotFound(String),
    /// Transport failure or an unexpected response from the API.
    Network(String),
    /// GitHub throttled the request.
    RateLimited { retry_after_secs: Option<u64> },
    /// A bounded network or render step ran past its deadline.
    Timeout { stage: &'static str, secs: u64 },
    /// Browser launch, navigation, or printing failed.
    Render(String),
    /// The PDF could not be written to disk.
    FileWrite { path: PathBuf, source: std::io::Error },
    /// Configuration file or environment values are unusable.
    Config(String),
}

impl AppError {
    /// Process exit code for this failure kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::PromptCancelled => 130,
            Self::InvalidTheme(_) => 2,
            Self::UserNotFound(_) => 3,
            Self::Network(_) => 4,
            Self::RateLimited { .. } => 5,
            Self::Timeout { .. } => 6,
            Self::Render(_) => 7,
            Self::FileWrite { .. } => 8,
            Self::Config(_) => 78,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PromptCancelled => write!(f, "prompt cancelled"),
            Self::InvalidTheme(name) => write!(
                f,
                "invalid color `{name}`: expected one of {}",
                crate::theme::names().join(", ")
            ),
            Self::UserNotFound(user) => write!(f, "GitHub user `{user}` was not found"),
            Self::Network(msg) => write!(f, "network: {msg}"),
            Self::RateLimited {
                retry_after_secs: Some(secs),
            } => write!(f, "rate limited by GitHub; retry after {secs}s"),
            Self::RateLimited {
                retry_after_secs: None,
            } => write!(f, "rate limited by GitHub"),
            Self::Timeout { stage, secs } => write!(f, "{stage} timed out after {secs}s"),
            Self::Render(msg) => write!(f, "render: {msg}"),
            Self::FileWrite { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
            Self::Config(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileWrite { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(format!("toml: {e}"))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}
