//! Configuration data model.
//!
//! Every section deserializes with `#[serde(default)]` so a partial file only
//! overrides the keys it names.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::{
    DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_SECS, DEFAULT_MAX_ATTEMPTS, DEFAULT_OUTPUT_PATH,
    DEFAULT_RENDER_TIMEOUT_SECS, DEFAULT_TOKEN_ENV,
};

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GithubConfig,
    pub pdf: PdfConfig,
    pub display: DisplayConfig,
}

/// Profile lookup settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_base_url: String,
    pub timeout_secs: u64,
    /// Total attempts per run, including the initial request.
    pub max_attempts: u32,
    /// Name of the env var holding an optional API token.
    pub token_env: String,
    /// Token resolved from `token_env` at load time; never read from files.
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            token: None,
        }
    }
}

/// Paper format used when printing.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    Letter,
    A4,
}

impl PageSize {
    /// Paper width and height in inches.
    pub fn inches(self) -> (f64, f64) {
        match self {
            Self::Letter => (8.5, 11.0),
            Self::A4 => (8.27, 11.69),
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "letter" => Ok(Self::Letter),
            "a4" => Ok(Self::A4),
            other => Err(format!("unknown page size `{other}` (expected letter or a4)")),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Letter => f.write_str("letter"),
            Self::A4 => f.write_str("a4"),
        }
    }
}

/// PDF output and browser settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    pub output: PathBuf,
    /// Also save the rendered HTML here when set.
    pub html_output: Option<PathBuf>,
    pub page_size: PageSize,
    pub render_timeout_secs: u64,
    /// Explicit Chrome/Chromium binary; auto-detected when unset.
    pub chrome_path: Option<PathBuf>,
    /// Keep Chrome's sandbox enabled (fails as root in most containers).
    pub sandbox: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            html_output: None,
            page_size: PageSize::Letter,
            render_timeout_secs: DEFAULT_RENDER_TIMEOUT_SECS,
            chrome_path: None,
            sandbox: false,
        }
    }
}

/// Terminal output preferences.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}
