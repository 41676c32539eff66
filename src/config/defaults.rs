//! Default configuration constants.

/// Public GitHub REST API root.
pub(super) const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
/// Timeout for one profile request.
pub(super) const DEFAULT_API_TIMEOUT_SECS: u64 = 20;
/// Total profile request attempts, including the first.
pub(super) const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Env var consulted for an optional GitHub token.
pub(super) const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";
/// PDF written into the working directory when no path is configured.
pub(super) const DEFAULT_OUTPUT_PATH: &str = "profile.pdf";
/// Deadline for browser launch, page load, and printing together.
pub(super) const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 60;
/// Config file name searched in the working and per-user config dirs.
pub(super) const CONFIG_FILE_NAME: &str = "profile-pdf.toml";
/// Directory under the user config root holding the global config file.
pub(super) const CONFIG_DIR_NAME: &str = "profile-pdf";
