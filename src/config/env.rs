//! Environment overrides applied on top of file config.

use std::path::PathBuf;

use crate::error::AppError;

use super::Config;

pub(super) const ENV_API_BASE_URL: &str = "PROFILE_PDF_API_BASE_URL";
pub(super) const ENV_API_TIMEOUT_SECS: &str = "PROFILE_PDF_API_TIMEOUT_SECS";
pub(super) const ENV_RENDER_TIMEOUT_SECS: &str = "PROFILE_PDF_RENDER_TIMEOUT_SECS";
pub(super) const ENV_OUTPUT: &str = "PROFILE_PDF_OUTPUT";
pub(super) const ENV_CHROME_PATH: &str = "PROFILE_PDF_CHROME_PATH";
pub(super) const ENV_NO_COLOR: &str = "NO_COLOR";

pub(super) fn apply_runtime_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), AppError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(url) = non_empty(env_lookup, ENV_API_BASE_URL) {
        config.github.api_base_url = url;
    }
    if let Some(secs) = parse_secs(env_lookup, ENV_API_TIMEOUT_SECS)? {
        config.github.timeout_secs = secs;
    }
    if let Some(secs) = parse_secs(env_lookup, ENV_RENDER_TIMEOUT_SECS)? {
        config.pdf.render_timeout_secs = secs;
    }
    if let Some(path) = non_empty(env_lookup, ENV_OUTPUT) {
        config.pdf.output = PathBuf::from(path);
    }
    if let Some(path) = non_empty(env_lookup, ENV_CHROME_PATH) {
        config.pdf.chrome_path = Some(PathBuf::from(path));
    }
    // https://no-color.org: any non-empty value disables color.
    if non_empty(env_lookup, ENV_NO_COLOR).is_some() {
        config.display.color = false;
    }
    config.github.token = non_empty(env_lookup, config.github.token_env.trim());
    Ok(())
}

fn non_empty<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if name.is_empty() {
        return None;
    }
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse whole seconds, clamped to at least 1 so a zero never disables a deadline.
fn parse_secs<FEnv>(env_lookup: &FEnv, name: &str) -> Result<Option<u64>, AppError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    let Some(raw) = non_empty(env_lookup, name) else {
        return Ok(None);
    };
    let parsed = raw.parse::<u64>().map_err(|_| {
        AppError::Config(format!(
            "invalid {name} value `{raw}`: expected positive integer seconds"
        ))
    })?;
    Ok(Some(parsed.max(1)))
}
