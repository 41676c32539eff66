//! Compile-time build metadata.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `--version` text: package version plus the source revision from `build.rs`.
pub const CLI_LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("PROFILE_PDF_GIT_REV"),
    ")"
);

/// User-Agent sent to the GitHub API.
pub fn user_agent() -> String {
    format!("profile-pdf/{VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_version_names_version_and_revision() {
        assert!(CLI_LONG_VERSION.starts_with(VERSION));
        assert!(CLI_LONG_VERSION.ends_with(')'));
        let rev = &CLI_LONG_VERSION[VERSION.len() + 2..CLI_LONG_VERSION.len() - 1];
        assert!(!rev.is_empty());
    }

    #[test]
    fn user_agent_carries_package_version() {
        assert_eq!(user_agent(), format!("profile-pdf/{}", env!("CARGO_PKG_VERSION")));
    }
}
