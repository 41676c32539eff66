//! Configuration loading from TOML files and environment variables.
//!
//! Precedence (highest wins):
//! 1. CLI flags (applied by the binary after loading)
//! 2. Environment variables (`PROFILE_PDF_*`, `NO_COLOR`, token env var)
//! 3. TOML file from `--config`, else `./profile-pdf.toml`, else
//!    `$XDG_CONFIG_HOME/profile-pdf/profile-pdf.toml` (or `~/.config/...`)
//! 4. Built-in defaults

mod defaults;
mod env;
mod loader;
mod sources;
mod types;

pub use loader::load_config;
pub use sources::{config_root_dir, ConfigSource};
pub use types::{Config, DisplayConfig, GithubConfig, PageSize, PdfConfig};
