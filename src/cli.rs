//! CLI argument parsing via clap.

use clap::Parser;
use profile_pdf::build_info::CLI_LONG_VERSION;
use profile_pdf::config::{Config, PageSize};
use std::path::PathBuf;

/// Render a GitHub profile into a themed PDF.
///
/// Asks for a GitHub username and a favorite color, then writes the PDF.
#[derive(Debug, Parser)]
#[command(name = "profile-pdf", version, long_version = CLI_LONG_VERSION)]
pub struct Args {
    /// Path to config file (default: ./profile-pdf.toml or ~/.config/profile-pdf/profile-pdf.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Where to write the PDF.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Also save the rendered HTML document.
    #[arg(long = "html", value_name = "PATH")]
    pub html: Option<PathBuf>,

    /// Paper format: letter or a4.
    #[arg(long = "page-size", value_name = "SIZE")]
    pub page_size: Option<PageSize>,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Args {
    /// Layer command-line overrides on top of loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.pdf.output = output.clone();
        }
        if let Some(html) = &self.html {
            config.pdf.html_output = Some(html.clone());
        }
        if let Some(page_size) = self.page_size {
            config.pdf.page_size = page_size;
        }
        if self.no_color {
            config.display.color = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;
    use profile_pdf::config::{Config, PageSize};
    use std::path::PathBuf;

    #[test]
    fn no_flags_keep_config_values() {
        let args = Args::parse_from(["profile-pdf"]);
        let mut config = Config::default();
        args.apply_to(&mut config);
        assert_eq!(config.pdf.output, PathBuf::from("profile.pdf"));
        assert_eq!(config.pdf.page_size, PageSize::Letter);
        assert!(config.display.color);
    }

    #[test]
    fn overrides_apply_to_pdf_and_display() {
        let args = Args::parse_from([
            "profile-pdf",
            "-o",
            "out/me.pdf",
            "--html",
            "out/index.html",
            "--page-size",
            "A4",
            "--no-color",
        ]);
        let mut config = Config::default();
        args.apply_to(&mut config);
        assert_eq!(config.pdf.output, PathBuf::from("out/me.pdf"));
        assert_eq!(config.pdf.html_output, Some(PathBuf::from("out/index.html")));
        assert_eq!(config.pdf.page_size, PageSize::A4);
        assert!(!config.display.color);
    }

    #[test]
    fn unknown_page_size_is_rejected() {
        let err = Args::try_parse_from(["profile-pdf", "--page-size", "legal"]).unwrap_err();
        assert!(err.to_string().contains("unknown page size"));
    }

    #[test]
    fn config_path_parses_short_flag() {
        let args = Args::parse_from(["profile-pdf", "-c", "custom.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("custom.toml")));
    }
}
