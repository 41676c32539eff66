//! profile-pdf: turn a public GitHub profile into a themed one-page PDF.
//!
//! A run asks for a username and a favorite color, fetches the profile from
//! the GitHub REST API, fills the HTML template with the matching theme, and
//! prints it to PDF through a headless browser.
//!
//! # Quick start
//!
//! ```no_run
//! use profile_pdf::config::load_config;
//! use profile_pdf::github::GithubClient;
//! use profile_pdf::pdf::{ChromeEngine, PdfRenderer, PrintOptions};
//! use profile_pdf::pipeline;
//! use profile_pdf::ui::{Renderer, TerminalPrompter};
//!
//! # async fn example() -> Result<(), profile_pdf::error::AppError> {
//! let config = load_config(None)?;
//! let client = GithubClient::new(&config.github)?;
//! let renderer = PdfRenderer::new(
//!     ChromeEngine::from_config(&config.pdf),
//!     PrintOptions::from_config(&config.pdf),
//!     config.pdf.output.clone(),
//! );
//! let mut prompter = TerminalPrompter::new(true);
//! let report =
//!     pipeline::run(&mut prompter, &client, &renderer, None, &Renderer::new(true)).await?;
//! println!("wrote {}", report.output.display());
//! # Ok(())
//! # }
//! ```

pub mod build_info;
pub mod config;
pub mod error;
pub mod github;
pub mod pdf;
pub mod pipeline;
pub mod template;
#[cfg(test)]
pub mod testsupport;
pub mod theme;
pub mod ui;
