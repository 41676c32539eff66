//! HTML-to-PDF rendering and output writing.
//!
//! `PdfEngine` is the seam between the pipeline and the browser; the Chrome
//! implementation lives in `chrome`, file output in `writer`.

mod chrome;
mod writer;

use crate::config::{PageSize, PdfConfig};
use crate::error::AppError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub use chrome::ChromeEngine;
pub use writer::{write_html, write_pdf};

/// Print settings handed to an engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintOptions {
    pub page_size: PageSize,
    /// Deadline covering browser launch, page load, and printing.
    pub timeout: Duration,
}

impl PrintOptions {
    pub fn from_config(config: &PdfConfig) -> Self {
        Self {
            page_size: config.page_size,
            timeout: Duration::from_secs(config.render_timeout_secs.max(1)),
        }
    }
}

/// Anything that can turn an HTML document into PDF bytes.
#[async_trait]
pub trait PdfEngine: Send + Sync {
    async fn print(&self, html: &str, options: &PrintOptions) -> Result<Vec<u8>, AppError>;
}

/// Renders documents through an engine and writes them to one output path.
pub struct PdfRenderer<E> {
    engine: E,
    options: PrintOptions,
    output: PathBuf,
}

impl<E: PdfEngine> PdfRenderer<E> {
    pub fn new(engine: E, options: PrintOptions, output: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            options,
            output: output.into(),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Print `html` and replace the output file with the result.
    ///
    /// Returns the number of bytes written.
    pub async fn render_to_file(&self, html: &str) -> Result<u64, AppError> {
        let bytes = self.engine.print(html, &self.options).await?;
        let written = write_pdf(&self.output, &bytes)?;
        info!(path = %self.output.display(), bytes = written, "wrote PDF");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;
    use std::sync::Mutex;

    struct RecordingEngine {
        seen: Mutex<Vec<(String, PrintOptions)>>,
        output: Result<Vec<u8>, &'static str>,
    }

    #[async_trait]
    impl PdfEngine for RecordingEngine {
        async fn print(&self, html: &str, options: &PrintOptions) -> Result<Vec<u8>, AppError> {
            self.seen
                .lock()
                .unwrap()
                .push((html.to_string(), *options));
            self.output
                .clone()
                .map_err(|msg| AppError::Render(msg.to_string()))
        }
    }

    fn options() -> PrintOptions {
        PrintOptions {
            page_size: PageSize::A4,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn options_clamp_zero_timeout() {
        let config = PdfConfig {
            render_timeout_secs: 0,
            ..PdfConfig::default()
        };
        let options = PrintOptions::from_config(&config);
        assert_eq!(options.timeout, Duration::from_secs(1));
        assert_eq!(options.page_size, PageSize::Letter);
    }

    #[tokio::test]
    async fn render_to_file_writes_engine_output() {
        let dir = TestTempDir::new("pdf-render");
        let engine = RecordingEngine {
            seen: Mutex::new(Vec::new()),
            output: Ok(b"%PDF-1.4 fake".to_vec()),
        };
        let renderer = PdfRenderer::new(engine, options(), dir.child("profile.pdf"));
        let written = renderer.render_to_file("<html></html>").await.unwrap();
        assert_eq!(written, 13);
        assert_eq!(
            std::fs::read(renderer.output()).unwrap(),
            b"%PDF-1.4 fake".to_vec()
        );
        let seen = renderer.engine.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "<html></html>");
        assert_eq!(seen[0].1.page_size, PageSize::A4);
    }

    #[tokio::test]
    async fn engine_failure_leaves_existing_file_untouched() {
        let dir = TestTempDir::new("pdf-render-fail");
        let existing = dir.write_text("profile.pdf", "previous run");
        let engine = RecordingEngine {
            seen: Mutex::new(Vec::new()),
            output: Err("browser crashed"),
        };
        let renderer = PdfRenderer::new(engine, options(), existing.clone());
        let err = renderer.render_to_file("<html></html>").await.unwrap_err();
        assert_eq!(err.to_string(), "render: browser crashed");
        assert_eq!(std::fs::read_to_string(existing).unwrap(), "previous run");
    }
}
