//! CLI entry point for profile-pdf.

mod cli;

use clap::Parser;
use profile_pdf::config::{load_config, Config};
use profile_pdf::error::AppError;
use profile_pdf::github::GithubClient;
use profile_pdf::pdf::{ChromeEngine, PdfRenderer, PrintOptions};
use profile_pdf::pipeline;
use profile_pdf::ui::{RenderSink, Renderer, TerminalPrompter};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PROFILE_PDF_LOG";

#[tokio::main]
async fn main() {
    init_tracing();
    let args = cli::Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(mut config) => {
            args.apply_to(&mut config);
            config
        }
        Err(e) => exit_with(&Renderer::new(std::io::stderr().is_terminal()), e),
    };

    let renderer = Renderer::new(config.display.color && std::io::stderr().is_terminal());
    if let Err(e) = run(&config, &renderer).await {
        exit_with(&renderer, e);
    }
}

async fn run(config: &Config, renderer: &Renderer) -> Result<(), AppError> {
    let client = GithubClient::new(&config.github)?;
    let pdf = PdfRenderer::new(
        ChromeEngine::from_config(&config.pdf),
        PrintOptions::from_config(&config.pdf),
        config.pdf.output.clone(),
    );
    let mut prompter = TerminalPrompter::new(renderer.color());
    pipeline::run(
        &mut prompter,
        &client,
        &pdf,
        config.pdf.html_output.as_deref(),
        renderer,
    )
    .await?;
    Ok(())
}

fn exit_with(renderer: &Renderer, err: AppError) -> ! {
    tracing::error!(error = %err, code = err.exit_code(), "exiting");
    match &err {
        AppError::PromptCancelled => renderer.warn(&err.to_string()),
        AppError::RateLimited { .. } => {
            renderer.error(&err.to_string());
            renderer.warn("set GITHUB_TOKEN to raise the API rate limit");
        }
        _ => renderer.error(&err.to_string()),
    }
    std::process::exit(err.exit_code());
}

/// Structured logs go to stderr; silent below `warn` unless asked.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
