//! One prompt-to-PDF run.
//!
//! A run moves `Prompting -> Fetching -> Rendering -> WritingPdf -> Done`;
//! any error moves it to `Failed` and is returned unchanged. The theme is
//! resolved right after prompting, so an unknown color never reaches the
//! network, and the output file is only replaced after the browser has
//! produced a document.

use crate::error::AppError;
use crate::github::ProfileSource;
use crate::pdf::{write_html, PdfEngine, PdfRenderer};
use crate::template;
use crate::theme::{self, ColorTheme};
use crate::ui::render::RenderSink;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Lifecycle position of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Prompting,
    Fetching,
    Rendering,
    WritingPdf,
    Done,
    Failed,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Self::Prompting => "prompting",
            Self::Fetching => "fetching",
            Self::Rendering => "rendering",
            Self::WritingPdf => "writing-pdf",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of the two answers a run needs.
pub trait Prompter: Send {
    /// Ask for a GitHub username. Returns a non-empty, trimmed name.
    fn username(&mut self) -> Result<String, AppError>;
    /// Ask for a color among `choices`. The answer is validated by the caller.
    fn color(&mut self, choices: &[&'static str]) -> Result<String, AppError>;
}

/// Validated answers from the prompting stage.
#[derive(Debug, Clone)]
pub struct UserInput {
    pub username: String,
    pub theme: &'static ColorTheme,
}

/// Summary of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub username: String,
    pub theme: &'static str,
    pub output: PathBuf,
    pub bytes: u64,
    /// Every stage entered, in order, ending with `Done`.
    pub stages: Vec<Stage>,
}

/// Records stage transitions and reports them to logs.
#[derive(Debug)]
struct StageTracker {
    visited: Vec<Stage>,
}

impl StageTracker {
    fn new() -> Self {
        let tracker = Self {
            visited: vec![Stage::Prompting],
        };
        debug!(stage = %Stage::Prompting, "run started");
        tracker
    }

    fn current(&self) -> Stage {
        self.visited.last().copied().unwrap_or(Stage::Prompting)
    }

    fn advance(&mut self, next: Stage) {
        let from = self.current();
        if from.is_terminal() {
            return;
        }
        debug!(from = %from, to = %next, "stage transition");
        self.visited.push(next);
    }

    fn fail(&mut self, err: &AppError) {
        let from = self.current();
        warn!(stage = %from, error = %err, "run failed");
        self.advance(Stage::Failed);
    }
}

/// Run the whole pipeline once.
///
/// `html_output`, when set, also saves the rendered HTML document there.
pub async fn run<E: PdfEngine>(
    prompter: &mut dyn Prompter,
    source: &dyn ProfileSource,
    renderer: &PdfRenderer<E>,
    html_output: Option<&Path>,
    sink: &dyn RenderSink,
) -> Result<RunReport, AppError> {
    let mut tracker = StageTracker::new();
    match run_stages(&mut tracker, prompter, source, renderer, html_output, sink).await {
        Ok(mut report) => {
            tracker.advance(Stage::Done);
            report.stages = tracker.visited;
            info!(
                user = %report.username,
                theme = report.theme,
                path = %report.output.display(),
                bytes = report.bytes,
                "run complete"
            );
            Ok(report)
        }
        Err(err) => {
            tracker.fail(&err);
            Err(err)
        }
    }
}

async fn run_stages<E: PdfEngine>(
    tracker: &mut StageTracker,
    prompter: &mut dyn Prompter,
    source: &dyn ProfileSource,
    renderer: &PdfRenderer<E>,
    html_output: Option<&Path>,
    sink: &dyn RenderSink,
) -> Result<RunReport, AppError> {
    let input = collect_input(prompter)?;

    tracker.advance(Stage::Fetching);
    sink.activity(&format!("fetching GitHub profile for {}", input.username));
    let profile = source.fetch(&input.username).await?;

    tracker.advance(Stage::Rendering);
    sink.activity(&format!("rendering {} theme", input.theme.name));
    let html = template::render(&profile, input.theme);
    if let Some(path) = html_output {
        write_html(path, &html)?;
        sink.field("html", &path.display().to_string());
    }

    tracker.advance(Stage::WritingPdf);
    let bytes = renderer.render_to_file(&html).await?;

    sink.section("profile PDF ready");
    sink.field("user", &profile.login);
    sink.field("theme", input.theme.name);
    sink.field("output", &renderer.output().display().to_string());

    Ok(RunReport {
        username: input.username,
        theme: input.theme.name,
        output: renderer.output().to_path_buf(),
        bytes,
        stages: Vec::new(),
    })
}

/// Ask both questions and resolve the theme.
pub fn collect_input(prompter: &mut dyn Prompter) -> Result<UserInput, AppError> {
    let username = prompter.username()?;
    let answer = prompter.color(&theme::names())?;
    let theme = theme::lookup(&answer)?;
    debug!(user = %username, theme = theme.name, "input collected");
    Ok(UserInput { username, theme })
}
