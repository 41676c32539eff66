//! Interactive prompts: free-text input and a single-choice list picker.
//!
//! When stdin/stderr are not terminals both prompts fall back to plain line
//! reads so the tool can be scripted with piped input.

use super::settings;
use crate::error::AppError;
use crate::pipeline::Prompter;
use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;
use tracing::warn;

/// Prompter backed by the process terminal.
#[derive(Debug, Clone, Copy)]
pub struct TerminalPrompter {
    color: bool,
}

impl TerminalPrompter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl Prompter for TerminalPrompter {
    fn username(&mut self) -> Result<String, AppError> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        loop {
            write_question(&mut io::stderr(), self.color, settings::PROMPT_USERNAME)
                .map_err(prompt_io_error)?;
            let line = read_line(&mut input)
                .map_err(prompt_io_error)?
                .ok_or(AppError::PromptCancelled)?;
            let username = line.trim();
            if !username.is_empty() {
                return Ok(username.to_string());
            }
        }
    }

    fn color(&mut self, choices: &[&'static str]) -> Result<String, AppError> {
        if io::stdin().is_terminal() && io::stderr().is_terminal() {
            let options: Vec<String> = choices.iter().map(|c| c.to_string()).collect();
            let picked = pick_from_list(
                self.color,
                settings::PROMPT_COLOR,
                settings::PROMPT_COLOR_HELP,
                &options,
                0,
            )
            .map_err(prompt_io_error)?
            .ok_or(AppError::PromptCancelled)?;
            let choice = choices[picked];
            // Echo the answer so the transcript shows what was chosen.
            write_answer(&mut io::stderr(), self.color, settings::PROMPT_COLOR, choice)
                .map_err(prompt_io_error)?;
            return Ok(choice.to_string());
        }

        let mut stderr = io::stderr();
        write_question(&mut stderr, self.color, settings::PROMPT_COLOR)
            .map_err(prompt_io_error)?;
        for (idx, choice) in choices.iter().enumerate() {
            writeln!(stderr, "{}{}. {choice}", settings::INDENT_1, idx + 1)
                .map_err(prompt_io_error)?;
        }
        write!(stderr, "{}{}", settings::INDENT_1, settings::PROMPT_PICK_FALLBACK)
            .and_then(|_| stderr.flush())
            .map_err(prompt_io_error)?;
        let line = read_line(&mut io::stdin().lock())
            .map_err(prompt_io_error)?
            .ok_or(AppError::PromptCancelled)?;
        resolve_fallback_choice(choices, &line).ok_or(AppError::PromptCancelled)
    }
}

/// A prompt that cannot talk to the terminal cannot collect an answer.
fn prompt_io_error(e: io::Error) -> AppError {
    warn!(error = %e, "terminal prompt failed");
    AppError::PromptCancelled
}

/// Map a typed fallback answer onto a choice.
///
/// A number selects by position; anything else is passed through verbatim so
/// the caller's theme lookup decides whether it is valid. Blank input cancels.
fn resolve_fallback_choice(choices: &[&str], line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(index) = trimmed.parse::<usize>() {
        if (1..=choices.len()).contains(&index) {
            return Some(choices[index - 1].to_string());
        }
    }
    Some(trimmed.to_string())
}

/// Read one line; `None` on EOF.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        eprintln!();
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

fn write_question<W: Write>(out: &mut W, color: bool, question: &str) -> io::Result<()> {
    if color {
        write!(
            out,
            "{} {} ",
            settings::PROMPT_QUESTION_GLYPH
                .with(settings::COLOR_QUESTION_GLYPH)
                .bold(),
            question.with(settings::COLOR_QUESTION_TEXT).bold()
        )?;
    } else {
        write!(out, "{} {question} ", settings::PROMPT_QUESTION_GLYPH)?;
    }
    out.flush()
}

fn write_answer<W: Write>(
    out: &mut W,
    color: bool,
    question: &str,
    answer: &str,
) -> io::Result<()> {
    write_question(out, color, question)?;
    if color {
        writeln!(out, "{}", answer.with(settings::COLOR_PICKER_ACTIVE_TEXT))
    } else {
        writeln!(out, "{answer}")
    }
}

/// Interactive list picker; returns the selected index, or `None` on
/// Esc/Ctrl-C.
pub fn pick_from_list(
    color: bool,
    title: &str,
    help: &str,
    options: &[String],
    initial_selection: usize,
) -> io::Result<Option<usize>> {
    if options.is_empty() {
        return Ok(None);
    }
    let _guard = RawModeGuard::acquire()?;
    let mut stderr = io::stderr();
    let mut selected = initial_selection.min(options.len() - 1);
    let mut previous_rows = 0usize;

    loop {
        previous_rows = render_picker(
            &mut stderr,
            color,
            title,
            help,
            options,
            selected,
            previous_rows,
        )?;

        if !event::poll(Duration::from_millis(settings::PICKER_EVENT_POLL_MS))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
            continue;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                selected = selected.checked_sub(1).unwrap_or(options.len() - 1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                selected = (selected + 1) % options.len();
            }
            KeyCode::Enter => {
                clear_surface(&mut stderr, previous_rows)?;
                return Ok(Some(selected));
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                clear_surface(&mut stderr, previous_rows)?;
                return Ok(None);
            }
            KeyCode::Esc => {
                clear_surface(&mut stderr, previous_rows)?;
                return Ok(None);
            }
            _ => {}
        }
    }
}

/// Draw picker chrome and options; returns the row index of the last line.
fn render_picker(
    stderr: &mut io::Stderr,
    color: bool,
    title: &str,
    help: &str,
    options: &[String],
    selected: usize,
    previous_rows: usize,
) -> io::Result<usize> {
    if previous_rows > 0 {
        stderr.queue(MoveUp(previous_rows as u16))?;
    }
    stderr.queue(MoveToColumn(0))?;
    stderr.queue(Clear(ClearType::FromCursorDown))?;

    let cols = terminal_columns();
    let title_plain = format!("{} {title}", settings::PROMPT_QUESTION_GLYPH);
    let help_plain = format!("{}{help}", settings::INDENT_1);
    let mut total_rows = wrapped_rows(&title_plain, cols) + wrapped_rows(&help_plain, cols);
    if color {
        stderr.queue(PrintStyledContent(
            settings::PROMPT_QUESTION_GLYPH
                .with(settings::COLOR_QUESTION_GLYPH)
                .bold(),
        ))?;
        stderr.queue(Print(" "))?;
        stderr.queue(PrintStyledContent(
            title.with(settings::COLOR_QUESTION_TEXT).bold(),
        ))?;
        stderr.queue(Print("\r\n"))?;
        stderr.queue(PrintStyledContent(
            help_plain.as_str().with(settings::COLOR_FIELD_KEY),
        ))?;
    } else {
        stderr.queue(Print(&title_plain))?;
        stderr.queue(Print("\r\n"))?;
        stderr.queue(Print(&help_plain))?;
    }

    for (idx, option) in options.iter().enumerate() {
        let active = idx == selected;
        let marker = if active {
            settings::GLYPH_PICKER_SELECTED
        } else {
            settings::GLYPH_PICKER_UNSELECTED
        };
        let line_plain = format!("{}{marker} {option}", settings::INDENT_1);
        stderr.queue(Print("\r\n"))?;
        total_rows += wrapped_rows(&line_plain, cols);
        if color {
            let (marker_color, text_color) = if active {
                (settings::COLOR_PICKER_SELECTED, settings::COLOR_PICKER_ACTIVE_TEXT)
            } else {
                (settings::COLOR_PICKER_UNSELECTED, settings::COLOR_FIELD_VALUE)
            };
            stderr.queue(Print(settings::INDENT_1))?;
            stderr.queue(PrintStyledContent(marker.with(marker_color)))?;
            stderr.queue(Print(" "))?;
            stderr.queue(PrintStyledContent(option.as_str().with(text_color)))?;
        } else {
            stderr.queue(Print(&line_plain))?;
        }
    }

    stderr.flush()?;
    Ok(total_rows.saturating_sub(1))
}

fn clear_surface(stderr: &mut io::Stderr, previous_rows: usize) -> io::Result<()> {
    if previous_rows > 0 {
        stderr.queue(MoveUp(previous_rows as u16))?;
    }
    stderr.queue(MoveToColumn(0))?;
    stderr.queue(Clear(ClearType::FromCursorDown))?;
    stderr.flush()
}

fn terminal_columns() -> usize {
    terminal::size()
        .ok()
        .map(|(cols, _)| cols as usize)
        .filter(|cols| *cols > 0)
        .unwrap_or(80)
}

/// Terminal rows consumed by one line of text at `cols` width.
fn wrapped_rows(text: &str, cols: usize) -> usize {
    text.chars().count().div_ceil(cols.max(1)).max(1)
}

/// Raw mode lifetime guard so terminal state is restored on any return path.
struct RawModeGuard;

impl RawModeGuard {
    fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHOICES: [&str; 4] = ["red", "blue", "pink", "green"];

    #[test]
    fn fallback_choice_accepts_numbers_and_names() {
        assert_eq!(resolve_fallback_choice(&CHOICES, "2\n"), Some("blue".into()));
        assert_eq!(resolve_fallback_choice(&CHOICES, " pink "), Some("pink".into()));
    }

    #[test]
    fn fallback_choice_passes_unknown_text_through() {
        assert_eq!(resolve_fallback_choice(&CHOICES, "teal"), Some("teal".into()));
        assert_eq!(resolve_fallback_choice(&CHOICES, "9"), Some("9".into()));
    }

    #[test]
    fn blank_fallback_choice_cancels() {
        assert_eq!(resolve_fallback_choice(&CHOICES, "  \n"), None);
    }

    #[test]
    fn read_line_strips_newline_and_reports_eof() {
        let mut input = io::Cursor::new(b"octocat\r\n".to_vec());
        assert_eq!(read_line(&mut input).unwrap(), Some("octocat".into()));
        assert_eq!(read_line(&mut input).unwrap(), None);
    }

    #[test]
    fn plain_question_has_glyph_and_trailing_space() {
        let mut out = Vec::new();
        write_question(&mut out, false, settings::PROMPT_USERNAME).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "? What is your GitHub username? "
        );
    }

    #[test]
    fn terminal_failures_cancel_the_prompt() {
        for kind in [io::ErrorKind::BrokenPipe, io::ErrorKind::Interrupted] {
            let err = prompt_io_error(io::Error::new(kind, "tty gone"));
            assert!(matches!(err, AppError::PromptCancelled), "got: {err}");
            assert_eq!(err.exit_code(), 130);
        }
    }

    #[test]
    fn wrapped_rows_rounds_up() {
        assert_eq!(wrapped_rows("", 80), 1);
        assert_eq!(wrapped_rows("abcd", 4), 1);
        assert_eq!(wrapped_rows("abcde", 4), 2);
    }
}
