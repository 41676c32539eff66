//! Hardcoded terminal UI settings: prompt strings, glyphs, and colors.

use crossterm::style::Color;

// ---------------------------------------------------------------------------
// Layout / prompt strings
// ---------------------------------------------------------------------------

pub const INDENT_1: &str = "  ";

pub const PROMPT_USERNAME: &str = "What is your GitHub username?";
pub const PROMPT_COLOR: &str = "What's your favorite color?";
pub const PROMPT_COLOR_HELP: &str = "Use ↑/↓ to pick, Enter to confirm, Esc to cancel.";
pub const PROMPT_QUESTION_GLYPH: &str = "?";
pub const PROMPT_PICK_FALLBACK: &str = "pick a number or name: ";

pub const LABEL_WARNING: &str = "warning:";
pub const LABEL_ERROR: &str = "error:";

pub const GLYPH_SECTION_BULLET: &str = "•";
pub const GLYPH_PICKER_SELECTED: &str = "▶";
pub const GLYPH_PICKER_UNSELECTED: &str = "·";

pub const PICKER_EVENT_POLL_MS: u64 = 80;

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

pub const COLOR_QUESTION_GLYPH: Color = Color::Green;
pub const COLOR_QUESTION_TEXT: Color = Color::White;
pub const COLOR_ACTIVITY_TEXT: Color = Color::DarkGrey;
pub const COLOR_WARNING: Color = Color::Yellow;
pub const COLOR_ERROR: Color = Color::Red;
pub const COLOR_SECTION_BULLET: Color = Color::DarkGrey;
pub const COLOR_SECTION_TITLE: Color = Color::Cyan;
pub const COLOR_FIELD_KEY: Color = Color::DarkGrey;
pub const COLOR_FIELD_VALUE: Color = Color::White;
pub const COLOR_PICKER_SELECTED: Color = Color::DarkYellow;
pub const COLOR_PICKER_UNSELECTED: Color = Color::DarkGrey;
pub const COLOR_PICKER_ACTIVE_TEXT: Color = Color::Yellow;
