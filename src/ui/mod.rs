//! Terminal-facing UI: status rendering and interactive prompts.

pub mod input;
pub mod render;
pub mod settings;

pub use input::TerminalPrompter;
pub use render::{RenderSink, Renderer};
