//! UI utilities for terminal output
//!
//! Progress spinners, hints and the interactive prompts used by the
//! context commands.

mod hint;
mod prompt;
mod spinner;

pub use hint::{bold, format_timestamp, print_hint};
#[cfg(test)]
pub(crate) use prompt::scripted::ScriptedPrompter;
pub use prompt::{Prompter, TerminalPrompter};
pub use spinner::{clear_spinner, create_spinner, finish_spinner};
