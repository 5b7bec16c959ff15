//! Progress spinner utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner with the given message
///
/// Returns `None` if quiet mode is enabled.
pub fn create_spinner(message: &str, quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg} ({elapsed})")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}

/// Stop the spinner, leaving `✓ message` in place of the ticking line
pub fn finish_spinner(spinner: Option<ProgressBar>, message: &str) {
    let Some(s) = spinner else {
        return;
    };
    if let Ok(style) = ProgressStyle::default_spinner().template("{prefix:.green} {msg}") {
        s.set_style(style);
    }
    s.set_prefix("✓");
    s.finish_with_message(message.to_string());
}

/// Remove the spinner line without leaving a message
pub fn clear_spinner(spinner: Option<ProgressBar>) {
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
}
