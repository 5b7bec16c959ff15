//! Plain terminal output helpers

use chrono::{Local, TimeZone};
use std::io::{self, IsTerminal};

/// Print `==> message`, bold with a green arrow on a terminal
pub fn print_hint(message: &str) {
    println!("{}", format_hint(message, io::stdout().is_terminal()));
}

fn format_hint(message: &str, color: bool) -> String {
    if color {
        format!("\x1b[1;32m==>\x1b[0m \x1b[1m{}\x1b[0m", message)
    } else {
        format!("==> {}", message)
    }
}

/// Wrap `text` in bold escapes
pub fn bold(text: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", text)
}

/// Unix seconds as `YYYY-MM-DD HH:MM:SS` local time
pub fn format_timestamp(ts: i64) -> String {
    match Local.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ts.to_string(),
    }
}
