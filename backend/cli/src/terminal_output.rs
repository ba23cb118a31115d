//! Terminal output: ANSI notes on stderr and Markdown on stdout.
//!
//! Notes never touch stdout, so `markscan scan page.png > page.md` captures
//! only the transcription.

use std::io::Write;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

fn note(symbol: &str, color: &str, label: &str, msg: &str) -> String {
    if supports_color() {
        format!("{color}{BOLD}{symbol}{RESET} {msg}")
    } else {
        format!("{label}: {msg}")
    }
}

/// Print a formatted INFO note.
pub fn note_info(msg: &str) {
    eprintln!("{}", note("ℹ", CYAN, "INFO", msg));
}

/// Print a formatted WARNING note.
pub fn note_warn(msg: &str) {
    eprintln!("{}", note("⚠", YELLOW, "WARN", msg));
}

/// Print a formatted ERROR note.
pub fn note_error(msg: &str) {
    eprintln!("{}", note("✗", RED, "ERROR", msg));
}

/// Print a formatted SUCCESS note.
pub fn note_success(msg: &str) {
    eprintln!("{}", note("✓", GREEN, "OK", msg));
}

/// Dimmed heading shown above a result block.
pub fn heading(title: &str) -> String {
    if supports_color() {
        format!("{DIM}{title}{RESET}")
    } else {
        title.to_string()
    }
}

/// Write Markdown to `writer` with a trailing newline, then flush.
pub fn write_markdown(writer: &mut impl Write, markdown: &str) -> std::io::Result<()> {
    writer.write_all(markdown.as_bytes())?;
    if !markdown.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
