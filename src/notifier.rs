//! User facing notifications

use std::io::{IsTerminal, Write};

use anstyle::{AnsiColor, Reset, Style};

/// How prominent a notification is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Tells the user about the outcome of an action
pub trait Notifier {
    fn notify(&mut self, message: &str, severity: Severity);
}

const INFO_STYLE: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Blue)));
const ERROR_STYLE: Style = Style::new()
    .fg_color(Some(anstyle::Color::Ansi(AnsiColor::Red)))
    .bold();

/// Prints notifications to stderr, coloured when stderr is a terminal
#[derive(Debug)]
pub struct StderrNotifier {
    color: bool,
}

impl StderrNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            color: std::io::stderr().is_terminal(),
        }
    }
}

impl Default for StderrNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a notification line, e.g. `error: Missing variables: ${a}`
#[must_use]
pub fn format_notification(message: &str, severity: Severity, color: bool) -> String {
    let (tag, style) = match severity {
        Severity::Info => ("info", INFO_STYLE),
        Severity::Error => ("error", ERROR_STYLE),
    };
    if color {
        format!("{style}{tag}{Reset}: {message}")
    } else {
        format!("{tag}: {message}")
    }
}

impl Notifier for StderrNotifier {
    fn notify(&mut self, message: &str, severity: Severity) {
        let _ = writeln!(
            std::io::stderr(),
            "{}",
            format_notification(message, severity, self.color)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_notification() {
        assert_eq!(
            format_notification("Saved", Severity::Info, false),
            "info: Saved"
        );
        assert_eq!(
            format_notification("Broken", Severity::Error, false),
            "error: Broken"
        );
    }

    #[test]
    fn test_colored_notification_wraps_tag_only() {
        let line = format_notification("Broken", Severity::Error, true);
        assert!(line.starts_with('\x1b'));
        assert!(line.ends_with(": Broken"));
    }
}
