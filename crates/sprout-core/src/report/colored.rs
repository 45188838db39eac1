//! ANSI-decorated report formatting.
//!
//! Whether the terminal can display colours is decided once, by whoever
//! picks the formatter (see [`ReportLogger::reconfigure`](super::ReportLogger::reconfigure)).
//! This formatter always emits escape sequences.

use std::path::PathBuf;
use std::sync::LazyLock;

use owo_colors::{OwoColorize, Style};

use super::{LineFormatter, ReportFormatter, Severity};

/// Styled `to` marker used in front of report targets.
pub static TARGET_PREFIX: LazyLock<String> =
    LazyLock::new(|| decorate(ReportFormatter::TARGET_PREFIX, marker_style()));

/// Styled `from` marker used in front of report contexts.
pub static CONTEXT_PREFIX: LazyLock<String> =
    LazyLock::new(|| decorate(ReportFormatter::CONTEXT_PREFIX, marker_style()));

fn marker_style() -> Style {
    Style::new().magenta().bold()
}

fn activity_style(activity: &str) -> Style {
    match activity {
        "create" | "move" => Style::new().green().bold(),
        "remove" | "delete" => Style::new().red().bold(),
        "skip" => Style::new().yellow().bold(),
        "run" => Style::new().magenta().bold(),
        _ => Style::new().bold(),
    }
}

fn subject_style(activity: &str) -> Option<Style> {
    match activity {
        "invoke" => Some(Style::new().blue()),
        _ => None,
    }
}

fn severity_style(level: Severity) -> Style {
    match level {
        Severity::Debug => Style::new().green(),
        Severity::Info => Style::new().blue(),
        Severity::Warning => Style::new().yellow(),
        Severity::Error => Style::new().red(),
        Severity::Critical => Style::new().red().bold(),
    }
}

fn decorate(text: &str, style: Style) -> String {
    text.style(style).to_string()
}

/// [`ReportFormatter`] with colours.
///
/// Layout, padding and path shortening are inherited; only the text of the
/// activity, subject, location markers and raw messages is styled. Padding
/// is computed on the unstyled activity and never styled itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColoredReportFormatter {
    plain: ReportFormatter,
}

impl ColoredReportFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_working_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            plain: ReportFormatter::with_working_dir(dir),
        }
    }
}

impl LineFormatter for ColoredReportFormatter {
    fn working_dir(&self) -> Option<PathBuf> {
        self.plain.working_dir()
    }

    fn format_activity(&self, activity: &str) -> String {
        decorate(activity, activity_style(activity))
    }

    fn format_subject(&self, subject: &str, activity: &str) -> String {
        let subject = self.format_path(subject);
        match subject_style(activity) {
            Some(style) if !subject.is_empty() => decorate(&subject, style),
            _ => subject,
        }
    }

    fn target_prefix(&self) -> &str {
        &TARGET_PREFIX
    }

    fn context_prefix(&self) -> &str {
        &CONTEXT_PREFIX
    }

    fn format_message(&self, level: Severity, message: &str) -> String {
        decorate(message, severity_style(level))
    }
}
