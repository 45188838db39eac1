//! Plain-text report formatting.
//!
//! A report line looks like
//!
//! ```text
//! <indent><activity><padding>  <subject> [from '<context>'] [to '<target>']
//! ```
//!
//! where `<indent>` is [`ReportFormatter::SPACING`] repeated once per nesting
//! level and the activity column is [`ReportFormatter::ACTIVITY_MAXLEN`]
//! characters wide.

use std::fmt;
use std::path::PathBuf;

use super::{LogRecord, RecordKind, Severity, path};

/// Turns a [`LogRecord`] into one line of text.
///
/// Every step has a provided implementation producing plain text;
/// [`ColoredReportFormatter`](super::ColoredReportFormatter) overrides the
/// decoration hooks and inherits the layout.
pub trait LineFormatter: fmt::Debug + Send + Sync {
    /// Directory that paths are shortened against.
    ///
    /// `None` when it cannot be determined; paths are then left untouched.
    fn working_dir(&self) -> Option<PathBuf>;

    /// Spaces that bring `activity` up to the activity column width.
    fn create_padding(&self, activity: &str) -> String {
        let width = activity.chars().count();
        " ".repeat(ReportFormatter::ACTIVITY_MAXLEN.saturating_sub(width))
    }

    /// Shorten a path-like subject. Free text is returned as is.
    fn format_path(&self, subject: &str) -> String {
        match self.working_dir() {
            Some(cwd) => path::abbreviate(subject, &cwd),
            None => subject.to_string(),
        }
    }

    fn format_activity(&self, activity: &str) -> String {
        activity.to_string()
    }

    fn format_subject(&self, subject: &str, _activity: &str) -> String {
        self.format_path(subject)
    }

    fn target_prefix(&self) -> &str {
        ReportFormatter::TARGET_PREFIX
    }

    fn context_prefix(&self) -> &str {
        ReportFormatter::CONTEXT_PREFIX
    }

    /// `to '<path>'`, or nothing for a missing target or the working dir.
    fn format_target(&self, target: Option<&str>) -> String {
        self.format_location(self.target_prefix(), target)
    }

    /// `from '<path>'`, or nothing for a missing context or the working dir.
    fn format_context(&self, context: Option<&str>) -> String {
        self.format_location(self.context_prefix(), context)
    }

    fn format_location(&self, prefix: &str, location: Option<&str>) -> String {
        let Some(location) = location.filter(|l| !l.is_empty()) else {
            return String::new();
        };
        if let Some(cwd) = self.working_dir() {
            if path::is_current(location, &cwd) {
                return String::new();
            }
        }
        format!("{prefix} '{}'", self.format_path(location))
    }

    /// Decoration applied to the text of a raw (severity) call.
    fn format_message(&self, _level: Severity, message: &str) -> String {
        message.to_string()
    }

    fn format_report(
        &self,
        nesting: usize,
        activity: &str,
        subject: &str,
        context: Option<&str>,
        target: Option<&str>,
    ) -> String {
        let segments = [
            self.format_subject(subject, activity),
            self.format_context(context),
            self.format_target(target),
        ];
        let body = segments
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let mut line = indentation(nesting);
        line.push_str(&self.format_activity(activity));
        if body.is_empty() {
            return line;
        }
        line.push_str(&self.create_padding(activity));
        line.push_str(ReportFormatter::SPACING);
        line.push_str(&body);
        line
    }

    fn format_raw(&self, nesting: usize, level: Severity, message: &str) -> String {
        let mut line = indentation(nesting);
        line.push_str(&self.format_message(level, message));
        line
    }

    fn format(&self, record: &LogRecord<'_>) -> String {
        match record.kind {
            RecordKind::Report {
                activity,
                subject,
                context,
                target,
            } => self.format_report(record.nesting, activity, subject, context, target),
            RecordKind::Raw { message } => self.format_raw(record.nesting, record.level, message),
        }
    }
}

/// [`ReportFormatter::SPACING`] once per nesting level.
pub fn indentation(nesting: usize) -> String {
    ReportFormatter::SPACING.repeat(nesting)
}

/// The plain formatter.
///
/// Paths are shortened against the process working directory at call time,
/// unless a directory was pinned with [`ReportFormatter::with_working_dir`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFormatter {
    working_dir: Option<PathBuf>,
}

impl ReportFormatter {
    /// Width of the activity column.
    pub const ACTIVITY_MAXLEN: usize = 12;
    /// One nesting level, and the gap between activity column and subject.
    pub const SPACING: &'static str = "  ";
    pub const CONTEXT_PREFIX: &'static str = "from";
    pub const TARGET_PREFIX: &'static str = "to";

    pub fn new() -> Self {
        Self::default()
    }

    /// Shorten paths against `dir` instead of the process working directory.
    pub fn with_working_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
        }
    }
}

impl LineFormatter for ReportFormatter {
    fn working_dir(&self) -> Option<PathBuf> {
        self.working_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
    }
}
