//! The transient value handed from a [`ReportLogger`](super::ReportLogger)
//! to its formatter.

use super::Severity;

/// What a record carries: a structured report or a plain message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind<'a> {
    /// `activity subject [from context] [to target]`
    Report {
        activity: &'a str,
        subject: &'a str,
        context: Option<&'a str>,
        target: Option<&'a str>,
    },
    /// A severity call (`debug`, `info`, ...). Only indentation is applied.
    Raw { message: &'a str },
}

/// One log line before formatting.
///
/// Built per call, borrowed by the formatter and dropped right after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord<'a> {
    pub level: Severity,
    pub nesting: usize,
    pub kind: RecordKind<'a>,
}

impl<'a> LogRecord<'a> {
    /// A report record at INFO level and nesting 0.
    pub fn report(activity: &'a str, subject: &'a str) -> Self {
        Self {
            level: Severity::Info,
            nesting: 0,
            kind: RecordKind::Report {
                activity,
                subject,
                context: None,
                target: None,
            },
        }
    }

    /// A raw record at the given level and nesting 0.
    pub fn raw(level: Severity, message: &'a str) -> Self {
        Self {
            level,
            nesting: 0,
            kind: RecordKind::Raw { message },
        }
    }

    pub fn with_nesting(mut self, nesting: usize) -> Self {
        self.nesting = nesting;
        self
    }

    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Set the "from" location. No effect on raw records.
    pub fn with_context(mut self, path: Option<&'a str>) -> Self {
        if let RecordKind::Report { context, .. } = &mut self.kind {
            *context = path;
        }
        self
    }

    /// Set the "to" location. No effect on raw records.
    pub fn with_target(mut self, path: Option<&'a str>) -> Self {
        if let RecordKind::Report { target, .. } = &mut self.kind {
            *target = path;
        }
        self
    }
}
