//! Where formatted lines end up.
//!
//! A [`Sink`] is the shared, named destination behind one or more
//! [`ReportLogger`](super::ReportLogger)s. It owns the severity threshold
//! and the active [`Handler`]; loggers only add nesting and formatting.

use std::fmt;
use std::io;
use std::sync::{Arc, LazyLock, Mutex, PoisonError, RwLock};

use console::Term;

use super::Severity;

/// Name of the process-wide default sink.
pub const DEFAULT_LOGGER: &str = "sprout.report";

static DEFAULT_SINK: LazyLock<Arc<Sink>> =
    LazyLock::new(|| Arc::new(Sink::new(DEFAULT_LOGGER, Arc::new(StreamHandler::stderr()))));

/// The process-wide default sink: stderr, threshold INFO.
///
/// Every call returns the same instance.
pub fn default_sink() -> Arc<Sink> {
    Arc::clone(&DEFAULT_SINK)
}

/// Writes finished lines somewhere.
pub trait Handler: fmt::Debug + Send + Sync {
    /// Write one line. The handler appends the line terminator.
    fn emit(&self, level: Severity, line: &str) -> io::Result<()>;

    /// Whether the underlying stream can render ANSI colours.
    fn supports_color(&self) -> bool {
        false
    }
}

/// Writes to a terminal stream (stderr by default).
#[derive(Debug, Clone)]
pub struct StreamHandler {
    term: Term,
}

impl StreamHandler {
    pub fn stderr() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for StreamHandler {
    fn default() -> Self {
        Self::stderr()
    }
}

impl Handler for StreamHandler {
    fn emit(&self, _level: Severity, line: &str) -> io::Result<()> {
        self.term.write_line(line)
    }

    fn supports_color(&self) -> bool {
        self.term.features().colors_supported()
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHandler;

impl Handler for NullHandler {
    fn emit(&self, _level: Severity, _line: &str) -> io::Result<()> {
        Ok(())
    }
}

/// One line kept by a [`CaptureHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLine {
    pub level: Severity,
    pub line: String,
}

/// Keeps emitted lines in memory.
///
/// Used by tests and by callers that want to inspect the report afterwards.
#[derive(Debug, Default)]
pub struct CaptureHandler {
    lines: Mutex<Vec<CapturedLine>>,
    color: bool,
}

impl CaptureHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capture handler that claims colour support.
    pub fn with_color() -> Self {
        Self {
            lines: Mutex::default(),
            color: true,
        }
    }

    pub fn records(&self) -> Vec<CapturedLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.line).collect()
    }

    /// Everything captured, one line per record, newline-terminated.
    pub fn text(&self) -> String {
        self.lines().iter().map(|l| format!("{l}\n")).collect()
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Handler for CaptureHandler {
    fn emit(&self, level: Severity, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedLine {
                level,
                line: line.to_string(),
            });
        Ok(())
    }

    fn supports_color(&self) -> bool {
        self.color
    }
}

/// Named destination shared by report loggers.
#[derive(Debug)]
pub struct Sink {
    name: String,
    level: RwLock<Severity>,
    handler: RwLock<Arc<dyn Handler>>,
}

impl Sink {
    /// A sink with threshold INFO.
    pub fn new(name: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
        Self {
            name: name.into(),
            level: RwLock::new(Severity::Info),
            handler: RwLock::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Severity {
        *self.level.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_level(&self, level: Severity) {
        *self.level.write().unwrap_or_else(PoisonError::into_inner) = level;
    }

    pub fn is_enabled_for(&self, level: Severity) -> bool {
        level >= self.level()
    }

    pub fn handler(&self) -> Arc<dyn Handler> {
        Arc::clone(&self.handler.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn set_handler(&self, handler: Arc<dyn Handler>) {
        *self.handler.write().unwrap_or_else(PoisonError::into_inner) = handler;
    }

    /// Hand `line` to the handler if `level` passes the threshold.
    pub fn emit(&self, level: Severity, line: &str) -> io::Result<()> {
        if !self.is_enabled_for(level) {
            return Ok(());
        }
        self.handler().emit(level, line)
    }
}
