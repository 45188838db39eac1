//! The nesting-aware report logger.

use std::cell::Cell;
use std::fmt;
use std::io;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    ColoredReportFormatter, Handler, LineFormatter, LogRecord, ReportFormatter, Severity, Sink,
    default_sink,
};

/// Optional parts of a report call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions<'a> {
    /// The "from" location.
    pub context: Option<&'a str>,
    /// The "to" location.
    pub target: Option<&'a str>,
    /// Use this nesting instead of the logger's current one.
    pub nesting: Option<usize>,
    /// Severity of the line, INFO when unset.
    pub level: Option<Severity>,
}

impl<'a> ReportOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(mut self, context: &'a str) -> Self {
        self.context = Some(context);
        self
    }

    pub fn target(mut self, target: &'a str) -> Self {
        self.target = Some(target);
        self
    }

    pub fn nesting(mut self, nesting: usize) -> Self {
        self.nesting = Some(nesting);
        self
    }

    pub fn level(mut self, level: Severity) -> Self {
        self.level = Some(level);
        self
    }
}

/// Settings applied by [`configure_logger`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogOptions {
    pub log_level: Severity,
    pub no_color: bool,
}

/// Reports scaffolding progress as indented, human-readable lines.
///
/// A logger wraps a shared [`Sink`] (threshold and handler), holds a
/// formatter and owns its nesting counter. The counter only changes through
/// [`indent`](Self::indent) guards, so each [`copy`](Self::copy) keeps an
/// independent depth while still writing to the same sink.
///
/// The counter is a [`Cell`]: a logger can be moved to another thread but not
/// shared between threads.
///
/// ```
/// use std::sync::Arc;
/// use sprout_core::report::{CaptureHandler, ReportLogger, Sink};
///
/// let capture = Arc::new(CaptureHandler::new());
/// let logger = ReportLogger::new(Arc::new(Sink::new("doc", capture.clone())));
///
/// logger.report("invoke", "define_structure").unwrap();
/// {
///     let _guard = logger.indent_one();
///     logger.info("one level deeper").unwrap();
/// }
/// assert_eq!(capture.lines()[1], "  one level deeper");
/// ```
#[derive(Debug)]
pub struct ReportLogger {
    sink: Arc<Sink>,
    formatter: Arc<dyn LineFormatter>,
    nesting: Cell<usize>,
}

impl ReportLogger {
    /// A logger over `sink` with the plain formatter.
    pub fn new(sink: Arc<Sink>) -> Self {
        Self::builder().sink(sink).build()
    }

    pub fn builder() -> ReportLoggerBuilder {
        ReportLoggerBuilder::default()
    }

    pub fn sink(&self) -> &Arc<Sink> {
        &self.sink
    }

    /// The handler currently installed on the sink.
    pub fn handler(&self) -> Arc<dyn Handler> {
        self.sink.handler()
    }

    pub fn formatter(&self) -> &Arc<dyn LineFormatter> {
        &self.formatter
    }

    pub fn nesting(&self) -> usize {
        self.nesting.get()
    }

    /// Threshold of the underlying sink.
    pub fn level(&self) -> Severity {
        self.sink.level()
    }

    /// Change the threshold of the underlying sink, for every logger on it.
    pub fn set_level(&self, level: Severity) {
        self.sink.set_level(level);
    }

    /// Report `activity` on `subject` at INFO level.
    pub fn report(&self, activity: &str, subject: &str) -> io::Result<()> {
        self.report_with(activity, subject, ReportOptions::default())
    }

    /// Report with a context, target, nesting or level.
    ///
    /// Nothing is formatted when the sink would drop the line anyway.
    pub fn report_with(
        &self,
        activity: &str,
        subject: &str,
        options: ReportOptions<'_>,
    ) -> io::Result<()> {
        let level = options.level.unwrap_or(Severity::Info);
        if !self.sink.is_enabled_for(level) {
            return Ok(());
        }

        let record = LogRecord::report(activity, subject)
            .with_level(level)
            .with_nesting(options.nesting.unwrap_or_else(|| self.nesting()))
            .with_context(options.context)
            .with_target(options.target);

        self.sink.emit(level, &self.formatter.format(&record))
    }

    /// Emit a raw line: indentation only, no report layout.
    pub fn log(&self, level: Severity, message: impl fmt::Display) -> io::Result<()> {
        if !self.sink.is_enabled_for(level) {
            return Ok(());
        }

        let message = message.to_string();
        let record = LogRecord::raw(level, &message).with_nesting(self.nesting());
        self.sink.emit(level, &self.formatter.format(&record))
    }

    pub fn debug(&self, message: impl fmt::Display) -> io::Result<()> {
        self.log(Severity::Debug, message)
    }

    pub fn info(&self, message: impl fmt::Display) -> io::Result<()> {
        self.log(Severity::Info, message)
    }

    pub fn warning(&self, message: impl fmt::Display) -> io::Result<()> {
        self.log(Severity::Warning, message)
    }

    pub fn error(&self, message: impl fmt::Display) -> io::Result<()> {
        self.log(Severity::Error, message)
    }

    pub fn critical(&self, message: impl fmt::Display) -> io::Result<()> {
        self.log(Severity::Critical, message)
    }

    /// Nest everything reported while the returned guard is alive `count`
    /// levels deeper.
    pub fn indent(&self, count: usize) -> IndentGuard<'_> {
        self.nesting.set(self.nesting.get().saturating_add(count));
        IndentGuard {
            logger: self,
            count,
        }
    }

    /// `indent(1)`.
    pub fn indent_one(&self) -> IndentGuard<'_> {
        self.indent(1)
    }

    /// A logger on the same sink and formatter, starting at the current
    /// nesting and evolving independently afterwards.
    pub fn copy(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            formatter: Arc::clone(&self.formatter),
            nesting: Cell::new(self.nesting()),
        }
    }

    /// Apply `options`, probing the handler for colour support.
    pub fn reconfigure(&mut self, options: &LogOptions) {
        self.reconfigure_with(options, |handler| handler.supports_color());
    }

    /// Apply `options` with an explicit colour-support check.
    ///
    /// Sets the sink threshold, then installs [`ColoredReportFormatter`]
    /// if colours are wanted and supported, [`ReportFormatter`] otherwise.
    /// Copies taken before this call keep their formatter.
    pub fn reconfigure_with<F>(&mut self, options: &LogOptions, supports_color: F)
    where
        F: FnOnce(&dyn Handler) -> bool,
    {
        self.set_level(options.log_level);

        let handler = self.sink.handler();
        let colored = !options.no_color && supports_color(handler.as_ref());
        self.formatter = if colored {
            Arc::new(ColoredReportFormatter::new())
        } else {
            Arc::new(ReportFormatter::new())
        };

        debug!(
            sink = self.sink.name(),
            level = %options.log_level,
            colored,
            "report logger configured"
        );
    }
}

impl Clone for ReportLogger {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl Default for ReportLogger {
    /// A logger over the process-wide [`default_sink`].
    fn default() -> Self {
        Self::new(default_sink())
    }
}

/// Configure the logger created at process entry.
///
/// Meant to run once per process, before the logger is copied.
pub fn configure_logger(logger: &mut ReportLogger, options: &LogOptions) {
    logger.reconfigure(options);
}

/// Builder for [`ReportLogger`].
#[derive(Debug, Default)]
pub struct ReportLoggerBuilder {
    sink: Option<Arc<Sink>>,
    handler: Option<Arc<dyn Handler>>,
    formatter: Option<Arc<dyn LineFormatter>>,
}

impl ReportLoggerBuilder {
    /// Sink to write to. Defaults to [`default_sink`].
    pub fn sink(mut self, sink: Arc<Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Handler to install on the sink when building.
    pub fn handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Formatter to use. Defaults to [`ReportFormatter`].
    pub fn formatter(mut self, formatter: Arc<dyn LineFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn build(self) -> ReportLogger {
        let sink = self.sink.unwrap_or_else(default_sink);
        if let Some(handler) = self.handler {
            sink.set_handler(handler);
        }

        ReportLogger {
            sink,
            formatter: self
                .formatter
                .unwrap_or_else(|| Arc::new(ReportFormatter::new())),
            nesting: Cell::new(0),
        }
    }
}

/// Keeps a logger indented; the indentation is removed on drop.
///
/// Dropping happens on every exit path of the enclosing scope, including
/// `?` returns and unwinding panics.
#[must_use = "the indentation is removed as soon as the guard is dropped"]
#[derive(Debug)]
pub struct IndentGuard<'a> {
    logger: &'a ReportLogger,
    count: usize,
}

impl IndentGuard<'_> {
    pub fn count(&self) -> usize {
        self.count
    }
}

impl Drop for IndentGuard<'_> {
    fn drop(&mut self) {
        let nesting = &self.logger.nesting;
        nesting.set(nesting.get().saturating_sub(self.count));
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};

    use super::*;
    use crate::report::{CaptureHandler, NullHandler};

    const SPACING: &str = ReportFormatter::SPACING;

    fn capture_logger(name: &str) -> (ReportLogger, Arc<CaptureHandler>) {
        let capture = Arc::new(CaptureHandler::new());
        let sink = Arc::new(Sink::new(name, capture.clone()));
        (ReportLogger::new(sink), capture)
    }

    /// Whitespace between the end of `activity` and `subject` in `line`.
    fn gap_after(line: &str, activity: &str, subject: &str) -> Option<usize> {
        let start = line.find(activity)? + activity.len();
        let rest = &line[start..];
        rest.ends_with(subject)
            .then(|| rest.len() - subject.len())
            .filter(|_| rest[..rest.len() - subject.len()].trim().is_empty())
    }

    fn ansi_wrapped(out: &str, text: &str) -> bool {
        out.match_indices(text).any(|(start, _)| {
            out[..start].ends_with('m') && out[start + text.len()..].starts_with("\x1b[")
        })
    }

    #[test]
    fn report_relativizes_subjects() {
        let dir = tempfile::tempdir().unwrap();
        let capture = Arc::new(CaptureHandler::new());
        let logger = ReportLogger::builder()
            .sink(Arc::new(Sink::new("relativize", capture.clone())))
            .formatter(Arc::new(ReportFormatter::with_working_dir(dir.path())))
            .build();

        let subject = dir.path().join("report");
        logger.report("make", &subject.display().to_string()).unwrap();

        let line = &capture.lines()[0];
        assert!(gap_after(line, "make", "report").is_some(), "{line}");
        assert!(!line.contains(&dir.path().display().to_string()));
        assert_eq!(capture.records()[0].level, Severity::Info);
    }

    #[test]
    fn report_is_dropped_below_threshold() {
        let (logger, capture) = capture_logger("threshold");
        logger.set_level(Severity::Warning);

        logger.report("make", "thing").unwrap();
        assert!(capture.lines().is_empty());

        logger
            .report_with("make", "thing", ReportOptions::new().level(Severity::Error))
            .unwrap();
        assert_eq!(capture.lines().len(), 1);
    }

    #[test]
    fn level_proxies_the_sink() {
        let (logger, _capture) = capture_logger("proxy");
        assert_eq!(logger.level(), Severity::Info);
        logger.set_level(Severity::Debug);
        assert_eq!(logger.sink().level(), Severity::Debug);
    }

    #[test]
    fn indent_increases_spacing() {
        let (logger, capture) = capture_logger("indent");
        let base = logger.nesting();
        let activity_gap = ReportFormatter::ACTIVITY_MAXLEN - "make".len() + SPACING.len();

        {
            let _guard = logger.indent_one();
            logger.report("make", "first").unwrap();
        }
        let line = &capture.lines()[0];
        assert!(line.starts_with(&SPACING.repeat(base + 1)));
        assert_eq!(gap_after(line, "make", "first"), Some(activity_gap));

        {
            let _guard = logger.indent(5);
            logger.report("make", "second").unwrap();
        }
        let line = &capture.lines()[1];
        assert_eq!(
            line,
            &format!("{}make{}second", SPACING.repeat(base + 5), " ".repeat(activity_gap))
        );

        {
            let _guard = logger.indent(3);
            logger.info("third").unwrap();
        }
        assert_eq!(capture.lines()[2], format!("{}third", SPACING.repeat(base + 3)));
        assert_eq!(logger.nesting(), base);
    }

    #[test]
    fn nested_guards_unwind_in_order() {
        let (logger, _capture) = capture_logger("nested");
        let outer = logger.indent(2);
        {
            let inner = logger.indent(3);
            assert_eq!(inner.count(), 3);
            assert_eq!(logger.nesting(), 5);
        }
        assert_eq!(logger.nesting(), 2);
        drop(outer);
        assert_eq!(logger.nesting(), 0);
    }

    #[test]
    fn indent_round_trips_for_any_count() {
        let (logger, _capture) = capture_logger("round-trip");
        for count in [0, 1, 2, 7, 100] {
            let before = logger.nesting();
            {
                let _guard = logger.indent(count);
                assert_eq!(logger.nesting(), before + count);
            }
            assert_eq!(logger.nesting(), before);
        }
    }

    #[test]
    fn indent_is_restored_on_error() {
        let (logger, _capture) = capture_logger("error");

        fn failing_step(logger: &ReportLogger) -> Result<(), String> {
            let _guard = logger.indent(4);
            logger.report("run", "false").map_err(|e| e.to_string())?;
            Err("step failed".into())
        }

        assert!(failing_step(&logger).is_err());
        assert_eq!(logger.nesting(), 0);
    }

    #[test]
    fn indent_is_restored_on_panic() {
        let (logger, _capture) = capture_logger("panic");
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = logger.indent(2);
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(logger.nesting(), 0);
    }

    #[test]
    fn out_of_order_drops_never_go_negative() {
        let (logger, _capture) = capture_logger("clamp");
        let first = logger.indent(1);
        let second = logger.indent(5);
        drop(first);
        assert_eq!(logger.nesting(), 5);
        drop(second);
        assert_eq!(logger.nesting(), 0);
    }

    #[test]
    fn copies_have_independent_nesting() {
        let (logger, capture) = capture_logger("copy");
        let base = logger.nesting();
        let count = 3;

        let copy = {
            let _guard = logger.indent(count);
            logger.copy()
        };
        assert_eq!(copy.nesting(), base + count);

        {
            let _guard = logger.indent(7);
            logger.report("make", "/some/report").unwrap();
            copy.report("call", "from-copy").unwrap();
            assert_eq!(copy.nesting(), base + count);
        }

        {
            let _guard = copy.indent(2);
            assert_eq!(logger.nesting(), base);
        }

        // both loggers wrote through the same sink, each with its own depth
        let lines = capture.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(&format!("{}make", SPACING.repeat(base + 7))));
        assert!(lines[1].starts_with(&format!("{}call", SPACING.repeat(base + count))));
        assert!(Arc::ptr_eq(logger.sink(), copy.sink()));
    }

    #[test]
    fn clone_is_copy() {
        let (logger, _capture) = capture_logger("clone");
        let _guard = logger.indent(2);
        let clone = logger.clone();
        assert_eq!(clone.nesting(), 2);
        let _deeper = clone.indent_one();
        assert_eq!(logger.nesting(), 2);
    }

    #[test]
    fn severity_methods_bypass_report_layout() {
        let (logger, capture) = capture_logger("raw");
        logger.set_level(Severity::Debug);

        logger.debug("plain-debug").unwrap();
        logger.warning(format_args!("{} things", 3)).unwrap();
        logger.critical("stop").unwrap();

        let records = capture.records();
        assert_eq!(records[0].line, "plain-debug");
        assert_eq!(records[0].level, Severity::Debug);
        assert_eq!(records[1].line, "3 things");
        assert_eq!(records[2].level, Severity::Critical);
    }

    #[test]
    fn debug_is_hidden_at_info() {
        let (logger, capture) = capture_logger("hidden");
        logger.debug("nobody sees this").unwrap();
        logger.error("everybody sees this").unwrap();
        assert_eq!(capture.lines(), vec!["everybody sees this".to_string()]);
    }

    #[test]
    fn explicit_nesting_overrides_the_counter() {
        let (logger, capture) = capture_logger("override");
        logger
            .report_with("create", "x", ReportOptions::new().nesting(4))
            .unwrap();
        assert!(capture.lines()[0].starts_with(&SPACING.repeat(4)));
        assert_eq!(logger.nesting(), 0);
    }

    #[test]
    fn report_with_context_and_target() {
        let capture = Arc::new(CaptureHandler::new());
        let logger = ReportLogger::builder()
            .sink(Arc::new(Sink::new("locations", capture.clone())))
            .formatter(Arc::new(ReportFormatter::with_working_dir("/srv/app")))
            .build();

        logger
            .report_with(
                "move",
                "/srv/app/old.txt",
                ReportOptions::new().context("/srv").target("/srv/app/new.txt"),
            )
            .unwrap();

        assert!(capture.lines()[0].ends_with("old.txt from '..' to 'new.txt'"));
    }

    #[test]
    fn builder_installs_handler_on_sink() {
        let sink = Arc::new(Sink::new("handler", Arc::new(NullHandler)));
        let capture = Arc::new(CaptureHandler::new());
        let logger = ReportLogger::builder()
            .sink(sink.clone())
            .handler(capture.clone())
            .build();

        logger.info("routed").unwrap();
        assert_eq!(capture.lines(), vec!["routed".to_string()]);
    }

    #[test]
    fn builder_uses_given_formatter() {
        let capture = Arc::new(CaptureHandler::new());
        let logger = ReportLogger::builder()
            .sink(Arc::new(Sink::new("colored", capture.clone())))
            .formatter(Arc::new(ColoredReportFormatter::with_working_dir("/srv")))
            .build();

        logger.report("make", "artifact").unwrap();
        logger.set_level(Severity::Debug);
        logger.debug("chatter").unwrap();

        let lines = capture.lines();
        assert!(ansi_wrapped(&lines[0], "make"));
        assert!(lines[0].ends_with("artifact"));
        assert!(ansi_wrapped(&lines[1], "chatter"));
    }

    #[test]
    fn default_logger_wraps_the_default_sink() {
        let logger = ReportLogger::default();
        assert!(Arc::ptr_eq(logger.sink(), &default_sink()));
        assert_eq!(logger.nesting(), 0);
    }

    #[test]
    fn reconfigure_switches_to_colors_when_supported() {
        let (mut logger, capture) = capture_logger("configure");
        let before = logger.copy();

        logger.reconfigure_with(
            &LogOptions {
                log_level: Severity::Info,
                no_color: false,
            },
            |_| true,
        );

        logger.report("some", "name").unwrap();
        before.report("some", "name").unwrap();

        let lines = capture.lines();
        assert!(ansi_wrapped(&lines[0], "some"));
        // the copy taken earlier kept the plain formatter
        assert!(!lines[1].contains('\x1b'));
    }

    #[test]
    fn reconfigure_respects_no_color_and_color_support() {
        let (mut logger, capture) = capture_logger("no-color");
        logger.reconfigure_with(
            &LogOptions {
                log_level: Severity::Debug,
                no_color: true,
            },
            |_| true,
        );
        assert_eq!(logger.level(), Severity::Debug);
        logger.report("some", "name").unwrap();

        logger.reconfigure_with(&LogOptions::default(), |_| false);
        logger.report("some", "name").unwrap();

        assert!(capture.lines().iter().all(|l| !l.contains('\x1b')));
    }

    #[test]
    fn configure_logger_asks_the_handler_for_color() {
        let capture = Arc::new(CaptureHandler::with_color());
        let mut logger = ReportLogger::new(Arc::new(Sink::new("color", capture.clone())));

        configure_logger(&mut logger, &LogOptions::default());
        logger.report("run", "ls").unwrap();

        assert!(ansi_wrapped(&capture.lines()[0], "run"));
    }
}
