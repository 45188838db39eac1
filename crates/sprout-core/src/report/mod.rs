//! Human-readable progress reporting.
//!
//! Every action of the scaffolding pipeline is reported as one line:
//!
//! ```text
//! invoke        define_structure
//!   create        my-project/README.md
//!   skip          my-project/.travis.yml
//! invoke        init_git
//!   run           git init from 'my-project'
//! ```
//!
//! * [`ReportFormatter`] / [`ColoredReportFormatter`] turn a [`LogRecord`]
//!   into text.
//! * [`Sink`] holds the threshold and the [`Handler`] that writes lines.
//! * [`ReportLogger`] tracks nesting and ties the two together.
//!
//! The logger is created once at process entry ([`ReportLogger::default`]),
//! configured with [`configure_logger`] and passed down by reference.

mod colored;
mod formatter;
mod logger;
mod path;
mod record;
mod severity;
mod sink;

pub use colored::{CONTEXT_PREFIX, ColoredReportFormatter, TARGET_PREFIX};
pub use formatter::{LineFormatter, ReportFormatter, indentation};
pub use logger::{
    IndentGuard, LogOptions, ReportLogger, ReportLoggerBuilder, ReportOptions, configure_logger,
};
pub use record::{LogRecord, RecordKind};
pub use severity::{ParseSeverityError, Severity};
pub use sink::{
    CaptureHandler, CapturedLine, DEFAULT_LOGGER, Handler, NullHandler, Sink, StreamHandler,
    default_sink,
};
