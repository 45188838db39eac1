//! Sprout Core - project scaffolding with nested progress reports.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           sprout-cli (CLI)              │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   ScaffoldService → Pipeline → Actions  │──── reports ───▶ ReportLogger
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │  Ports (Filesystem, ShellRunner, ...)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       sprout-adapters (Infrastructure)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sprout_core::prelude::*;
//! # fn service() -> ScaffoldService { unimplemented!() }
//!
//! let mut logger = ReportLogger::default();
//! configure_logger(&mut logger, &LogOptions::default());
//!
//! let opts = ScaffoldOpts::new("my-project").extension("travis");
//! service().create_project(opts, &logger).unwrap();
//! ```

pub mod application;
pub mod domain;
pub mod error;
pub mod report;

pub mod prelude {
    pub use crate::application::{
        Extension, Pipeline, Position, ScaffoldService,
        ports::{Filesystem, ShellCommand, ShellRunner, TemplateSource},
    };
    pub use crate::domain::{FilePolicy, FileSpec, Node, RenderContext, ScaffoldOpts, Structure};
    pub use crate::error::{SproutError, SproutResult};
    pub use crate::report::{LogOptions, ReportLogger, Severity, configure_logger};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
