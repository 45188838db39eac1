//! Application layer for Sprout.
//!
//! - **Pipeline**: the ordered, extensible list of actions
//! - **Actions**: the built-in steps
//! - **Extensions**: optional steps plugged into the pipeline
//! - **Ports**: traits for everything that touches the outside world
//! - **Service**: [`ScaffoldService`], the use case the CLI drives

pub mod actions;
pub mod extensions;
pub mod pipeline;
pub mod ports;
mod service;

pub use extensions::{Extension, Travis};
pub use pipeline::{Action, ActionFn, Pipeline, Position, ScaffoldContext};
pub use ports::{Filesystem, ShellCommand, ShellRunner, TemplateSource};
pub use service::ScaffoldService;
