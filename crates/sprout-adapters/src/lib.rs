//! Infrastructure adapters for Sprout.
//!
//! Implements the ports defined in `sprout_core::application::ports`. All
//! I/O of the scaffolding pipeline lives here.

pub mod filesystem;
pub mod shell;
pub mod templates;

pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use shell::SystemShell;
pub use templates::{BuiltinTemplates, TEMPLATES_DIR_ENV};
