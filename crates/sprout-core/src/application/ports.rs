//! Driven ports, implemented by `sprout-adapters`.
//!
//! Actions only reach the outside world through these traits, so the whole
//! pipeline can run against in-memory fakes.

use std::fmt;
use std::path::Path;

use crate::error::SproutResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `sprout_adapters::filesystem::LocalFilesystem` (production)
/// - `sprout_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> SproutResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> SproutResult<()>;

    fn set_permissions(&self, path: &Path, executable: bool) -> SproutResult<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> SproutResult<()>;
}

/// An external program invocation, e.g. `git init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ShellCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("git", args)
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Port for running external programs.
#[cfg_attr(test, mockall::automock)]
pub trait ShellRunner: Send + Sync {
    /// Run `command` inside `cwd` and return its standard output.
    ///
    /// A non-zero exit status is a `SproutError::ShellCommand`.
    fn run(&self, command: &ShellCommand, cwd: &Path) -> SproutResult<String>;

    /// Whether `program` can be started at all.
    fn is_available(&self, program: &str) -> bool;
}

/// Port for looking up file templates by name.
///
/// Implemented by `sprout_adapters::templates::BuiltinTemplates`.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateSource: Send + Sync {
    /// Raw template text with `{{VAR}}` placeholders.
    fn template(&self, name: &str) -> SproutResult<String>;
}
