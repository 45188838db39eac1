//! Unified error handling for Sprout Core.
//!
//! Every failure the scaffolding pipeline can run into, with user-actionable
//! suggestions and a category the CLI maps to exit codes.

use std::path::PathBuf;
use thiserror::Error;

/// Root error type for Sprout Core operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SproutError {
    /// The project directory exists and neither `force` nor `update` was given.
    #[error("Directory already exists: {path}")]
    DirectoryAlreadyExists { path: PathBuf },

    /// `update` was requested for a directory that is not there.
    #[error("No directory was found to be updated: {path}")]
    DirectoryDoesNotExist { path: PathBuf },

    /// A pipeline anchor or removal target does not name a registered action.
    #[error("Impossible to find the required action: `{name}`")]
    ActionNotFound { name: String },

    /// An extension name that is not built in.
    #[error("Unknown extension: {name}")]
    ExtensionNotFound { name: String },

    #[error("Make sure git is installed and working.")]
    GitNotInstalled,

    /// `user.name` or `user.email` is missing from the git configuration.
    #[error("Make sure git is configured with your name and email.")]
    GitNotConfigured,

    #[error("Your working tree is dirty. Commit your changes first or use '--force'.")]
    GitDirtyWorkspace,

    /// The package name cannot be used as an identifier.
    #[error("'{name}' is not a valid identifier: {reason}")]
    InvalidIdentifier { name: String, reason: String },

    /// An external command exited unsuccessfully.
    #[error("Command `{command}` failed: {output}")]
    ShellCommand { command: String, output: String },

    #[error("Impossible to find the configuration directory")]
    ImpossibleToFindConfigDir,

    /// Two parts of a project structure disagree about a path.
    #[error("Invalid project structure at '{path}': {reason}")]
    InvalidStructure { path: String, reason: String },

    /// A template name that no template source provides.
    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    /// A filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    Filesystem { path: PathBuf, reason: String },

    /// Writing the progress report failed.
    #[error("Failed to write report: {reason}")]
    Report { reason: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl SproutError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DirectoryAlreadyExists { path } => vec![
                format!("The directory '{}' already exists", path.display()),
                "Use --update to add missing files to an existing project".into(),
                "Use --force to overwrite existing files".into(),
            ],
            Self::DirectoryDoesNotExist { path } => vec![
                format!("Nothing to update at '{}'", path.display()),
                "Drop --update to create a new project".into(),
            ],
            Self::ActionNotFound { name } => vec![
                format!("No action named '{name}' is registered"),
                "Check the extension that tried to reference it".into(),
            ],
            Self::ExtensionNotFound { name } => vec![
                format!("No extension is called '{name}'"),
                "Run: sprout new --help to see the available extensions".into(),
            ],
            Self::GitNotInstalled => vec![
                "Install git and make sure it is on your PATH".into(),
                "Or pass --no-git to skip repository initialisation".into(),
            ],
            Self::GitNotConfigured => vec![
                "Run: git config --global user.email \"you@example.com\"".into(),
                "Run: git config --global user.name \"Your Name\"".into(),
                "Or pass --no-git to skip repository initialisation".into(),
            ],
            Self::GitDirtyWorkspace => vec![
                "Commit or stash your changes first".into(),
                "Or use --force".into(),
            ],
            Self::InvalidIdentifier { name, .. } => vec![
                format!("'{name}' cannot be used as a package name"),
                "Use letters, digits and underscores, not starting with a digit".into(),
                "Pass --package to choose a different name".into(),
            ],
            Self::ShellCommand { command, .. } => vec![
                format!("`{command}` did not succeed"),
                "Check the command output above for details".into(),
            ],
            Self::ImpossibleToFindConfigDir => vec![
                "Make sure $HOME (or %USERPROFILE%) is set".into(),
                "Or pass --config with an explicit file".into(),
            ],
            Self::InvalidStructure { .. } => vec![
                "An extension produced a conflicting file layout".into(),
                "Try again with fewer extensions to find the culprit".into(),
            ],
            Self::TemplateNotFound { name } => {
                vec![format!("No built-in template is called '{name}'")]
            }
            Self::Filesystem { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::Report { .. } => vec!["Check that stderr is still open".into()],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Sprout".into(),
                "Please report this issue at: https://github.com/sprout-rs/sprout/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DirectoryAlreadyExists { .. }
            | Self::GitDirtyWorkspace
            | Self::InvalidIdentifier { .. } => ErrorCategory::Validation,
            Self::DirectoryDoesNotExist { .. }
            | Self::ExtensionNotFound { .. }
            | Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::GitNotInstalled
            | Self::GitNotConfigured
            | Self::ImpossibleToFindConfigDir => ErrorCategory::Configuration,
            Self::ActionNotFound { .. }
            | Self::ShellCommand { .. }
            | Self::InvalidStructure { .. }
            | Self::Filesystem { .. }
            | Self::Report { .. }
            | Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

impl From<std::io::Error> for SproutError {
    /// I/O errors without a path come from the report sink.
    fn from(err: std::io::Error) -> Self {
        Self::Report {
            reason: err.to_string(),
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type SproutResult<T> = Result<T, SproutError>;
