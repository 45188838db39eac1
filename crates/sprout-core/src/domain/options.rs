//! Options that drive a single scaffolding run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::render::to_snake_case;
use crate::error::{SproutError, SproutResult};

pub const DEFAULT_LICENSE: &str = "MIT";
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// Everything the pipeline's actions may read or adjust.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldOpts {
    pub project_path: PathBuf,
    /// Human readable project name, defaults to the last path segment.
    pub name: String,
    /// Importable package name, derived from `name` when not given.
    pub package: String,
    pub author: String,
    pub license: String,
    /// Overwrite files of an existing directory.
    pub force: bool,
    /// Add missing files to an existing project.
    pub update: bool,
    /// Report every step without touching the disk.
    pub pretend: bool,
    pub git: bool,
    /// Names of the extensions to activate.
    pub extensions: Vec<String>,
}

impl ScaffoldOpts {
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        let project_path = project_path.into();
        let name = project_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let package = make_valid_identifier(&name);

        Self {
            project_path,
            name,
            package,
            author: DEFAULT_AUTHOR.to_string(),
            license: DEFAULT_LICENSE.to_string(),
            force: false,
            update: false,
            pretend: false,
            git: true,
            extensions: Vec::new(),
        }
    }

    /// Rename the project. The package follows unless set explicitly later.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self.package = make_valid_identifier(&self.name);
        self
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn license(mut self, license: impl Into<String>) -> Self {
        self.license = license.into();
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn update(mut self, update: bool) -> Self {
        self.update = update;
        self
    }

    pub fn pretend(mut self, pretend: bool) -> Self {
        self.pretend = pretend;
        self
    }

    pub fn git(mut self, git: bool) -> Self {
        self.git = git;
        self
    }

    pub fn extension(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.extensions.contains(&name) {
            self.extensions.push(name);
        }
        self
    }
}

/// Check that `name` can be used as a package identifier.
pub fn validate_identifier(name: &str) -> SproutResult<()> {
    let invalid = |reason: &str| SproutError::InvalidIdentifier {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let Some(first) = name.chars().next() else {
        return Err(invalid("it is empty"));
    };
    if first.is_ascii_digit() {
        return Err(invalid("it starts with a digit"));
    }
    if let Some(c) = name.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
        return Err(invalid(&format!("it contains '{c}'")));
    }
    Ok(())
}

/// Best effort conversion of any string into a valid identifier.
pub fn make_valid_identifier(name: &str) -> String {
    let mut ident: String = to_snake_case(name)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}
