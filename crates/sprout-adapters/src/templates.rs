//! Template sources.
//!
//! Templates ship inside the binary. A directory can override any of them:
//! `<dir>/<name>.template` wins over the built-in text of the same name.
//! The directory comes from [`BuiltinTemplates::with_override_dir`] or the
//! `SPROUT_TEMPLATES_DIR` environment variable.

use std::path::{Path, PathBuf};

use sprout_core::{
    application::ports::TemplateSource,
    error::{SproutError, SproutResult},
};
use tracing::{debug, warn};

/// Environment variable naming a template override directory.
pub const TEMPLATES_DIR_ENV: &str = "SPROUT_TEMPLATES_DIR";

const TEMPLATE_EXTENSION: &str = "template";

const BUILTIN: &[(&str, &str)] = &[
    ("readme", include_str!("../templates/readme.template")),
    ("authors", include_str!("../templates/authors.template")),
    ("changelog", include_str!("../templates/changelog.template")),
    ("license", include_str!("../templates/license.template")),
    ("gitignore", include_str!("../templates/gitignore.template")),
    ("docs_index", include_str!("../templates/docs_index.template")),
    ("travis", include_str!("../templates/travis.template")),
    ("travis_install", include_str!("../templates/travis_install.template")),
];

/// Built-in templates with an optional override directory.
#[derive(Debug, Clone, Default)]
pub struct BuiltinTemplates {
    override_dir: Option<PathBuf>,
}

impl BuiltinTemplates {
    /// Built-in templates only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Honour `SPROUT_TEMPLATES_DIR` when it is set.
    pub fn from_env() -> Self {
        Self {
            override_dir: std::env::var_os(TEMPLATES_DIR_ENV).map(PathBuf::from),
        }
    }

    pub fn with_override_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            override_dir: Some(dir.into()),
        }
    }

    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    /// Names of all built-in templates.
    pub fn names() -> impl Iterator<Item = &'static str> {
        BUILTIN.iter().map(|(name, _)| *name)
    }

    fn from_override(&self, name: &str) -> Option<String> {
        let dir = self.override_dir.as_ref()?;
        let path = dir.join(name).with_extension(TEMPLATE_EXTENSION);
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                debug!(path = %path.display(), "using template override");
                Some(text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "unreadable template override, using built-in"
                );
                None
            }
        }
    }
}

impl TemplateSource for BuiltinTemplates {
    fn template(&self, name: &str) -> SproutResult<String> {
        if let Some(text) = self.from_override(name) {
            return Ok(text);
        }
        BUILTIN
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, text)| (*text).to_string())
            .ok_or_else(|| SproutError::TemplateNotFound {
                name: name.to_string(),
            })
    }
}
