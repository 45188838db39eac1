//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The CLI
//! layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (applied at the call-site, not here)
//! 2. `SPROUT_*` environment variables, `__` between sections
//!    (`SPROUT_DEFAULTS__AUTHOR`)
//! 3. Config file: `--config FILE` or [`AppConfig::config_path`]
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use sprout_core::domain::DEFAULT_LICENSE;
use sprout_core::error::SproutError;

const ENV_PREFIX: &str = "SPROUT";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for new projects.
    pub defaults: Defaults,
    pub output: OutputConfig,
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub author: Option<String>,
    pub license: String,
    /// Extensions activated for every new project.
    pub extensions: Vec<String>,
    pub git: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            author: None,
            license: DEFAULT_LICENSE.to_string(),
            extensions: Vec::new(),
            git: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory whose `<name>.template` files override the built-ins.
    pub dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from defaults, file and environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with(config_file, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with(config_file: Option<&Path>, env: Environment) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::config_path() {
                Ok(path) => (path, false),
                Err(_) => return Self::from_sources(None, env),
            },
        };
        Self::from_sources(Some((&path, required)), env)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))
    }

    fn from_sources(file: Option<(&Path, bool)>, env: Environment) -> anyhow::Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);
        if let Some((path, required)) = file {
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            );
        }
        let env = env
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("defaults.extensions")
            .try_parsing(true);

        Ok(builder.add_source(env).build()?.try_deserialize()?)
    }

    /// Path to the default configuration file.
    pub fn config_path() -> Result<PathBuf, SproutError> {
        directories::ProjectDirs::from("rs", "sprout", "sprout")
            .map(|d| d.config_dir().join("config.toml"))
            .ok_or(SproutError::ImpossibleToFindConfigDir)
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
