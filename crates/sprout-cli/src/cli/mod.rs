//! CLI argument definitions using the clap derive API.
//!
//! The only place that knows about argument names, aliases and help text.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name     = "sprout",
    bin_name = "sprout",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f331} Project scaffolding with a readable report",
    long_about = "Sprout lays out the skeleton of a new project (README, \
                  license, docs, CI files) and reports every step.",
    after_help = "EXAMPLES:\n\
        \x20 sprout new my-project\n\
        \x20 sprout new my-project --travis --author \"Ada Lovelace\"\n\
        \x20 sprout new my-project --update --pretend\n\
        \x20 sprout completions bash > /usr/share/bash-completion/completions/sprout",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create or update a project.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 sprout new my-project\n\
            \x20 sprout new ../libs/parser --package parser_core\n\
            \x20 sprout new my-project --update --travis"
    )]
    New(NewArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 sprout completions bash > ~/.local/share/bash-completion/completions/sprout\n\
            \x20 sprout completions zsh  > ~/.zfunc/_sprout\n\
            \x20 sprout completions fish > ~/.config/fish/completions/sprout.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the configuration.
    #[command(about = "Configuration management", subcommand)]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Where to create the project. The last segment is the project name.
    #[arg(value_name = "PATH", help = "Project directory")]
    pub path: PathBuf,

    /// Overwrite files of an existing directory.
    #[arg(short = 'f', long = "force", help = "Overwrite existing files")]
    pub force: bool,

    /// Add missing files to an existing project.
    #[arg(long = "update", help = "Update an existing project")]
    pub update: bool,

    /// Report what would happen without touching the disk.
    #[arg(long = "pretend", alias = "dry-run", help = "Do not write anything")]
    pub pretend: bool,

    #[arg(long = "no-git", help = "Do not initialise a git repository")]
    pub no_git: bool,

    #[arg(long = "travis", help = "Add Travis CI configuration")]
    pub travis: bool,

    /// Activate an extension by name. Repeatable.
    #[arg(
        short = 'e',
        long = "extension",
        value_name = "NAME",
        action = clap::ArgAction::Append,
        help = "Activate an extension"
    )]
    pub extensions: Vec<String>,

    #[arg(long = "name", value_name = "NAME", help = "Project name (default: directory name)")]
    pub name: Option<String>,

    #[arg(long = "package", value_name = "NAME", help = "Package name")]
    pub package: Option<String>,

    #[arg(long = "author", value_name = "NAME", help = "Author name")]
    pub author: Option<String>,

    #[arg(long = "license", value_name = "ID", help = "SPDX license identifier")]
    pub license: Option<String>,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the path of the configuration file.
    Path,
    /// Print the effective configuration.
    Show {
        /// Print JSON instead of TOML.
        #[arg(long = "json")]
        json: bool,
    },
}

// ── tests ─────────────────────────────────────────────────────────────────────
