//! Global arguments that apply to every subcommand.
//!
//! Flattened into [`super::Cli`] so that `-v`, `-q`, etc. work on any
//! invocation.

use std::path::PathBuf;

use clap::Args;

/// Global arguments for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Increase verbosity.
    ///
    /// `-v` also shows DEBUG report lines; `-vv` and `-vvv` raise the
    /// diagnostic log level.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase verbosity:
    (none)  - Report lines, warnings
    -v      - Debug report lines, info diagnostics
    -vv     - Debug diagnostics
    -vvv    - Trace diagnostics"
    )]
    pub verbose: u8,

    /// Only report errors.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Disable ANSI colour codes.
    ///
    /// Honoured automatically when `NO_COLOR` is set
    /// (see <https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Configuration file path"
    )]
    pub config: Option<PathBuf>,
}
