//! Logging setup.
//!
//! Two audiences, two channels:
//!
//! - the progress report (`sprout_core::report`), always on, for users;
//! - `tracing` diagnostics, quiet by default, for developers.
//!
//! Only the CLI crate installs a subscriber; the other crates only emit.
//!
//! # Verbosity mapping
//!
//! | Flag(s)   | Diagnostics | Report threshold |
//! |-----------|-------------|------------------|
//! | (none)    | WARN        | INFO             |
//! | `-v`      | INFO        | DEBUG            |
//! | `-vv`     | DEBUG       | DEBUG            |
//! | `-vvv`    | TRACE       | DEBUG            |
//! | `--quiet` | ERROR       | ERROR            |
//!
//! `RUST_LOG` overrides the diagnostics column.

use std::io::IsTerminal as _;

use sprout_core::report::{LogOptions, Severity};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;
use crate::config::AppConfig;

/// Initialise the global tracing subscriber.
///
/// Must be called once, before any tracing macros fire.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let level = derive_level(args);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "sprout={level},sprout_core={level},sprout_adapters={level}"
        ))
    });

    let use_ansi = !args.no_color && std::io::stderr().is_terminal();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(())
}

/// Options for `configure_logger`, from the flags and the config file.
pub fn report_options(args: &GlobalArgs, config: &AppConfig) -> LogOptions {
    LogOptions {
        log_level: report_level(args),
        no_color: args.no_color || config.output.no_color,
    }
}

fn report_level(args: &GlobalArgs) -> Severity {
    if args.quiet {
        Severity::Error
    } else if args.verbose > 0 {
        Severity::Debug
    } else {
        Severity::Info
    }
}

fn derive_level(args: &GlobalArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with(verbose: u8, quiet: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            no_color: true,
            config: None,
        }
    }

    #[test]
    fn diagnostic_levels() {
        assert_eq!(derive_level(&args_with(0, false)), "warn");
        assert_eq!(derive_level(&args_with(1, false)), "info");
        assert_eq!(derive_level(&args_with(2, false)), "debug");
        assert_eq!(derive_level(&args_with(3, false)), "trace");
        assert_eq!(derive_level(&args_with(10, false)), "trace");
    }

    // quiet takes precedence over verbose
    #[test]
    fn quiet_overrides_verbose() {
        assert_eq!(derive_level(&args_with(3, true)), "error");
        assert_eq!(report_level(&args_with(3, true)), Severity::Error);
    }

    #[test]
    fn report_levels() {
        assert_eq!(report_level(&args_with(0, false)), Severity::Info);
        assert_eq!(report_level(&args_with(1, false)), Severity::Debug);
        assert_eq!(report_level(&args_with(3, false)), Severity::Debug);
    }

    #[test]
    fn no_color_comes_from_flag_or_config() {
        let mut config = AppConfig::default();
        let mut args = args_with(0, false);
        args.no_color = false;
        assert!(!report_options(&args, &config).no_color);

        config.output.no_color = true;
        assert!(report_options(&args, &config).no_color);
    }
}
