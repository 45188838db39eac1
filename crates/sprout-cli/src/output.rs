//! Command output on stdout.
//!
//! The progress report goes to stderr through the `ReportLogger`; this is
//! for the results a command produces (paths, configuration dumps) and the
//! final summary line.

use std::io;

use console::Term;
use owo_colors::OwoColorize;

use crate::cli::GlobalArgs;
use crate::config::AppConfig;

pub struct OutputManager {
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        Self {
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color,
            term: Term::stdout(),
        }
    }

    /// Command result. Printed even in quiet mode so it can be piped.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(&self.success_line(msg))
    }

    /// Dimmed hint below a result.
    pub fn hint(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            msg.to_owned()
        } else {
            msg.dimmed().to_string()
        };
        self.term.write_line(&line)
    }

    fn success_line(&self, msg: &str) -> String {
        if self.no_color {
            format!("\u{2713} {msg}")
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        }
    }
}
