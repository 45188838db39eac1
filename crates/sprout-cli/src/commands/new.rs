//! Implementation of the `sprout new` command.
//!
//! Responsibility: translate CLI arguments and configuration defaults into
//! `ScaffoldOpts`, call the core scaffold service, and display the result.
//! No business logic lives here.

use std::path::Path;

use tracing::{debug, info, instrument};

use sprout_adapters::{BuiltinTemplates, LocalFilesystem, SystemShell};
use sprout_core::{
    application::{ScaffoldService, actions::git_config},
    domain::{DEFAULT_AUTHOR, ScaffoldOpts},
    report::ReportLogger,
};

use crate::{
    cli::NewArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `sprout new` command.
///
/// 1. Resolve the project path against the current directory
/// 2. Merge flags over configuration defaults
/// 3. Run the pipeline, reporting through `logger`
/// 4. Print a summary
#[instrument(skip_all, fields(path = %args.path.display()))]
pub fn execute(
    args: NewArgs,
    config: AppConfig,
    logger: &ReportLogger,
    output: OutputManager,
) -> CliResult<()> {
    let project_path = std::path::absolute(&args.path)
        .with_cli_context(|| format!("Cannot resolve '{}'", args.path.display()))?;
    let git_author = if args.author.is_none() && config.defaults.author.is_none() {
        git_config(&SystemShell::new(), "user.name")
    } else {
        None
    };
    let opts = build_opts(&args, &config, &project_path, git_author.as_deref())?;
    debug!(?opts, "options resolved");

    let templates = match &config.templates.dir {
        Some(dir) => BuiltinTemplates::with_override_dir(dir),
        None => BuiltinTemplates::from_env(),
    };
    let service = ScaffoldService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(SystemShell::new()),
        Box::new(templates),
    );

    let (structure, opts) = service.create_project(opts, logger)?;
    info!(
        files = structure.files().len(),
        project = %opts.project_path.display(),
        "scaffold completed"
    );

    let verb = if opts.update { "updated" } else { "created" };
    if opts.pretend {
        output.success(&format!("Project '{}' would be {verb} (pretend)", opts.name))?;
    } else {
        output.success(&format!(
            "Project '{}' {verb} at {}",
            opts.name,
            opts.project_path.display()
        ))?;
        if !opts.update {
            output.hint(&format!("  cd {}", args.path.display()))?;
        }
    }
    Ok(())
}

/// Flags win over the configuration file, then git's `user.name`, then
/// built-in defaults.
pub fn build_opts(
    args: &NewArgs,
    config: &AppConfig,
    project_path: &Path,
    git_author: Option<&str>,
) -> CliResult<ScaffoldOpts> {
    let mut opts = ScaffoldOpts::new(project_path);
    if let Some(name) = &args.name {
        opts = opts.name(name);
    }
    if opts.name.trim().is_empty() {
        return Err(CliError::InvalidInput {
            message: format!(
                "cannot derive a project name from '{}', pass --name",
                project_path.display()
            ),
        });
    }
    if let Some(package) = &args.package {
        opts = opts.package(package);
    }

    let author = args
        .author
        .as_deref()
        .or(config.defaults.author.as_deref())
        .or(git_author)
        .unwrap_or(DEFAULT_AUTHOR);
    let license = args
        .license
        .as_deref()
        .unwrap_or(&config.defaults.license);

    opts = opts
        .author(author)
        .license(license)
        .force(args.force)
        .update(args.update)
        .pretend(args.pretend)
        .git(config.defaults.git && !args.no_git);

    let travis = args.travis.then(|| "travis".to_string());
    for name in config
        .defaults
        .extensions
        .iter()
        .chain(travis.iter())
        .chain(args.extensions.iter())
    {
        opts = opts.extension(name);
    }
    Ok(opts)
}
