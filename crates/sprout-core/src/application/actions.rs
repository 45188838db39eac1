//! The built-in pipeline actions.
//!
//! Each action takes the structure and options produced so far and returns
//! them, possibly modified. Side effects go through the ports in
//! [`ScaffoldContext`] and are reported on its logger.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::application::pipeline::ScaffoldContext;
use crate::application::ports::{ShellCommand, ShellRunner};
use crate::domain::{
    FilePolicy, FileSpec, Node, RenderContext, ScaffoldOpts, Structure, validate_identifier,
};
use crate::error::{SproutError, SproutResult};
use crate::report::ReportOptions;

type ActionResult = SproutResult<(Structure, ScaffoldOpts)>;

/// Files every project starts with: path, template name, policy.
const BASE_FILES: &[(&str, &str, FilePolicy)] = &[
    ("README.md", "readme", FilePolicy::SkipOnUpdate),
    ("AUTHORS.md", "authors", FilePolicy::SkipOnUpdate),
    ("CHANGELOG.md", "changelog", FilePolicy::SkipOnUpdate),
    ("LICENSE.txt", "license", FilePolicy::Overwrite),
    (".gitignore", "gitignore", FilePolicy::Overwrite),
    ("docs/index.md", "docs_index", FilePolicy::SkipOnUpdate),
];

/// Check the options, and that git is usable when it will be needed, before
/// anything is written.
pub fn verify_options_consistency(
    structure: Structure,
    opts: ScaffoldOpts,
    ctx: &ScaffoldContext<'_>,
) -> ActionResult {
    validate_identifier(&opts.package)?;
    if opts.force && opts.update {
        debug!("both force and update given, existing files will be overwritten");
    }
    if needs_git_init(&opts, ctx) {
        check_git(ctx)?;
    }
    Ok((structure, opts))
}

fn needs_git_init(opts: &ScaffoldOpts, ctx: &ScaffoldContext<'_>) -> bool {
    opts.git && !(opts.update && ctx.filesystem.is_dir(&opts.project_path.join(".git")))
}

/// git must be installed and know who commits.
fn check_git(ctx: &ScaffoldContext<'_>) -> SproutResult<()> {
    if !ctx.shell.is_available("git") {
        return Err(SproutError::GitNotInstalled);
    }
    let configured = ["user.name", "user.email"]
        .into_iter()
        .all(|key| git_config(ctx.shell, key).is_some());
    if !configured {
        return Err(SproutError::GitNotConfigured);
    }
    Ok(())
}

/// Refuse to clobber or update the wrong directory.
pub fn verify_project_dir(
    structure: Structure,
    opts: ScaffoldOpts,
    ctx: &ScaffoldContext<'_>,
) -> ActionResult {
    let path = opts.project_path.as_path();
    let exists = ctx.filesystem.exists(path);

    if exists && !opts.force && !opts.update {
        return Err(SproutError::DirectoryAlreadyExists {
            path: path.to_path_buf(),
        });
    }
    if !exists && opts.update {
        return Err(SproutError::DirectoryDoesNotExist {
            path: path.to_path_buf(),
        });
    }
    if exists && opts.update && !opts.force && is_dirty_repo(path, ctx)? {
        return Err(SproutError::GitDirtyWorkspace);
    }
    Ok((structure, opts))
}

fn is_dirty_repo(path: &Path, ctx: &ScaffoldContext<'_>) -> SproutResult<bool> {
    if !ctx.filesystem.is_dir(&path.join(".git")) || !ctx.shell.is_available("git") {
        return Ok(false);
    }
    let status = ctx
        .shell
        .run(&ShellCommand::git(["status", "--porcelain"]), path)?;
    Ok(!status.trim().is_empty())
}

/// Lay out the base files. Entries already in `structure` take precedence.
#[instrument(skip_all, fields(project = %opts.name))]
pub fn define_structure(
    structure: Structure,
    opts: ScaffoldOpts,
    ctx: &ScaffoldContext<'_>,
) -> ActionResult {
    let render = RenderContext::from_opts(&opts);
    let mut base = Structure::new();

    for &(path, template, policy) in BASE_FILES {
        let content = render.render(&ctx.templates.template(template)?);
        base.ensure(path, FileSpec::new(content).policy(policy))?;
    }
    base.ensure_dir("tests")?;
    base.merge(structure)?;

    Ok((base, opts))
}

/// Write `structure` below the project directory.
///
/// Nothing is written in pretend mode, but every step is still reported.
/// If writing a freshly created project fails, the directory is removed.
pub fn create_structure(
    structure: Structure,
    opts: ScaffoldOpts,
    ctx: &ScaffoldContext<'_>,
) -> ActionResult {
    let root = opts.project_path.as_path();
    let fresh = !ctx.filesystem.exists(root);

    let result = if fresh {
        create_dir(root, &opts, ctx)
    } else {
        Ok(())
    }
    .and_then(|()| write_tree(&structure, root, &opts, ctx));

    if let Err(err) = result {
        if fresh && !opts.pretend && ctx.filesystem.exists(root) {
            warn!(error = %err, "write failed, rolling back");
            // the report stream may be what failed; remove the directory anyway
            if let Err(report) = ctx.logger.report("remove", &root.display().to_string()) {
                warn!(error = %report, "could not report rollback");
            }
            if let Err(rollback) = ctx.filesystem.remove_dir_all(root) {
                warn!(error = %rollback, path = %root.display(), "rollback failed");
            }
        }
        return Err(err);
    }

    info!(files = structure.files().len(), "structure created");
    Ok((structure, opts))
}

fn write_tree(
    structure: &Structure,
    at: &Path,
    opts: &ScaffoldOpts,
    ctx: &ScaffoldContext<'_>,
) -> SproutResult<()> {
    for (name, node) in structure.iter() {
        let path = at.join(name);
        match node {
            Node::Dir(dir) => {
                if !ctx.filesystem.exists(&path) {
                    create_dir(&path, opts, ctx)?;
                }
                write_tree(dir, &path, opts, ctx)?;
            }
            Node::File(file) => write_file(&path, file, opts, ctx)?,
        }
    }
    Ok(())
}

fn create_dir(path: &Path, opts: &ScaffoldOpts, ctx: &ScaffoldContext<'_>) -> SproutResult<()> {
    ctx.logger.report("create", &path.display().to_string())?;
    if !opts.pretend {
        ctx.filesystem.create_dir_all(path)?;
    }
    Ok(())
}

fn write_file(
    path: &Path,
    file: &FileSpec,
    opts: &ScaffoldOpts,
    ctx: &ScaffoldContext<'_>,
) -> SproutResult<()> {
    let subject = path.display().to_string();
    let exists = ctx.filesystem.exists(path);

    let skip = match file.policy {
        FilePolicy::Overwrite => false,
        FilePolicy::NoOverwrite => exists,
        FilePolicy::SkipOnUpdate => opts.update,
    };
    if skip {
        ctx.logger.report("skip", &subject)?;
        return Ok(());
    }

    ctx.logger
        .report(if exists { "update" } else { "create" }, &subject)?;
    if opts.pretend {
        return Ok(());
    }
    ctx.filesystem.write_file(path, &file.content)?;
    if file.executable {
        ctx.filesystem.set_permissions(path, true)?;
    }
    Ok(())
}

/// Turn the new project into a git repository.
///
/// Commands are reported with the project directory as context. In pretend
/// mode they are reported but not run.
pub fn init_git(
    structure: Structure,
    opts: ScaffoldOpts,
    ctx: &ScaffoldContext<'_>,
) -> ActionResult {
    let path = opts.project_path.as_path();
    if !needs_git_init(&opts, ctx) {
        debug!(git = opts.git, "skipping git init");
        return Ok((structure, opts));
    }
    if !ctx.shell.is_available("git") {
        return Err(SproutError::GitNotInstalled);
    }

    let context = path.display().to_string();
    for command in [ShellCommand::git(["init"]), ShellCommand::git(["add", "."])] {
        ctx.logger.report_with(
            "run",
            &command.to_string(),
            ReportOptions::new().context(&context),
        )?;
        if !opts.pretend {
            let output = ctx.shell.run(&command, path)?;
            if !output.trim().is_empty() {
                ctx.logger.debug(output.trim_end())?;
            }
        }
    }
    Ok((structure, opts))
}

/// Value of the git configuration `key`, `None` when unset or unreadable.
pub fn git_config(shell: &dyn ShellRunner, key: &str) -> Option<String> {
    match shell.run(&ShellCommand::git(["config", "--get", key]), Path::new(".")) {
        Ok(value) => {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        }
        Err(err) => {
            debug!(key, error = %err, "git config lookup failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;
    use crate::application::ports::{MockFilesystem, MockShellRunner, MockTemplateSource};
    use crate::report::{
        CaptureHandler, Handler, LineFormatter, ReportFormatter, ReportLogger, Severity, Sink,
    };

    const ROOT: &str = "/work";

    struct Harness {
        capture: Arc<CaptureHandler>,
        logger: ReportLogger,
        fs: MockFilesystem,
        shell: MockShellRunner,
        templates: MockTemplateSource,
    }

    impl Harness {
        fn new() -> Self {
            let capture = Arc::new(CaptureHandler::new());
            let formatter: Arc<dyn LineFormatter> =
                Arc::new(ReportFormatter::with_working_dir(ROOT));
            let logger = ReportLogger::builder()
                .sink(Arc::new(Sink::new("actions", capture.clone())))
                .formatter(formatter)
                .build();
            Self {
                capture,
                logger,
                fs: MockFilesystem::new(),
                shell: MockShellRunner::new(),
                templates: MockTemplateSource::new(),
            }
        }

        fn ctx(&self) -> ScaffoldContext<'_> {
            ScaffoldContext {
                logger: &self.logger,
                filesystem: &self.fs,
                shell: &self.shell,
                templates: &self.templates,
            }
        }
    }

    fn opts() -> ScaffoldOpts {
        ScaffoldOpts::new(PathBuf::from(ROOT).join("demo"))
    }

    #[test]
    fn invalid_package_is_rejected() {
        let h = Harness::new();
        let opts = opts().package("not-valid");
        let err = verify_options_consistency(Structure::new(), opts, &h.ctx()).unwrap_err();
        assert!(matches!(err, SproutError::InvalidIdentifier { .. }));
    }

    #[test]
    fn existing_dir_needs_force_or_update() {
        let mut h = Harness::new();
        h.fs.expect_exists().return_const(true);
        h.fs.expect_is_dir().return_const(false);

        let err = verify_project_dir(Structure::new(), opts(), &h.ctx()).unwrap_err();
        assert!(matches!(err, SproutError::DirectoryAlreadyExists { .. }));

        assert!(verify_project_dir(Structure::new(), opts().force(true), &h.ctx()).is_ok());
        assert!(verify_project_dir(Structure::new(), opts().update(true), &h.ctx()).is_ok());
    }

    #[test]
    fn update_needs_an_existing_dir() {
        let mut h = Harness::new();
        h.fs.expect_exists().return_const(false);

        let err = verify_project_dir(Structure::new(), opts().update(true), &h.ctx()).unwrap_err();
        assert!(matches!(err, SproutError::DirectoryDoesNotExist { .. }));
    }

    #[test]
    fn dirty_repository_blocks_update_without_force() {
        let mut h = Harness::new();
        h.fs.expect_exists().return_const(true);
        h.fs.expect_is_dir()
            .withf(|p| p.ends_with(".git"))
            .return_const(true);
        h.shell.expect_is_available().return_const(true);
        h.shell
            .expect_run()
            .withf(|cmd, _| cmd.args == ["status", "--porcelain"])
            .returning(|_, _| Ok(" M README.md\n".to_string()));

        let err = verify_project_dir(Structure::new(), opts().update(true), &h.ctx()).unwrap_err();
        assert_eq!(err, SproutError::GitDirtyWorkspace);

        // --force skips the check entirely
        assert!(
            verify_project_dir(Structure::new(), opts().update(true).force(true), &h.ctx()).is_ok()
        );
    }

    #[test]
    fn define_structure_renders_templates_and_keeps_existing_entries() {
        let mut h = Harness::new();
        h.templates
            .expect_template()
            .returning(|name| Ok(format!("{name} for {{{{PROJECT_NAME}}}}")));

        let existing = Structure::new()
            .with_file("README.md", FileSpec::new("custom"))
            .unwrap();
        let (s, _) = define_structure(existing, opts(), &h.ctx()).unwrap();

        assert_eq!(s.get("README.md"), Some(&Node::File(FileSpec::new("custom"))));
        assert_eq!(
            s.get("LICENSE.txt"),
            Some(&Node::File(FileSpec::new("license for demo")))
        );
        assert!(s.get("tests").unwrap().is_dir());
        assert!(s.contains("docs/index.md"));
    }

    #[test]
    fn missing_template_fails_define_structure() {
        let mut h = Harness::new();
        h.templates.expect_template().returning(|name| {
            Err(SproutError::TemplateNotFound {
                name: name.to_string(),
            })
        });

        let err = define_structure(Structure::new(), opts(), &h.ctx()).unwrap_err();
        assert!(matches!(err, SproutError::TemplateNotFound { .. }));
    }

    #[test]
    fn pretend_reports_without_writing() {
        let mut h = Harness::new();
        h.fs.expect_exists().return_const(false);
        // no write expectations: any write would panic

        let s = Structure::new()
            .with_file("README.md", FileSpec::new("x"))
            .unwrap()
            .with_file("tests/run.sh", FileSpec::new("y").executable())
            .unwrap();
        create_structure(s, opts().pretend(true), &h.ctx()).unwrap();

        assert_eq!(
            h.capture.lines(),
            vec![
                "create        demo".to_string(),
                "create        demo/README.md".to_string(),
                "create        demo/tests".to_string(),
                "create        demo/tests/run.sh".to_string(),
            ]
        );
    }

    #[test]
    fn policies_decide_what_is_skipped() {
        let mut h = Harness::new();
        h.fs.expect_exists().return_const(true);
        h.fs.expect_write_file().times(2).returning(|_, _| Ok(()));

        let s = Structure::new()
            .with_file("keep.yml", FileSpec::new("").policy(FilePolicy::NoOverwrite))
            .unwrap()
            .with_file("notes.md", FileSpec::new("").policy(FilePolicy::SkipOnUpdate))
            .unwrap()
            .with_file("LICENSE.txt", FileSpec::new(""))
            .unwrap();
        create_structure(s, opts().update(true), &h.ctx()).unwrap();
        create_structure(
            Structure::new()
                .with_file("notes.md", FileSpec::new("").policy(FilePolicy::SkipOnUpdate))
                .unwrap(),
            opts().force(true),
            &h.ctx(),
        )
        .unwrap();

        assert_eq!(
            h.capture.lines(),
            vec![
                "update        demo/LICENSE.txt".to_string(),
                "skip          demo/keep.yml".to_string(),
                "skip          demo/notes.md".to_string(),
                "update        demo/notes.md".to_string(),
            ]
        );
    }

    #[test]
    fn failed_write_rolls_back_a_fresh_project() {
        let mut h = Harness::new();
        let created = Arc::new(AtomicBool::new(false));
        let seen = created.clone();
        h.fs.expect_exists()
            .returning(move |_| seen.load(Ordering::SeqCst));
        h.fs.expect_create_dir_all().returning(move |_| {
            created.store(true, Ordering::SeqCst);
            Ok(())
        });
        h.fs.expect_write_file().returning(|p, _| {
            Err(SproutError::Filesystem {
                path: p.to_path_buf(),
                reason: "disk full".into(),
            })
        });
        h.fs.expect_remove_dir_all()
            .withf(|p| p.ends_with("demo"))
            .times(1)
            .returning(|_| Ok(()));

        let s = Structure::new()
            .with_file("README.md", FileSpec::new("x"))
            .unwrap();
        let err = create_structure(s, opts(), &h.ctx()).unwrap_err();

        assert!(matches!(err, SproutError::Filesystem { .. }));
        assert_eq!(h.capture.lines().last().unwrap(), "remove        demo");
    }

    /// Answers `git config --get` with a value and every other command with
    /// no output.
    fn configured_git(cmd: &ShellCommand, _: &Path) -> SproutResult<String> {
        if cmd.args.first().is_some_and(|a| a == "config") {
            Ok("Ada Lovelace\n".to_string())
        } else {
            Ok(String::new())
        }
    }

    #[test]
    fn init_git_runs_and_reports_commands() {
        let mut h = Harness::new();
        h.shell.expect_is_available().return_const(true);
        h.shell.expect_run().times(2).returning(configured_git);

        init_git(Structure::new(), opts(), &h.ctx()).unwrap();

        assert_eq!(
            h.capture.lines(),
            vec![
                "run           git init from 'demo'".to_string(),
                "run           git add . from 'demo'".to_string(),
            ]
        );
    }

    #[test]
    fn init_git_requires_git() {
        let mut h = Harness::new();
        h.shell.expect_is_available().return_const(false);

        let err = init_git(Structure::new(), opts(), &h.ctx()).unwrap_err();
        assert_eq!(err, SproutError::GitNotInstalled);
    }

    #[test]
    fn init_git_propagates_command_failures() {
        let mut h = Harness::new();
        h.shell.expect_is_available().return_const(true);
        h.shell.expect_run().returning(|cmd, _| {
            Err(SproutError::ShellCommand {
                command: cmd.to_string(),
                output: "fatal".into(),
            })
        });

        let err = init_git(Structure::new(), opts(), &h.ctx()).unwrap_err();
        assert!(matches!(err, SproutError::ShellCommand { command, .. } if command == "git init"));
    }

    #[test]
    fn git_identity_is_checked_up_front() {
        let mut h = Harness::new();
        h.shell.expect_is_available().return_const(true);
        h.shell.expect_run().times(2).returning(configured_git);
        assert!(verify_options_consistency(Structure::new(), opts(), &h.ctx()).is_ok());
    }

    #[test]
    fn unconfigured_git_identity_is_rejected() {
        let mut h = Harness::new();
        h.shell.expect_is_available().return_const(true);
        // `git config --get` exits with 1 for unset keys
        h.shell.expect_run().returning(|cmd, _| {
            Err(SproutError::ShellCommand {
                command: cmd.to_string(),
                output: "exit status: 1".into(),
            })
        });

        let err = verify_options_consistency(Structure::new(), opts(), &h.ctx()).unwrap_err();
        assert_eq!(err, SproutError::GitNotConfigured);
        assert!(h.capture.lines().is_empty());
    }

    #[test]
    fn empty_git_email_is_rejected() {
        let mut h = Harness::new();
        h.shell.expect_is_available().return_const(true);
        h.shell.expect_run().returning(|cmd, _| {
            let email = cmd.args.last().is_some_and(|a| a == "user.email");
            Ok(if email { "  \n" } else { "Ada" }.to_string())
        });

        let opts = opts().pretend(true);
        let err = verify_options_consistency(Structure::new(), opts, &h.ctx()).unwrap_err();
        assert_eq!(err, SproutError::GitNotConfigured);
    }

    #[test]
    fn git_checks_are_skipped_without_git() {
        let h = Harness::new();
        // no shell expectations: any call would panic
        assert!(verify_options_consistency(Structure::new(), opts().git(false), &h.ctx()).is_ok());
    }

    #[test]
    fn missing_git_is_caught_up_front() {
        let mut h = Harness::new();
        h.shell.expect_is_available().return_const(false);
        let err = verify_options_consistency(Structure::new(), opts(), &h.ctx()).unwrap_err();
        assert_eq!(err, SproutError::GitNotInstalled);
    }

    #[test]
    fn git_config_trims_values() {
        let mut shell = MockShellRunner::new();
        shell
            .expect_run()
            .withf(|cmd, _| cmd.args == ["config", "--get", "user.name"])
            .returning(|_, _| Ok("Ada Lovelace\n".to_string()));
        assert_eq!(git_config(&shell, "user.name").as_deref(), Some("Ada Lovelace"));
    }

    #[derive(Debug, Default)]
    struct ClosingHandler {
        emitted: AtomicUsize,
    }

    impl Handler for ClosingHandler {
        fn emit(&self, _level: Severity, _line: &str) -> io::Result<()> {
            if self.emitted.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(())
            } else {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
        }
    }

    #[test]
    fn rollback_happens_even_when_the_report_stream_fails() {
        let mut h = Harness::new();
        h.logger = ReportLogger::builder()
            .sink(Arc::new(Sink::new("closing", Arc::new(ClosingHandler::default()))))
            .formatter(Arc::new(ReportFormatter::with_working_dir(ROOT)))
            .build();

        let created = Arc::new(AtomicBool::new(false));
        let seen = created.clone();
        h.fs.expect_exists()
            .returning(move |_| seen.load(Ordering::SeqCst));
        h.fs.expect_create_dir_all().returning(move |_| {
            created.store(true, Ordering::SeqCst);
            Ok(())
        });
        h.fs.expect_remove_dir_all()
            .withf(|p| p.ends_with("demo"))
            .times(1)
            .returning(|_| Ok(()));

        let s = Structure::new()
            .with_file("README.md", FileSpec::new("x"))
            .unwrap();
        let err = create_structure(s, opts(), &h.ctx()).unwrap_err();

        // the first failure is returned, not the one from reporting `remove`
        assert_eq!(
            err,
            SproutError::Report {
                reason: "closed".into()
            }
        );
    }

    #[test]
    fn init_git_is_skipped_when_disabled() {
        let h = Harness::new();
        init_git(Structure::new(), opts().git(false), &h.ctx()).unwrap();
        assert!(h.capture.lines().is_empty());
    }
}
