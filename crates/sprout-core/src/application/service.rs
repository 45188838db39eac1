//! Scaffold Service - main application orchestrator.
//!
//! Builds the pipeline for the requested extensions and runs it against the
//! injected adapters.

use tracing::{info, instrument};

use crate::application::extensions;
use crate::application::pipeline::{Pipeline, ScaffoldContext};
use crate::application::ports::{Filesystem, ShellRunner, TemplateSource};
use crate::domain::{ScaffoldOpts, Structure};
use crate::error::SproutResult;
use crate::report::ReportLogger;

/// Main scaffolding service.
pub struct ScaffoldService {
    filesystem: Box<dyn Filesystem>,
    shell: Box<dyn ShellRunner>,
    templates: Box<dyn TemplateSource>,
}

impl ScaffoldService {
    /// Create a new scaffold service with the given adapters.
    ///
    /// ```rust,no_run
    /// use sprout_core::application::ScaffoldService;
    /// # fn adapters() -> (
    /// #     Box<dyn sprout_core::application::ports::Filesystem>,
    /// #     Box<dyn sprout_core::application::ports::ShellRunner>,
    /// #     Box<dyn sprout_core::application::ports::TemplateSource>,
    /// # ) { unimplemented!() }
    /// let (filesystem, shell, templates) = adapters();
    /// let service = ScaffoldService::new(filesystem, shell, templates);
    /// ```
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        shell: Box<dyn ShellRunner>,
        templates: Box<dyn TemplateSource>,
    ) -> Self {
        Self {
            filesystem,
            shell,
            templates,
        }
    }

    /// The pipeline `opts` would run.
    pub fn pipeline(&self, opts: &ScaffoldOpts) -> SproutResult<Pipeline> {
        extensions::pipeline_for(&opts.extensions)
    }

    /// Create or update the project described by `opts`.
    ///
    /// Progress goes to `logger`; the final structure and options are
    /// returned.
    #[instrument(
        skip_all,
        fields(
            project = %opts.project_path.display(),
            update = opts.update,
            pretend = opts.pretend
        )
    )]
    pub fn create_project(
        &self,
        opts: ScaffoldOpts,
        logger: &ReportLogger,
    ) -> SproutResult<(Structure, ScaffoldOpts)> {
        let pipeline = self.pipeline(&opts)?;
        info!(actions = ?pipeline.names(), "scaffolding");

        let ctx = ScaffoldContext {
            logger,
            filesystem: self.filesystem.as_ref(),
            shell: self.shell.as_ref(),
            templates: self.templates.as_ref(),
        };
        pipeline.run(opts, &ctx)
    }
}
