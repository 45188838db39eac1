//! The ordered list of actions a scaffolding run goes through.

use std::fmt;

use tracing::{debug, instrument};

use crate::application::actions;
use crate::application::ports::{Filesystem, ShellRunner, TemplateSource};
use crate::domain::{ScaffoldOpts, Structure};
use crate::error::{SproutError, SproutResult};
use crate::report::ReportLogger;

/// Signature of a pipeline step.
pub type ActionFn =
    fn(Structure, ScaffoldOpts, &ScaffoldContext<'_>) -> SproutResult<(Structure, ScaffoldOpts)>;

/// A named step of the pipeline.
#[derive(Clone, Copy)]
pub struct Action {
    pub name: &'static str,
    pub run: ActionFn,
}

impl Action {
    pub const fn new(name: &'static str, run: ActionFn) -> Self {
        Self { name, run }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.name).finish()
    }
}

/// What every action gets to work with besides the structure and options.
#[derive(Clone, Copy)]
pub struct ScaffoldContext<'a> {
    pub logger: &'a ReportLogger,
    pub filesystem: &'a dyn Filesystem,
    pub shell: &'a dyn ShellRunner,
    pub templates: &'a dyn TemplateSource,
}

/// Where to insert an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position<'a> {
    First,
    Last,
    Before(&'a str),
    After(&'a str),
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    actions: Vec<Action>,
}

impl Default for Pipeline {
    /// The built-in actions, in order.
    fn default() -> Self {
        Self {
            actions: vec![
                Action::new("verify_options_consistency", actions::verify_options_consistency),
                Action::new("verify_project_dir", actions::verify_project_dir),
                Action::new("define_structure", actions::define_structure),
                Action::new("create_structure", actions::create_structure),
                Action::new("init_git", actions::init_git),
            ],
        }
    }
}

impl Pipeline {
    pub fn empty() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.actions.iter().map(|a| a.name).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position_of(name).is_ok()
    }

    /// Insert `action` relative to an existing one.
    pub fn register(&mut self, action: Action, position: Position<'_>) -> SproutResult<()> {
        let index = match position {
            Position::First => 0,
            Position::Last => self.actions.len(),
            Position::Before(anchor) => self.position_of(anchor)?,
            Position::After(anchor) => self.position_of(anchor)? + 1,
        };
        debug!(action = action.name, ?position, "registering action");
        self.actions.insert(index, action);
        Ok(())
    }

    /// Remove the first action called `name`.
    pub fn unregister(&mut self, name: &str) -> SproutResult<Action> {
        let index = self.position_of(name)?;
        Ok(self.actions.remove(index))
    }

    /// Run every action in order, threading structure and options through.
    ///
    /// Each action is reported as `invoke <name>` and runs one level deeper.
    #[instrument(skip_all, fields(project = %opts.project_path.display()))]
    pub fn run(
        &self,
        opts: ScaffoldOpts,
        ctx: &ScaffoldContext<'_>,
    ) -> SproutResult<(Structure, ScaffoldOpts)> {
        let mut state = (Structure::new(), opts);
        for action in &self.actions {
            ctx.logger.report("invoke", action.name)?;
            let _indent = ctx.logger.indent_one();
            debug!(action = action.name, "running action");
            state = (action.run)(state.0, state.1, ctx)?;
        }
        Ok(state)
    }

    fn position_of(&self, name: &str) -> SproutResult<usize> {
        self.actions
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| SproutError::ActionNotFound {
                name: name.to_string(),
            })
    }
}
