//! Optional additions to the default pipeline.

use std::fmt;

use crate::application::pipeline::{Action, Pipeline, Position, ScaffoldContext};
use crate::domain::{FilePolicy, FileSpec, RenderContext, ScaffoldOpts, Structure};
use crate::error::{SproutError, SproutResult};

/// Plugs extra actions into a [`Pipeline`].
pub trait Extension: fmt::Debug + Send + Sync {
    /// Name used on the command line and in `ScaffoldOpts::extensions`.
    fn name(&self) -> &'static str;

    /// One line shown in `--help`.
    fn description(&self) -> &'static str;

    fn activate(&self, pipeline: &mut Pipeline) -> SproutResult<()>;
}

/// Generates Travis CI configuration and install script.
#[derive(Debug, Clone, Copy, Default)]
pub struct Travis;

impl Extension for Travis {
    fn name(&self) -> &'static str {
        "travis"
    }

    fn description(&self) -> &'static str {
        "Generate Travis CI configuration files"
    }

    fn activate(&self, pipeline: &mut Pipeline) -> SproutResult<()> {
        pipeline.register(
            Action::new("add_travis_files", add_travis_files),
            Position::After("define_structure"),
        )
    }
}

fn add_travis_files(
    mut structure: Structure,
    opts: ScaffoldOpts,
    ctx: &ScaffoldContext<'_>,
) -> SproutResult<(Structure, ScaffoldOpts)> {
    let render = RenderContext::from_opts(&opts);
    let config = render.render(&ctx.templates.template("travis")?);
    let install = render.render(&ctx.templates.template("travis_install")?);

    let files = Structure::new()
        .with_file(
            ".travis.yml",
            FileSpec::new(config).policy(FilePolicy::NoOverwrite),
        )?
        .with_file(
            "tests/travis_install.sh",
            FileSpec::new(install)
                .policy(FilePolicy::NoOverwrite)
                .executable(),
        )?;
    structure.merge(files)?;
    Ok((structure, opts))
}

/// Every extension that ships with sprout.
pub fn builtin() -> Vec<Box<dyn Extension>> {
    vec![Box::new(Travis)]
}

pub fn find(name: &str) -> SproutResult<Box<dyn Extension>> {
    builtin()
        .into_iter()
        .find(|ext| ext.name() == name)
        .ok_or_else(|| SproutError::ExtensionNotFound {
            name: name.to_string(),
        })
}

/// The default pipeline with the named extensions activated, in order.
pub fn pipeline_for(names: &[String]) -> SproutResult<Pipeline> {
    let mut pipeline = Pipeline::default();
    for name in names {
        find(name)?.activate(&mut pipeline)?;
    }
    Ok(pipeline)
}
