//! Core domain layer for Sprout.
//!
//! Pure data and rules: what a project looks like and which options shape
//! it. All I/O happens behind the ports of [`crate::application`].
//!
//! - **No I/O**: building a [`Structure`] never touches the filesystem
//! - **Owned values**: options and structures are passed from action to action

mod options;
mod render;
mod structure;

pub use options::{
    DEFAULT_AUTHOR, DEFAULT_LICENSE, ScaffoldOpts, make_valid_identifier, validate_identifier,
};
pub use render::RenderContext;
pub use structure::{FilePolicy, FileSpec, Node, Structure};
