//! In-memory description of a project's files and directories.
//!
//! A [`Structure`] is built up by the pipeline's actions and only written to
//! disk by `create_structure`. Nothing here touches the filesystem.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::error::{SproutError, SproutResult};

/// What to do when a file already exists on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilePolicy {
    /// Always write.
    #[default]
    Overwrite,
    /// Never replace an existing file, even with `--force`.
    NoOverwrite,
    /// Leave the file alone when updating an existing project.
    SkipOnUpdate,
}

/// Content and write policy of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileSpec {
    pub content: String,
    pub policy: FilePolicy,
    pub executable: bool,
}

impl FileSpec {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn policy(mut self, policy: FilePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    File(FileSpec),
    Dir(Structure),
}

impl Node {
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Dir(_))
    }
}

/// Ordered tree of named [`Node`]s.
///
/// Paths handed to the mutating methods are relative and `/`-separated;
/// absolute paths and `..` segments are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Structure {
    entries: BTreeMap<String, Node>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct children, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Add or replace the file at `path`, creating intermediate directories.
    pub fn ensure(&mut self, path: impl AsRef<Path>, file: FileSpec) -> SproutResult<()> {
        self.insert(path.as_ref(), Node::File(file))
    }

    /// Make sure a (possibly empty) directory exists at `path`.
    pub fn ensure_dir(&mut self, path: impl AsRef<Path>) -> SproutResult<()> {
        let path = path.as_ref();
        let segments = segments(path)?;
        let mut dir = self;
        for segment in &segments {
            dir = dir.child_dir(segment, path)?;
        }
        Ok(())
    }

    /// Builder form of [`ensure`](Self::ensure).
    pub fn with_file(mut self, path: impl AsRef<Path>, file: FileSpec) -> SproutResult<Self> {
        self.ensure(path, file)?;
        Ok(self)
    }

    /// Remove whatever lives at `path`. Missing entries are not an error.
    pub fn reject(&mut self, path: impl AsRef<Path>) -> SproutResult<Option<Node>> {
        let segments = segments(path.as_ref())?;
        let Some((last, parents)) = segments.split_last() else {
            return Ok(None);
        };

        let mut dir = self;
        for segment in parents {
            match dir.entries.get_mut(segment) {
                Some(Node::Dir(child)) => dir = child,
                _ => return Ok(None),
            }
        }
        Ok(dir.entries.remove(last))
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Node> {
        let segments = segments(path.as_ref()).ok()?;
        let (last, parents) = segments.split_last()?;

        let mut dir = self;
        for segment in parents {
            match dir.entries.get(segment) {
                Some(Node::Dir(child)) => dir = child,
                _ => return None,
            }
        }
        dir.entries.get(last)
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.get(path).is_some()
    }

    /// Merge `other` into `self`.
    ///
    /// Directories merge recursively and files from `other` win. A path that
    /// is a file on one side and a directory on the other is an error.
    pub fn merge(&mut self, other: Structure) -> SproutResult<()> {
        self.merge_at(other, Path::new(""))
    }

    fn merge_at(&mut self, other: Structure, at: &Path) -> SproutResult<()> {
        for (name, node) in other.entries {
            let path = at.join(&name);
            match self.entries.get_mut(&name) {
                Some(Node::Dir(mine)) => match node {
                    Node::Dir(theirs) => mine.merge_at(theirs, &path)?,
                    Node::File(_) => return Err(clash(&path)),
                },
                Some(Node::File(_)) if node.is_dir() => return Err(clash(&path)),
                _ => {
                    self.entries.insert(name, node);
                }
            }
        }
        Ok(())
    }

    /// Every file in the tree with its relative path, depth first.
    pub fn files(&self) -> Vec<(PathBuf, &FileSpec)> {
        let mut out = Vec::new();
        self.collect_files(Path::new(""), &mut out);
        out
    }

    fn collect_files<'a>(&'a self, at: &Path, out: &mut Vec<(PathBuf, &'a FileSpec)>) {
        for (name, node) in &self.entries {
            match node {
                Node::File(file) => out.push((at.join(name), file)),
                Node::Dir(dir) => dir.collect_files(&at.join(name), out),
            }
        }
    }

    fn insert(&mut self, path: &Path, node: Node) -> SproutResult<()> {
        let segments = segments(path)?;
        let Some((last, parents)) = segments.split_last() else {
            return Err(SproutError::InvalidStructure {
                path: path.display().to_string(),
                reason: "empty path".into(),
            });
        };

        let mut dir = self;
        for segment in parents {
            dir = dir.child_dir(segment, path)?;
        }
        if matches!(dir.entries.get(last), Some(Node::Dir(_))) {
            return Err(clash(path));
        }
        dir.entries.insert(last.clone(), node);
        Ok(())
    }

    fn child_dir(&mut self, name: &str, full: &Path) -> SproutResult<&mut Structure> {
        let node = self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| Node::Dir(Structure::new()));
        match node {
            Node::Dir(dir) => Ok(dir),
            Node::File(_) => Err(clash(full)),
        }
    }
}

fn clash(path: &Path) -> SproutError {
    SproutError::InvalidStructure {
        path: path.display().to_string(),
        reason: "a file and a directory share this path".into(),
    }
}

fn segments(path: &Path) -> SproutResult<Vec<String>> {
    let invalid = |reason: &str| SproutError::InvalidStructure {
        path: path.display().to_string(),
        reason: reason.to_string(),
    };

    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| match c {
            Component::Normal(s) => Ok(s.to_string_lossy().into_owned()),
            Component::ParentDir => Err(invalid("'..' is not allowed")),
            _ => Err(invalid("paths must be relative")),
        })
        .collect()
}
