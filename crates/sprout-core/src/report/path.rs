//! Lexical path helpers used to shorten subjects in report lines.
//!
//! Nothing here touches the filesystem: paths are normalized by collapsing
//! `.` and `..` components textually, the way a shell user reads them.

use std::path::{Component, Path, PathBuf};

/// `true` for subjects that are clearly not paths (commands, free text).
pub(crate) fn is_free_text(subject: &str) -> bool {
    subject.is_empty() || subject.chars().any(char::is_whitespace)
}

/// Collapse `.` and `..` components without consulting the filesystem.
///
/// Leading `..` in relative paths are kept; `..` directly under the root is
/// dropped (`/..` is `/`). An empty result becomes `.`.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        PathBuf::from(".")
    } else {
        parts.iter().collect()
    }
}

/// Resolve `path` against `cwd` and normalize the result.
pub(crate) fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&cwd.join(path))
    }
}

/// Express the absolute `path` relative to the absolute `base`.
///
/// Returns `None` when the two paths do not share a root (different
/// drives on Windows).
pub(crate) fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let path: Vec<_> = path.components().collect();
    let base: Vec<_> = base.components().collect();

    if path.first() != base.first() {
        return None;
    }

    let common = path
        .iter()
        .zip(&base)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &path[common..] {
        relative.push(component);
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Some(relative)
}

/// Shortest readable spelling of `subject` as seen from `cwd`.
///
/// The relative spelling wins ties against the (normalized) given one.
pub(crate) fn abbreviate(subject: &str, cwd: &Path) -> String {
    if is_free_text(subject) {
        return subject.to_string();
    }

    let given = Path::new(subject);
    let fallback = normalize(given).to_string_lossy().into_owned();
    let cwd = normalize(cwd);

    match relative_to(&absolutize(given, &cwd), &cwd) {
        Some(relative) => {
            let relative = relative.to_string_lossy().into_owned();
            if relative.chars().count() <= fallback.chars().count() {
                relative
            } else {
                fallback
            }
        }
        None => fallback,
    }
}

/// `true` when `path` resolves to `cwd` itself.
pub(crate) fn is_current(path: &str, cwd: &Path) -> bool {
    !path.is_empty() && absolutize(Path::new(path), cwd) == normalize(cwd)
}
