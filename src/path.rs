//! Path manipulation utilities for kickoff
//!
//! Everything here is purely lexical: paths are never touched on disk, so the
//! results are deterministic and safe to use before anything has been
//! created.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path, removing `.` components and resolving `..`
/// against preceding normal components.
///
/// Leading `..` components of a relative path are kept, since there is
/// nothing to resolve them against. For absolute paths, `..` at the root is
/// dropped.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    let mut depth = 0usize;

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::RootDir => result.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    result.pop();
                    depth -= 1;
                } else if !result.has_root() {
                    result.push("..");
                }
            }
            Component::Normal(part) => {
                result.push(part);
                depth += 1;
            }
        }
    }

    result
}

/// Resolve `path` against `base` when it is relative, then normalize it.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    if raw == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(raw));
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

/// Render `path` relative to `root` as a forward-slash separated string.
///
/// Returns `None` when `path` is not below `root`.
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Split a forward-slash relative path into its directory and file name.
///
/// The directory part is empty for top-level entries.
pub fn split_slash_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

/// Join a forward-slash directory and a name.
pub fn join_slash_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Encode a URL path to be filesystem-safe
///
/// This converts characters that are problematic for filesystems into safe
/// alternatives while keeping path separators, so that a remote path like
/// `owner/repo` still maps onto nested cache directories.
pub fn encode_path_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| match c {
            '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | '/' | '@' | '~') => c,
            _ => '_',
        })
        .collect()
}
