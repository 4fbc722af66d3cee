//! # Skeletons
//!
//! A skeleton is a directory holding a `.kickoff.yaml` marker file plus the
//! files that make up a project template. The marker file may name a parent
//! skeleton, whose values and files are inherited and can be overridden.
//!
//! - [`SkeletonConfig`] is the parsed marker file.
//! - [`FileEntry`] is a snapshot of one file or directory inside a skeleton.
//! - [`Skeleton`] is the composed result of a skeleton and all of its
//!   ancestors, produced by [`loader::SkeletonLoader`] using the rules in
//!   [`merge`].

pub mod loader;
pub mod merge;
#[cfg(test)]
mod merge_proptest;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use walkdir::WalkDir;

use crate::defaults::SKELETON_CONFIG_FILENAME;
use crate::error::{Error, Result};
use crate::path::relative_slash_path;
use crate::repository::SkeletonInfo;

pub use loader::SkeletonLoader;
pub use merge::{merge, merge_files, merge_pair, merge_values};

/// Address of a parent skeleton as written in a marker file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Reference {
    /// Location of the repository holding the parent. Defaults to the
    /// repository of the skeleton that declares it. Relative local paths
    /// are resolved against that skeleton's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    pub skeleton: String,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repository {
            Some(repository) => write!(f, "{} (in {})", self.skeleton, repository),
            None => f.write_str(&self.skeleton),
        }
    }
}

/// Contents of a skeleton's marker file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkeletonConfig {
    pub description: String,
    pub values: Mapping,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Reference>,
}

impl SkeletonConfig {
    /// Load and parse the marker file at `path`.
    ///
    /// An empty file is a valid, empty configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| Error::filesystem("read", path, e))?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| Error::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
            hint: Some(
                "Allowed keys are `description`, `values` and `parent` \
                 (with `repository` and `skeleton`)"
                    .to_string(),
            ),
        })
    }
}

/// One file or directory of a skeleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Forward-slash path relative to the skeleton root.
    pub path: String,
    /// Absolute path of the source on disk.
    pub source: PathBuf,
    /// Unix permission bits.
    pub mode: u32,
    pub is_dir: bool,
    /// True when the entry comes from an ancestor and was not overridden.
    pub inherited: bool,
}

impl FileEntry {
    /// Returns true for files rendered through the template engine.
    pub fn is_template(&self) -> bool {
        !self.is_dir && self.path.ends_with(crate::defaults::TEMPLATE_SUFFIX)
    }
}

/// Collect every file and directory below `root`, sorted by path.
///
/// The marker file at the root and `.git` directories are skipped.
pub fn collect_files(root: &Path) -> Result<Vec<FileEntry>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git");

    for entry in walker {
        let entry = entry.map_err(|e| Error::Filesystem {
            message: format!("Failed to walk skeleton '{}': {}", root.display(), e),
        })?;

        if entry.depth() == 1 && entry.file_name() == SKELETON_CONFIG_FILENAME {
            continue;
        }

        let Some(path) = relative_slash_path(root, entry.path()) else {
            continue;
        };

        let metadata =
            fs::metadata(entry.path()).map_err(|e| Error::filesystem("stat", entry.path(), e))?;

        files.push(FileEntry {
            path,
            source: entry.path().to_path_buf(),
            mode: file_mode(&metadata),
            is_dir: metadata.is_dir(),
            inherited: false,
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

#[cfg(unix)]
fn file_mode(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn file_mode(metadata: &fs::Metadata) -> u32 {
    if metadata.is_dir() {
        0o755
    } else if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}

/// A skeleton composed with all of its ancestors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skeleton {
    pub description: String,
    pub values: Mapping,
    /// Unique by path, sorted ascending.
    pub files: Vec<FileEntry>,
    pub info: SkeletonInfo,
    /// The composed parent, kept for introspection only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Skeleton>>,
}

impl Skeleton {
    /// Build the uncomposed skeleton for a single directory.
    pub fn from_config(config: SkeletonConfig, files: Vec<FileEntry>, info: SkeletonInfo) -> Self {
        Self {
            description: config.description,
            values: config.values,
            files,
            info,
            parent: None,
        }
    }

    /// Iterate over the parent chain, nearest ancestor first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Skeleton> {
        std::iter::successors(self.parent.as_deref(), |skeleton| {
            skeleton.parent.as_deref()
        })
    }

    /// Look up a file entry by its relative path.
    pub fn file(&self, path: &str) -> Option<&FileEntry> {
        self.files
            .binary_search_by(|entry| entry.path.as_str().cmp(path))
            .ok()
            .map(|idx| &self.files[idx])
    }
}
