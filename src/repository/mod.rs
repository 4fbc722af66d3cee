//! # Skeleton Repositories
//!
//! A repository is a directory tree that contains skeletons. It can be a
//! plain local directory, a local git checkout pinned to a revision, or a
//! remote git repository cloned into the on-disk cache.
//!
//! ## Design
//!
//! Repositories are only ever created through [`RepositoryManager::open`],
//! which picks the [`RepositoryKind`] from the location, performs the
//! kind-specific open/synchronize step exactly once, and returns an
//! immutable [`Repository`]. The manager carries the cache root and the git
//! backend explicitly, so tests can point it at a temporary directory and
//! swap in a mock [`GitOperations`] implementation.
//!
//! ```text
//! RepositoryLocation ──open──▶ Repository ──find_skeleton / list_skeletons──▶ SkeletonInfo
//! ```

pub mod location;
pub mod multi;

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;
use walkdir::WalkDir;

use crate::defaults::SKELETON_CONFIG_FILENAME;
use crate::error::{Error, Result};
use crate::path::relative_slash_path;

pub use location::RepositoryLocation;
pub use multi::MultiRepository;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations {
    /// Clones `url` at `revision` into `target_dir`, creating parent
    /// directories as needed.
    fn clone_repository(&self, url: &str, revision: &str, target_dir: &Path) -> Result<()>;

    /// Returns true if `path` is the root of a git working tree.
    fn is_repository(&self, path: &Path) -> bool;

    /// Returns true if the working tree has uncommitted changes.
    fn is_dirty(&self, repo: &Path) -> Result<bool>;

    /// Discards all uncommitted changes in the working tree.
    fn discard_changes(&self, repo: &Path) -> Result<()>;

    /// Checks out `revision`; `force` overwrites local modifications.
    fn checkout(&self, repo: &Path, revision: &str, force: bool) -> Result<()>;

    /// Pulls `revision` from the origin remote.
    fn pull(&self, repo: &Path, revision: &str) -> Result<()>;

    /// Initializes a new repository at `path`.
    fn init(&self, path: &Path) -> Result<()>;

    /// Reads a value from the user's git configuration.
    fn config_value(&self, key: &str) -> Option<String>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command to perform real Git operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn clone_repository(&self, url: &str, revision: &str, target_dir: &Path) -> Result<()> {
        crate::git::clone_shallow(url, revision, target_dir)
    }

    fn is_repository(&self, path: &Path) -> bool {
        crate::git::is_repository(path)
    }

    fn is_dirty(&self, repo: &Path) -> Result<bool> {
        crate::git::is_dirty(repo)
    }

    fn discard_changes(&self, repo: &Path) -> Result<()> {
        crate::git::discard_changes(repo)
    }

    fn checkout(&self, repo: &Path, revision: &str, force: bool) -> Result<()> {
        crate::git::checkout(repo, revision, force)
    }

    fn pull(&self, repo: &Path, revision: &str) -> Result<()> {
        crate::git::pull(repo, revision)
    }

    fn init(&self, path: &Path) -> Result<()> {
        crate::git::init(path)
    }

    fn config_value(&self, key: &str) -> Option<String> {
        crate::git::config_value(key)
    }
}

/// The physical kind of a repository, derived from its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepositoryKind {
    /// A plain local directory, used as-is.
    LocalDirectory,
    /// A local git working tree checked out at a revision.
    LocalGitCheckout,
    /// A remote git repository cloned into the cache.
    RemoteGit,
}

impl RepositoryKind {
    /// Select the kind for a location.
    pub fn for_location(location: &RepositoryLocation) -> Self {
        match location {
            RepositoryLocation::Local { revision: None, .. } => RepositoryKind::LocalDirectory,
            RepositoryLocation::Local {
                revision: Some(_), ..
            } => RepositoryKind::LocalGitCheckout,
            RepositoryLocation::Remote { .. } => RepositoryKind::RemoteGit,
        }
    }
}

impl fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RepositoryKind::LocalDirectory => "local directory",
            RepositoryKind::LocalGitCheckout => "local git checkout",
            RepositoryKind::RemoteGit => "remote git",
        };
        f.write_str(name)
    }
}

/// Identity of an opened repository.
///
/// This is plain data; holding it does not keep anything open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryInfo {
    /// Alias under which the repository is configured, if any.
    pub name: Option<String>,
    /// Where the repository comes from.
    pub location: RepositoryLocation,
    /// Directory on disk holding the repository's files.
    pub root: PathBuf,
}

impl fmt::Display for RepositoryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "repository {:?} ({})", name, self.location),
            None => write!(f, "repository {}", self.location),
        }
    }
}

/// A candidate skeleton directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkeletonInfo {
    /// Slash-separated path of the skeleton relative to the repository root.
    pub name: String,
    /// Absolute path of the skeleton directory.
    pub path: PathBuf,
    /// The repository the skeleton was found in.
    pub repository: RepositoryInfo,
}

impl SkeletonInfo {
    /// Path of the skeleton's marker config file.
    pub fn config_path(&self) -> PathBuf {
        self.path.join(SKELETON_CONFIG_FILENAME)
    }

    /// `alias:name` when the repository has an alias, otherwise the bare name.
    pub fn qualified_name(&self) -> String {
        match &self.repository.name {
            Some(alias) => format!("{}:{}", alias, self.name),
            None => self.name.clone(),
        }
    }
}

/// An opened repository.
#[derive(Debug, Clone)]
pub struct Repository {
    kind: RepositoryKind,
    info: RepositoryInfo,
}

impl Repository {
    /// Rebuild a handle for a repository that has already been opened, e.g.
    /// from the `RepositoryInfo` carried by a `SkeletonInfo`. No
    /// verification or synchronization is performed.
    pub fn from_info(info: RepositoryInfo) -> Self {
        Self {
            kind: RepositoryKind::for_location(&info.location),
            info,
        }
    }

    /// Attach the alias the repository is configured under.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.info.name = Some(name.into());
        self
    }

    pub fn kind(&self) -> RepositoryKind {
        self.kind
    }

    pub fn info(&self) -> &RepositoryInfo {
        &self.info
    }

    pub fn root(&self) -> &Path {
        &self.info.root
    }

    /// Look up the skeleton `name` directly below the repository root.
    ///
    /// The candidate directory only counts as a skeleton when the marker
    /// config file exists directly inside it.
    pub fn find_skeleton(&self, name: &str) -> Result<SkeletonInfo> {
        validate_skeleton_name(name)?;

        let path = self.info.root.join(name);
        if !path.join(SKELETON_CONFIG_FILENAME).is_file() {
            return Err(Error::SkeletonNotFound {
                name: name.to_string(),
                repository: self.info.to_string(),
            });
        }

        Ok(SkeletonInfo {
            name: name.trim_matches('/').to_string(),
            path,
            repository: self.info.clone(),
        })
    }

    /// List every skeleton in the repository, including skeletons nested
    /// inside other skeletons, sorted by name.
    pub fn list_skeletons(&self) -> Result<Vec<SkeletonInfo>> {
        let root = &self.info.root;
        let mut skeletons = Vec::new();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != ".git");

        for entry in walker {
            let entry = entry.map_err(|e| Error::Filesystem {
                message: format!("Failed to walk repository '{}': {}", root.display(), e),
            })?;

            if !entry.file_type().is_dir() {
                continue;
            }

            if !entry.path().join(SKELETON_CONFIG_FILENAME).is_file() {
                continue;
            }

            if let Some(name) = relative_slash_path(root, entry.path()) {
                skeletons.push(SkeletonInfo {
                    name,
                    path: entry.path().to_path_buf(),
                    repository: self.info.clone(),
                });
            }
        }

        skeletons.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skeletons)
    }
}

fn validate_skeleton_name(name: &str) -> Result<()> {
    let trimmed = name.trim_matches('/');
    if trimmed.is_empty()
        || name.starts_with('/')
        || trimmed.split('/').any(|part| part == ".." || part == "." || part.is_empty())
    {
        return Err(Error::Validation {
            message: format!("invalid skeleton name {:?}", name),
        });
    }
    Ok(())
}

/// The main entry point for opening repositories.
///
/// Holds the cache root for remote clones and the git backend.
pub struct RepositoryManager {
    cache_root: PathBuf,
    git: Box<dyn GitOperations>,
}

impl RepositoryManager {
    /// Creates a new `RepositoryManager` with the default Git operations,
    /// using `cache_root` for remote clones.
    pub fn new(cache_root: PathBuf) -> Self {
        Self {
            cache_root,
            git: Box::new(DefaultGitOperations),
        }
    }

    /// Creates a `RepositoryManager` with a custom `GitOperations`
    /// implementation.
    pub fn with_operations(cache_root: PathBuf, git: Box<dyn GitOperations>) -> Self {
        Self { cache_root, git }
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    pub fn git(&self) -> &dyn GitOperations {
        self.git.as_ref()
    }

    /// Parse `raw` and open the repository it names.
    pub fn open_url(&self, raw: &str) -> Result<Repository> {
        let location = RepositoryLocation::parse(raw)?;
        self.open(&location)
    }

    /// Open the repository at `location`.
    ///
    /// - local directory: verify it exists
    /// - local git checkout: verify it is a working tree, check out the revision
    /// - remote: clone into the cache if needed, then discard local changes,
    ///   check out and pull the revision
    pub fn open(&self, location: &RepositoryLocation) -> Result<Repository> {
        let kind = RepositoryKind::for_location(location);
        let root = location.local_path(&self.cache_root);
        debug!("opening {} repository {} at {}", kind, location, root.display());

        match kind {
            RepositoryKind::LocalDirectory => self.open_directory(location, &root)?,
            RepositoryKind::LocalGitCheckout => self.open_checkout(location, &root)?,
            RepositoryKind::RemoteGit => self.open_remote(location, &root)?,
        }

        Ok(Repository {
            kind,
            info: RepositoryInfo {
                name: None,
                location: location.clone(),
                root,
            },
        })
    }

    fn open_directory(&self, location: &RepositoryLocation, root: &Path) -> Result<()> {
        if !root.is_dir() {
            return Err(Error::RepositoryNotFound {
                location: location.to_string(),
                message: format!("{} is not a directory", root.display()),
            });
        }
        Ok(())
    }

    fn open_checkout(&self, location: &RepositoryLocation, root: &Path) -> Result<()> {
        self.open_directory(location, root)?;
        if !self.git.is_repository(root) {
            return Err(Error::RepositoryNotFound {
                location: location.to_string(),
                message: format!("{} is not a git repository", root.display()),
            });
        }
        if let Some(revision) = location.revision() {
            self.git.checkout(root, revision, false)?;
        }
        Ok(())
    }

    fn open_remote(&self, location: &RepositoryLocation, root: &Path) -> Result<()> {
        let revision = location
            .revision()
            .unwrap_or(crate::defaults::DEFAULT_REVISION);

        if !self.git.is_repository(root) {
            info!("cloning {} into {}", location, root.display());
            return self
                .git
                .clone_repository(&location.git_url(), revision, root);
        }

        // The cache is owned by kickoff, local edits in it are never kept.
        if self.git.is_dirty(root)? {
            warn!(
                "discarding uncommitted changes in cached clone {}",
                root.display()
            );
        }
        self.git.discard_changes(root)?;
        self.git.checkout(root, revision, true)?;
        info!("updating {} in {}", location, root.display());
        self.git.pull(root, revision)
    }
}

impl fmt::Debug for RepositoryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryManager")
            .field("cache_root", &self.cache_root)
            .finish_non_exhaustive()
    }
}
