//! Resolution of a skeleton and its parent chain.
//!
//! Loading a skeleton reads its marker file and files, then follows the
//! `parent` reference (possibly into another repository) until a skeleton
//! without a parent is reached. The chain is composed root first, so each
//! child is merged on top of its fully composed parent.
//!
//! Every reference is resolved to a `(repository location, skeleton name)`
//! pair before it is followed. Seeing the same pair twice while loading one
//! skeleton is a cycle.

use std::collections::HashSet;
use std::fmt;

use log::debug;

use super::{collect_files, merge_pair, Reference, Skeleton, SkeletonConfig};
use crate::error::{Error, Result};
use crate::repository::{Repository, RepositoryLocation, RepositoryManager, SkeletonInfo};

/// A parent reference with its repository made explicit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResolvedReference {
    location: String,
    skeleton: String,
}

impl ResolvedReference {
    fn of(info: &SkeletonInfo) -> Self {
        Self {
            location: info.repository.location.to_string(),
            skeleton: info.name.clone(),
        }
    }
}

impl fmt::Display for ResolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skeleton {:?} in {}", self.skeleton, self.location)
    }
}

/// Loads composed skeletons, opening parent repositories through a
/// [`RepositoryManager`].
#[derive(Debug)]
pub struct SkeletonLoader<'a> {
    manager: &'a RepositoryManager,
}

impl<'a> SkeletonLoader<'a> {
    pub fn new(manager: &'a RepositoryManager) -> Self {
        Self { manager }
    }

    /// Load the skeleton at `info` composed with all of its ancestors.
    pub fn load(&self, info: &SkeletonInfo) -> Result<Skeleton> {
        let mut visited = HashSet::new();
        visited.insert(ResolvedReference::of(info));
        self.load_chain(info, &mut visited)
    }

    /// Load several skeletons independently of each other.
    pub fn load_all(&self, infos: &[SkeletonInfo]) -> Result<Vec<Skeleton>> {
        infos.iter().map(|info| self.load(info)).collect()
    }

    fn load_chain(
        &self,
        info: &SkeletonInfo,
        visited: &mut HashSet<ResolvedReference>,
    ) -> Result<Skeleton> {
        debug!("loading skeleton {:?} from {}", info.name, info.path.display());

        let mut config = SkeletonConfig::load(&info.config_path())?;
        let parent = config.parent.take();
        let files = collect_files(&info.path)?;
        let skeleton = Skeleton::from_config(config, files, info.clone());

        let Some(reference) = parent else {
            return Ok(skeleton);
        };

        let (repository, name) = self.parent_repository(info, &reference)?;
        let key = ResolvedReference {
            location: repository.info().location.to_string(),
            skeleton: name,
        };
        if !visited.insert(key.clone()) {
            return Err(Error::CycleDetected {
                reference: key.to_string(),
            });
        }

        debug!("skeleton {:?} inherits from {}", info.name, key);
        let parent_info = repository.find_skeleton(&key.skeleton)?;
        let parent = self.load_chain(&parent_info, visited)?;

        merge_pair(parent, skeleton)
    }

    /// Open the repository a parent reference points into.
    ///
    /// Without an explicit repository the parent lives next to the child.
    /// Relative local repositories are resolved against the child's own
    /// directory.
    fn parent_repository(
        &self,
        info: &SkeletonInfo,
        reference: &Reference,
    ) -> Result<(Repository, String)> {
        let name = reference.skeleton.trim_matches('/').to_string();
        let current = &info.repository;

        let Some(raw) = &reference.repository else {
            return Ok((Repository::from_info(current.clone()), name));
        };

        let location = RepositoryLocation::parse_relative_to(raw, &info.path)?;
        if location == current.location {
            return Ok((Repository::from_info(current.clone()), name));
        }

        Ok((self.manager.open(&location)?, name))
    }
}
