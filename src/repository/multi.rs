//! Lookup across every configured repository.
//!
//! Repositories are opened on demand for each call; nothing is cached
//! between calls, so listing and resolving in the same invocation opens
//! (and for remotes, synchronizes) each repository again.

use std::collections::BTreeMap;

use log::debug;

use super::{Repository, RepositoryLocation, RepositoryManager, SkeletonInfo};
use crate::error::{Error, Result};

/// Separator between a repository alias and a skeleton name.
pub const ALIAS_SEPARATOR: char = ':';

/// A set of named repositories.
#[derive(Debug)]
pub struct MultiRepository<'a> {
    manager: &'a RepositoryManager,
    repositories: BTreeMap<String, String>,
}

impl<'a> MultiRepository<'a> {
    /// Create a lookup over `repositories` (alias → location string).
    pub fn new(manager: &'a RepositoryManager, repositories: BTreeMap<String, String>) -> Self {
        Self {
            manager,
            repositories,
        }
    }

    /// Configured aliases in sorted order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.repositories.keys().map(String::as_str)
    }

    /// Open the repository configured under `alias`.
    pub fn open(&self, alias: &str) -> Result<Repository> {
        let raw = self
            .repositories
            .get(alias)
            .ok_or_else(|| Error::UnknownRepository {
                alias: alias.to_string(),
            })?;
        let location = RepositoryLocation::parse(raw)?;
        debug!("opening repository {:?} from {}", alias, location);
        Ok(self.manager.open(&location)?.with_name(alias))
    }

    /// Resolve a skeleton name, optionally qualified as `alias:name`.
    ///
    /// An unqualified name must match in exactly one repository.
    pub fn resolve(&self, name: &str) -> Result<SkeletonInfo> {
        if let Some((alias, skeleton)) = split_qualified(name) {
            return self.open(alias)?.find_skeleton(skeleton);
        }

        let mut matches = Vec::new();
        for alias in self.repositories.keys() {
            let repository = self.open(alias)?;
            match repository.find_skeleton(name) {
                Ok(info) => matches.push(info),
                Err(Error::SkeletonNotFound { .. }) => {}
                Err(err) => return Err(err),
            }
        }

        match matches.len() {
            0 => Err(Error::SkeletonNotFound {
                name: name.to_string(),
                repository: format!(
                    "any configured repository ({})",
                    self.aliases().collect::<Vec<_>>().join(", ")
                ),
            }),
            1 => Ok(matches.remove(0)),
            _ => Err(Error::AmbiguousSkeleton {
                name: name.to_string(),
                repositories: matches
                    .into_iter()
                    .filter_map(|info| info.repository.name)
                    .collect(),
            }),
        }
    }

    /// List the skeletons of every repository, in alias order.
    pub fn list_all(&self) -> Result<Vec<SkeletonInfo>> {
        let mut skeletons = Vec::new();
        for alias in self.repositories.keys() {
            skeletons.extend(self.open(alias)?.list_skeletons()?);
        }
        Ok(skeletons)
    }

    /// List the skeletons of a single repository.
    pub fn list_repository(&self, alias: &str) -> Result<Vec<SkeletonInfo>> {
        self.open(alias)?.list_skeletons()
    }
}

/// Split `alias:name` into its parts.
///
/// Strings that look like a URL are not treated as qualified.
pub fn split_qualified(name: &str) -> Option<(&str, &str)> {
    let (alias, skeleton) = name.split_once(ALIAS_SEPARATOR)?;
    if alias.is_empty() || skeleton.is_empty() || skeleton.starts_with("//") {
        return None;
    }
    Some((alias, skeleton))
}
