//! # kickoff
//!
//! Bootstrap new projects from skeletons: directory templates that live in
//! local directories, local git checkouts or remote git repositories. A
//! skeleton may inherit from a parent skeleton, possibly in another
//! repository, overriding its values and files.
//!
//! ## Quick Example
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//!
//! use kickoff::project::{self, CreateOptions, ProjectContext, TemplateContext};
//! use kickoff::repository::RepositoryManager;
//! use kickoff::skeleton::SkeletonLoader;
//!
//! # fn main() -> kickoff::error::Result<()> {
//! let manager = RepositoryManager::new(PathBuf::from("/tmp/kickoff-cache"));
//! let repository = manager.open_url("https://github.com/jane/skeletons")?;
//! let info = repository.find_skeleton("rust/cli")?;
//! let skeleton = SkeletonLoader::new(&manager).load(&info)?;
//!
//! let context = TemplateContext::new(
//!     ProjectContext::new("demo", "Jane Doe", "jane@example.com", "github.com", "jane"),
//!     skeleton.values.clone(),
//! );
//! let options = CreateOptions {
//!     target: Path::new("demo").to_path_buf(),
//!     dry_run: false,
//!     init_git: true,
//! };
//! let report = project::create(&skeleton, &context, &options, manager.git())?;
//! println!("{} files written", report.files.paths.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! - **Repositories (`repository`, `git`)**: a [`repository::RepositoryLocation`]
//!   names a directory or git URL; [`repository::RepositoryManager`] opens it
//!   (cloning and synchronizing remotes in a local cache) and
//!   [`repository::MultiRepository`] resolves names across every configured
//!   repository.
//! - **Skeletons (`skeleton`)**: the loader follows `parent` references and
//!   composes each skeleton onto its parent with the deep-merge rules in
//!   `skeleton::merge`. Reference cycles are detected.
//! - **Projects (`project`, `template`)**: the materializer writes a composed
//!   skeleton into an output directory, rendering templated filenames and
//!   `.skel` files against a [`project::TemplateContext`].
//! - **Collaborators (`config`, `license`, `gitignore`)**: the user
//!   configuration file and the license / gitignore providers.
//!
//! Everything runs single-threaded; errors are reported through
//! [`error::Error`].

pub mod config;
pub mod defaults;
pub mod error;
pub mod git;
pub mod gitignore;
pub mod license;
pub mod output;
pub mod path;
pub mod project;
pub mod repository;
pub mod skeleton;
pub mod suggestions;
pub mod template;

#[cfg(test)]
mod path_proptest;
