//! # Error Handling
//!
//! This module defines the centralized error type for `kickoff`. It uses
//! `thiserror` to build a single `Error` enum covering every failure mode of
//! the library, each variant carrying enough context (skeleton name,
//! repository, path) to be reported to the user without further wrapping.
//!
//! The variants fall into a small number of categories:
//!
//! - **Not found**: a repository path, a skeleton, a repository alias or a
//!   license key does not exist.
//! - **Ambiguous**: an unqualified skeleton name matches more than one
//!   repository.
//! - **Cycle**: a skeleton's parent chain references itself.
//! - **Validation**: bad configuration, malformed locations, unsafe templated
//!   paths, template errors and incompatible value merges.
//! - **I/O**: filesystem failures.
//! - **Remote**: git clone/checkout/pull failures and HTTP failures.
//!
//! The `Result<T>` alias is used throughout the crate.

use thiserror::Error;

/// Main error type for kickoff operations
#[derive(Error, Debug)]
pub enum Error {
    /// A configuration file (user config or skeleton marker file) could not
    /// be parsed.
    #[error("Configuration parsing error in {path}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        path: String,
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A repository location string could not be parsed.
    #[error("Invalid repository location {location:?}: {message}")]
    InvalidLocation { location: String, message: String },

    /// The local directory backing a repository does not exist or is not
    /// usable.
    #[error("Repository not found: {location}: {message}")]
    RepositoryNotFound { location: String, message: String },

    /// A skeleton name did not resolve within a repository.
    #[error("Skeleton {name:?} not found in {repository}")]
    SkeletonNotFound { name: String, repository: String },

    /// A qualified skeleton name referenced an alias that is not configured.
    #[error("Unknown repository alias {alias:?}")]
    UnknownRepository { alias: String },

    /// An unqualified skeleton name exists in more than one repository.
    #[error("Skeleton {name:?} is ambiguous, found in repositories: {}; qualify it as <repository>:{name}", repositories.join(", "))]
    AmbiguousSkeleton {
        name: String,
        repositories: Vec<String>,
    },

    /// A skeleton's parent chain visits the same reference twice.
    #[error("Cycle detected in skeleton parents: {reference} was already visited")]
    CycleDetected { reference: String },

    /// Input failed a semantic check (value merge type mismatch, bad names).
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A templated filename rendered to something that would escape its
    /// directory.
    #[error("Validation error: template {template:?} renders to unsafe path {rendered:?}")]
    UnsafePath { template: String, rendered: String },

    /// An error occurred during template rendering.
    ///
    /// May include the name of the template (file or filename) being rendered.
    #[error("Template processing error: {message}{}", template.as_ref().map(|t| format!(" (template: {})", t)).unwrap_or_default())]
    Template {
        message: String,
        /// The template that failed, if known
        template: Option<String>,
    },

    /// An error occurred while cloning a Git repository.
    ///
    /// Includes the repository URL, revision, error message, and an
    /// optional hint for resolution.
    #[error("Git clone error for {url}@{revision}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    GitClone {
        url: String,
        revision: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// An error occurred while executing a Git command.
    #[error("Git command failed in {location}: git {command} - {stderr}")]
    GitCommand {
        command: String,
        location: String,
        stderr: String,
    },

    /// A license key is unknown to the license provider.
    #[error("License {key:?} not found")]
    LicenseNotFound { key: String },

    /// An error occurred during a network operation.
    #[error("Network operation error: {url} - {message}")]
    Network { url: String, message: String },

    /// An error with a filesystem operation, with path context.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Build a `Filesystem` error for a failed operation on `path`.
    pub fn filesystem(action: &str, path: &std::path::Path, err: std::io::Error) -> Self {
        Error::Filesystem {
            message: format!("Failed to {} '{}': {}", action, path.display(), err),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
