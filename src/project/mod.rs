//! # Project Creation
//!
//! Creating a project materializes a composed skeleton into the output
//! directory and then runs the finishing steps:
//!
//! 1. write `LICENSE` when a license was selected
//! 2. write `.gitignore` when gitignore templates were selected
//! 3. initialize a git repository unless one exists
//!
//! Every step honors the dry-run flag; the returned [`Report`] is the same
//! either way.

pub mod context;
pub mod materialize;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use log::{debug, info};

use crate::defaults::{GITIGNORE_FILENAME, LICENSE_FILENAME};
use crate::error::{Error, Result};
use crate::license::fill_placeholders;
use crate::repository::GitOperations;
use crate::skeleton::Skeleton;

pub use context::{LicenseContext, ProjectContext, TemplateContext};
pub use materialize::{materialize, Materializer, Report, Stats};

/// Settings for [`create`].
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Directory the project is written to.
    pub target: PathBuf,
    pub dry_run: bool,
    /// Run `git init` in the target unless it already is a repository.
    pub init_git: bool,
}

/// Outcome of [`create`].
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct CreateReport {
    #[serde(flatten)]
    pub files: Report,
    pub license_written: bool,
    pub gitignore_written: bool,
    pub git_initialized: bool,
}

/// Materialize `skeleton` and run the finishing steps.
pub fn create(
    skeleton: &Skeleton,
    context: &TemplateContext,
    options: &CreateOptions,
    git: &dyn GitOperations,
) -> Result<CreateReport> {
    info!(
        "creating project {:?} in {}",
        context.project.name,
        options.target.display()
    );

    let files = materialize(skeleton, &options.target, context, options.dry_run)?;
    let mut report = CreateReport {
        files,
        ..Default::default()
    };

    if let Some(license) = &context.license {
        write_license(&options.target, license, &context.project.author, options.dry_run)?;
        report.license_written = true;
        record_once(&mut report.files, LICENSE_FILENAME);
    }

    if let Some(gitignore) = &context.gitignore {
        write_gitignore(&options.target, gitignore, options.dry_run)?;
        report.gitignore_written = true;
        record_once(&mut report.files, GITIGNORE_FILENAME);
    }

    if options.init_git {
        report.git_initialized = init_git(&options.target, git, options.dry_run)?;
    }

    Ok(report)
}

fn record_once(report: &mut Report, path: &str) {
    if !report.paths.iter().any(|p| p == path) {
        report.record(path.to_string());
    }
}

/// Write the license text with `[fullname]` and `[year]` filled in.
pub fn write_license(
    target: &Path,
    license: &LicenseContext,
    fullname: &str,
    dry_run: bool,
) -> Result<()> {
    let year = chrono::Local::now().year();
    let body = fill_placeholders(&license.body, fullname, year);
    write_text(&target.join(LICENSE_FILENAME), &body, dry_run)
}

pub fn write_gitignore(target: &Path, content: &str, dry_run: bool) -> Result<()> {
    write_text(&target.join(GITIGNORE_FILENAME), content, dry_run)
}

fn write_text(path: &Path, content: &str, dry_run: bool) -> Result<()> {
    debug!("writing {}", path.display());
    if dry_run {
        return Ok(());
    }
    fs::write(path, content).map_err(|e| Error::filesystem("write file", path, e))
}

/// Initialize a git repository at `target` unless it already is one.
///
/// Returns true when a repository was (or, in a dry run, would be) created.
pub fn init_git(target: &Path, git: &dyn GitOperations, dry_run: bool) -> Result<bool> {
    if git.is_repository(target) {
        debug!("{} is already a git repository", target.display());
        return Ok(false);
    }
    if !dry_run {
        git.init(target)?;
    }
    Ok(true)
}
