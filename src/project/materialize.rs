//! Writing a composed skeleton into a project directory.
//!
//! Entries are processed in path order, which puts every directory before
//! its contents. Each entry's file name is rendered as a template; when a
//! directory name renders to something new, the new path is remembered so
//! the directory's contents land below it.
//!
//! A rendered name must stay a single path component inside its directory.
//! Anything else (`..`, `a/b`, an empty string) is rejected before the entry
//! is written.
//!
//! A dry run renders everything and produces the same [`Report`] as a real
//! run, but does not touch the filesystem.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use log::debug;
use serde::Serialize;

use super::context::TemplateContext;
use crate::defaults::TEMPLATE_SUFFIX;
use crate::error::{Error, Result};
use crate::path::{join_slash_path, normalize_path, split_slash_path};
use crate::skeleton::{FileEntry, Skeleton};
use crate::template::TemplateEngine;

/// Counters collected while materializing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub dirs_created: usize,
    pub files_copied: usize,
    pub templates_rendered: usize,
}

/// What a materialization produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub stats: Stats,
    /// Relative output paths in the order they were produced.
    pub paths: Vec<String>,
}

impl Report {
    pub(crate) fn record(&mut self, path: String) {
        self.paths.push(path);
    }
}

/// Writes a skeleton's files below a target directory.
pub struct Materializer<'a> {
    target: &'a Path,
    engine: TemplateEngine,
    dry_run: bool,
    renamed_dirs: HashMap<String, String>,
    report: Report,
}

impl<'a> Materializer<'a> {
    pub fn new(target: &'a Path, context: &TemplateContext, dry_run: bool) -> Result<Self> {
        Ok(Self {
            target,
            engine: TemplateEngine::new(context)?,
            dry_run,
            renamed_dirs: HashMap::new(),
            report: Report::default(),
        })
    }

    /// Materialize every file of `skeleton` and return the report.
    pub fn run(mut self, skeleton: &Skeleton) -> Result<Report> {
        if !self.dry_run {
            fs::create_dir_all(self.target)
                .map_err(|e| Error::filesystem("create directory", self.target, e))?;
        }

        for entry in &skeleton.files {
            self.process(entry)?;
        }

        Ok(self.report)
    }

    fn process(&mut self, entry: &FileEntry) -> Result<()> {
        let (dir, name) = split_slash_path(&entry.path);

        let mut rendered_name = self.engine.render(&entry.path, name)?;
        if entry.is_template() {
            if let Some(stripped) = rendered_name.strip_suffix(TEMPLATE_SUFFIX) {
                rendered_name = stripped.to_string();
            }
        }

        let output_dir = self
            .renamed_dirs
            .get(dir)
            .cloned()
            .unwrap_or_else(|| dir.to_string());
        let output_path = join_slash_path(&output_dir, &rendered_name);
        validate_output_path(&entry.path, &output_dir, &rendered_name, &output_path)?;

        let destination = self.target.join(&output_path);
        debug!("{} -> {}", entry.path, destination.display());

        if entry.is_dir {
            self.create_dir(entry, &destination)?;
            self.report.stats.dirs_created += 1;
            if output_path != entry.path {
                self.renamed_dirs
                    .insert(entry.path.clone(), output_path.clone());
            }
        } else if entry.is_template() {
            let source = fs::read_to_string(&entry.source)
                .map_err(|e| Error::filesystem("read template", &entry.source, e))?;
            let content = self.engine.render(&entry.path, &source)?;
            self.write_file(entry, &destination, content.as_bytes())?;
            self.report.stats.templates_rendered += 1;
        } else {
            self.copy_file(entry, &destination)?;
            self.report.stats.files_copied += 1;
        }

        self.report.record(output_path);
        Ok(())
    }

    fn create_dir(&self, entry: &FileEntry, destination: &Path) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        fs::create_dir_all(destination)
            .map_err(|e| Error::filesystem("create directory", destination, e))?;
        set_mode(destination, entry.mode)
    }

    fn write_file(&self, entry: &FileEntry, destination: &Path, content: &[u8]) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        ensure_parent(destination)?;
        fs::write(destination, content)
            .map_err(|e| Error::filesystem("write file", destination, e))?;
        set_mode(destination, entry.mode)
    }

    fn copy_file(&self, entry: &FileEntry, destination: &Path) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        ensure_parent(destination)?;
        fs::copy(&entry.source, destination)
            .map_err(|e| Error::filesystem("copy file", &entry.source, e))?;
        set_mode(destination, entry.mode)
    }
}

/// Materialize `skeleton` into `target`.
pub fn materialize(
    skeleton: &Skeleton,
    target: &Path,
    context: &TemplateContext,
    dry_run: bool,
) -> Result<Report> {
    Materializer::new(target, context, dry_run)?.run(skeleton)
}

/// A rendered entry must be exactly one normal component below its
/// expected directory.
fn validate_output_path(
    template: &str,
    output_dir: &str,
    rendered_name: &str,
    output_path: &str,
) -> Result<()> {
    let unsafe_path = || Error::UnsafePath {
        template: template.to_string(),
        rendered: output_path.to_string(),
    };

    if rendered_name.trim().is_empty() || rendered_name.contains('\\') {
        return Err(unsafe_path());
    }

    let normalized = normalize_path(Path::new(output_path));
    if normalized.parent() != Some(Path::new(output_dir))
        || normalized.file_name() != Some(OsStr::new(rendered_name))
    {
        return Err(unsafe_path());
    }

    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.exists() => fs::create_dir_all(parent)
            .map_err(|e| Error::filesystem("create directory", parent, e)),
        _ => Ok(()),
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(|e| Error::filesystem("set permissions on", path, e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
