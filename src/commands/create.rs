//! # Create Command Implementation
//!
//! This module implements the `create` subcommand, which bootstraps a new
//! project from one or more skeletons.
//!
//! ## Functionality
//!
//! - **Skeleton resolution**: each `--skeleton` is resolved across the
//!   configured repositories (`alias:name` picks a repository explicitly)
//!   and loaded with its full parent chain.
//! - **Composition**: the skeletons are merged left to right, later ones
//!   overriding earlier ones.
//! - **Values**: the configuration's `values`, every `--values` file and every
//!   `--set` override are layered on top of the composed skeleton's values,
//!   in that order.
//! - **Finishing**: a LICENSE and `.gitignore` are written when selected and
//!   a git repository is initialized unless `--no-git` is passed.
//!
//! With `--dry-run` nothing is written; the files that would be created are
//! listed instead.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Args;
use log::debug;
use serde_yaml::{Mapping, Value};

use kickoff::config::Config;
use kickoff::gitignore::{GitignoreIoProvider, GitignoreProvider};
use kickoff::license::{GitHubLicenseProvider, LicenseProvider};
use kickoff::output::emoji;
use kickoff::path::absolutize;
use kickoff::project::{self, CreateOptions, CreateReport, ProjectContext, TemplateContext};
use kickoff::repository::MultiRepository;
use kickoff::skeleton::{merge, merge_values, SkeletonLoader};
use kickoff::suggestions;

use super::Session;

/// Value of `--license` / `--gitignore` that disables the configured default.
const NONE: &str = "none";

/// Create a new project from one or more skeletons
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Directory to create the project in.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Skeleton to use, optionally qualified as `<repository>:<name>`.
    ///
    /// May be given multiple times; later skeletons override earlier ones.
    #[arg(short, long = "skeleton", value_name = "NAME", required = true)]
    pub skeletons: Vec<String>,

    /// Project name. Defaults to the name of the output directory.
    #[arg(long)]
    pub name: Option<String>,

    /// Project author. Defaults to the configuration, then `git config user.name`.
    #[arg(long)]
    pub author: Option<String>,

    /// Author email. Defaults to the configuration, then `git config user.email`.
    #[arg(long)]
    pub email: Option<String>,

    /// Host used for the project URL.
    #[arg(long)]
    pub host: Option<String>,

    /// Owner (user or organization) used for the project URL.
    #[arg(long)]
    pub owner: Option<String>,

    /// License to write into LICENSE, e.g. `mit`. Use `none` to skip the
    /// configured default.
    #[arg(long, value_name = "KEY")]
    pub license: Option<String>,

    /// Comma-separated gitignore templates, e.g. `rust,go`. Use `none` to
    /// skip the configured default.
    #[arg(long, value_name = "QUERY")]
    pub gitignore: Option<String>,

    /// YAML file with values to layer on top of the skeleton values.
    #[arg(long = "values", value_name = "FILE")]
    pub values_files: Vec<PathBuf>,

    /// Override a single value, e.g. `--set go.version=1.22`.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Do not initialize a git repository.
    #[arg(long)]
    pub no_git: bool,

    /// Show what would be created without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Allow creating the project in a non-empty directory.
    #[arg(long)]
    pub force: bool,
}

/// Execute the `create` command.
pub fn execute(session: &Session, args: CreateArgs) -> Result<()> {
    let mut config = session.load_config()?;
    let manager = session.repository_manager();
    config.apply_defaults(manager.git());

    if config.repositories.is_empty() {
        return Err(suggestions::no_repositories(&session.config_path));
    }

    let cwd = std::env::current_dir().context("Failed to determine the current directory")?;
    let target = absolutize(&args.output, &cwd);
    check_output_dir(&target, args.force)?;

    let multi = MultiRepository::new(&manager, config.repositories.clone());
    let aliases: Vec<&str> = multi.aliases().collect();

    let infos = args
        .skeletons
        .iter()
        .map(|name| multi.resolve(name))
        .collect::<kickoff::error::Result<Vec<_>>>()
        .map_err(|e| suggestions::explain(e, &aliases))?;

    let loaded = SkeletonLoader::new(&manager)
        .load_all(&infos)
        .map_err(|e| suggestions::explain(e, &aliases))?;
    let skeleton = merge(loaded)?;
    debug!(
        "composed {} file(s) from {}",
        skeleton.files.len(),
        args.skeletons.join(", ")
    );

    let values = layer_values(&skeleton.values, &config, &args.values_files, &args.overrides)?;
    let context = build_context(&args, &config, &target, values)?;

    let options = CreateOptions {
        target: target.clone(),
        dry_run: args.dry_run,
        init_git: !args.no_git,
    };
    let report = project::create(&skeleton, &context, &options, manager.git())?;

    print_report(session, &context.project.name, &target, &report, args.dry_run);
    Ok(())
}

fn check_output_dir(target: &Path, force: bool) -> Result<()> {
    if !target.exists() {
        return Ok(());
    }
    if !target.is_dir() {
        anyhow::bail!("Output path exists and is not a directory: {}", target.display());
    }

    let mut entries = fs::read_dir(target)
        .with_context(|| format!("Failed to read {}", target.display()))?;
    if entries.next().is_some() && !force {
        return Err(suggestions::output_not_empty(target));
    }
    Ok(())
}

/// Layer configuration values, values files and `--set` overrides on top of
/// the skeleton values.
fn layer_values(
    skeleton_values: &Mapping,
    config: &Config,
    files: &[PathBuf],
    overrides: &[String],
) -> Result<Mapping> {
    let mut values = merge_values(skeleton_values, &config.values)?;

    for file in files {
        let content = fs::read_to_string(file)
            .with_context(|| format!("Failed to read values file {}", file.display()))?;
        let layer: Mapping = if content.trim().is_empty() {
            Mapping::new()
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Values file {} is not a YAML mapping", file.display()))?
        };
        values = merge_values(&values, &layer)?;
    }

    for raw in overrides {
        values = merge_values(&values, &parse_override(raw)?)?;
    }

    Ok(values)
}

/// Turn `a.b.c=value` into the mapping `{a: {b: {c: value}}}`. The value is
/// parsed as YAML so numbers, booleans and lists keep their type.
fn parse_override(raw: &str) -> Result<Mapping> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(suggestions::invalid_value_override(raw));
    };

    let parts: Vec<&str> = key.trim().split('.').collect();
    if parts.iter().any(|part| part.trim().is_empty()) {
        return Err(suggestions::invalid_value_override(raw));
    }

    let parsed: Value = serde_yaml::from_str(value)
        .unwrap_or_else(|_| Value::String(value.to_string()));

    let mut current = parsed;
    for part in parts.iter().rev() {
        let mut mapping = Mapping::new();
        mapping.insert(Value::String(part.trim().to_string()), current);
        current = Value::Mapping(mapping);
    }

    match current {
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(suggestions::invalid_value_override(raw)),
    }
}

fn build_context(
    args: &CreateArgs,
    config: &Config,
    target: &Path,
    values: Mapping,
) -> Result<TemplateContext> {
    let name = match &args.name {
        Some(name) => name.clone(),
        None => target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("Cannot derive a project name from the output directory, use --name")?,
    };

    let project_config = &config.project;
    let project = ProjectContext::new(
        name,
        args.author.as_deref().unwrap_or(&project_config.author),
        args.email.as_deref().unwrap_or(&project_config.email),
        args.host.as_deref().unwrap_or(&project_config.host),
        args.owner.as_deref().unwrap_or(&project_config.owner),
    );
    let mut context = TemplateContext::new(project, values);

    if let Some(key) = selected(args.license.as_deref(), config.license.as_deref()) {
        let license = GitHubLicenseProvider::new().get(key)?;
        context = context.with_license(&license);
    }

    if let Some(query) = selected(args.gitignore.as_deref(), config.gitignore.as_deref()) {
        let gitignore = GitignoreIoProvider::new().get(query)?;
        context = context.with_gitignore(gitignore);
    }

    Ok(context)
}

/// The flag wins over the configured default; `none` or an empty value
/// disables the step.
fn selected<'a>(flag: Option<&'a str>, configured: Option<&'a str>) -> Option<&'a str> {
    flag.or(configured)
        .map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case(NONE))
}

fn print_report(
    session: &Session,
    name: &str,
    target: &Path,
    report: &CreateReport,
    dry_run: bool,
) {
    let output = &session.output;
    let stats = &report.files.stats;

    if dry_run {
        println!(
            "{} {}",
            emoji(output, "🔍", "[DRY RUN]"),
            output.warning(format!(
                "Would create project {:?} in {}",
                name,
                target.display()
            ))
        );
        for path in &report.files.paths {
            println!("  {}", path);
        }
    } else {
        println!(
            "{} {}",
            emoji(output, "✨", "[OK]"),
            output.success(format!("Created project {:?} in {}", name, target.display()))
        );
    }

    println!(
        "{}",
        output.dim(format!(
            "  {} directories, {} files copied, {} templates rendered",
            stats.dirs_created, stats.files_copied, stats.templates_rendered
        ))
    );
    if report.license_written {
        println!("{}", output.dim("  LICENSE written"));
    }
    if report.gitignore_written {
        println!("{}", output.dim("  .gitignore written"));
    }
    if report.git_initialized {
        println!("{}", output.dim("  git repository initialized"));
    }
}
