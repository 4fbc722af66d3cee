//! # Skeleton Commands Implementation
//!
//! This module implements the `skeleton` subcommands:
//!
//! - `skeleton list`: every skeleton of the configured repositories, or of a
//!   single repository with `--repository`.
//! - `skeleton show`: the composed view of one skeleton (description, values,
//!   files with inherited ones marked) and its inheritance tree.
//! - `skeleton create`: scaffold a new skeleton directory.
//!
//! `list` and `show` are read-only, apart from cloning or updating cached
//! remote repositories.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand, ValueEnum};
use ptree::{print_tree, TreeItem};
use serde::Serialize;
use serde_yaml::Mapping;

use kickoff::defaults::SKELETON_CONFIG_FILENAME;
use kickoff::output::{emoji, OutputConfig};
use kickoff::repository::{MultiRepository, SkeletonInfo};
use kickoff::skeleton::{Skeleton, SkeletonConfig, SkeletonLoader};
use kickoff::suggestions;

use super::Session;

/// Skeleton subcommands
#[derive(Subcommand, Debug)]
pub enum SkeletonCommand {
    /// List available skeletons
    List(ListArgs),
    /// Show the composed contents of a skeleton
    Show(ShowArgs),
    /// Create a new skeleton directory
    Create(CreateArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list the skeletons of this repository.
    #[arg(short, long, value_name = "ALIAS")]
    pub repository: Option<String>,

    /// Print the list as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Skeleton name, optionally qualified as `<repository>:<name>`.
    pub name: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Directory of the new skeleton.
    pub dir: PathBuf,
}

/// Output formats for `skeleton show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human readable text with an inheritance tree
    #[default]
    Text,
    /// YAML document
    Yaml,
    /// JSON document
    Json,
}

/// Execute a `skeleton` subcommand.
pub fn execute(session: &Session, command: SkeletonCommand) -> Result<()> {
    match command {
        SkeletonCommand::List(args) => list(session, args),
        SkeletonCommand::Show(args) => show(session, args),
        SkeletonCommand::Create(args) => create(session, args),
    }
}

/// One row of `skeleton list`.
#[derive(Debug, Serialize)]
struct ListEntry {
    name: String,
    repository: Option<String>,
    location: String,
    path: PathBuf,
    description: String,
}

impl ListEntry {
    fn from_info(info: &SkeletonInfo) -> Result<Self> {
        let config = SkeletonConfig::load(&info.config_path())?;
        Ok(Self {
            name: info.qualified_name(),
            repository: info.repository.name.clone(),
            location: info.repository.location.to_string(),
            path: info.path.clone(),
            description: config.description,
        })
    }
}

fn list(session: &Session, args: ListArgs) -> Result<()> {
    let config = session.load_config()?;
    if config.repositories.is_empty() {
        return Err(suggestions::no_repositories(&session.config_path));
    }

    let manager = session.repository_manager();
    let multi = MultiRepository::new(&manager, config.repositories.clone());
    let aliases: Vec<&str> = multi.aliases().collect();

    let infos = match &args.repository {
        Some(alias) => multi.list_repository(alias),
        None => multi.list_all(),
    }
    .map_err(|e| suggestions::explain(e, &aliases))?;

    let entries = infos
        .iter()
        .map(ListEntry::from_info)
        .collect::<Result<Vec<_>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    print_list(&session.output, &entries);
    Ok(())
}

fn print_list(output: &OutputConfig, entries: &[ListEntry]) {
    if entries.is_empty() {
        println!("No skeletons found.");
        return;
    }

    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in entries {
        if entry.description.is_empty() {
            println!("{}", output.heading(&entry.name));
        } else {
            println!(
                "{}  {}",
                output.heading(format!("{:<width$}", entry.name, width = width)),
                output.dim(&entry.description)
            );
        }
    }
    println!();
    println!("{} skeleton(s)", entries.len());
}

/// Serializable view of a composed skeleton.
#[derive(Debug, Serialize)]
struct SkeletonView<'a> {
    name: String,
    repository: String,
    path: &'a Path,
    description: &'a str,
    values: &'a Mapping,
    files: Vec<FileView<'a>>,
    /// Nearest ancestor first.
    parents: Vec<String>,
}

#[derive(Debug, Serialize)]
struct FileView<'a> {
    path: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    dir: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    inherited: bool,
}

impl<'a> SkeletonView<'a> {
    fn new(skeleton: &'a Skeleton) -> Self {
        Self {
            name: skeleton.info.qualified_name(),
            repository: skeleton.info.repository.location.to_string(),
            path: &skeleton.info.path,
            description: &skeleton.description,
            values: &skeleton.values,
            files: skeleton
                .files
                .iter()
                .map(|entry| FileView {
                    path: &entry.path,
                    dir: entry.is_dir,
                    inherited: entry.inherited,
                })
                .collect(),
            parents: skeleton.ancestors().map(label).collect(),
        }
    }
}

fn show(session: &Session, args: ShowArgs) -> Result<()> {
    let config = session.load_config()?;
    if config.repositories.is_empty() {
        return Err(suggestions::no_repositories(&session.config_path));
    }

    let manager = session.repository_manager();
    let multi = MultiRepository::new(&manager, config.repositories.clone());
    let aliases: Vec<&str> = multi.aliases().collect();

    let skeleton = multi
        .resolve(&args.name)
        .and_then(|info| SkeletonLoader::new(&manager).load(&info))
        .map_err(|e| suggestions::explain(e, &aliases))?;

    let view = SkeletonView::new(&skeleton);
    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&view)?),
        OutputFormat::Text => {
            print!("{}", render_text(&session.output, &view)?);
            println!();
            println!("{}", session.output.heading("Inheritance:"));
            print_tree(&build_tree_node(&skeleton))
                .map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;
        }
    }
    Ok(())
}

fn render_text(output: &OutputConfig, view: &SkeletonView<'_>) -> Result<String> {
    let mut text = String::new();
    text.push_str(&format!("{} {}\n", output.heading("Skeleton:"), view.name));
    text.push_str(&format!("{} {}\n", output.heading("Repository:"), view.repository));
    text.push_str(&format!(
        "{} {}\n",
        output.heading("Path:"),
        output.dim(view.path.display())
    ));
    if !view.description.is_empty() {
        text.push_str(&format!(
            "{} {}\n",
            output.heading("Description:"),
            view.description
        ));
    }

    text.push('\n');
    text.push_str(&format!("{}\n", output.heading("Values:")));
    if view.values.is_empty() {
        text.push_str("  (none)\n");
    } else {
        for line in serde_yaml::to_string(view.values)?.lines() {
            text.push_str(&format!("  {}\n", line));
        }
    }

    text.push('\n');
    text.push_str(&format!("{}\n", output.heading("Files:")));
    for file in &view.files {
        let path = if file.dir {
            format!("{}/", file.path)
        } else {
            file.path.to_string()
        };
        if file.inherited {
            text.push_str(&format!("  {} {}\n", path, output.dim("(inherited)")));
        } else {
            text.push_str(&format!("  {}\n", path));
        }
    }

    Ok(text)
}

fn label(skeleton: &Skeleton) -> String {
    format!(
        "{} @ {}",
        skeleton.info.qualified_name(),
        skeleton.info.repository.location
    )
}

/// Build the inheritance chain of a skeleton as a tree, the skeleton itself
/// at the root.
fn build_tree_node(skeleton: &Skeleton) -> TreeNode {
    let children = skeleton
        .parent
        .as_deref()
        .map(|parent| vec![build_tree_node(parent)])
        .unwrap_or_default();
    TreeNode {
        label: label(skeleton),
        children,
    }
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: io::Write>(&self, f: &mut W, _style: &ptree::Style) -> io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Borrowed(&self.children)
    }
}

const MARKER_TEMPLATE: &str = "\
# Short summary shown by `kickoff skeleton list`.
description: \"\"

# Values available in templates as {{ Values.<key> }}.
#
# Files ending in .skel are rendered with tera, which reserves {{, {% and
# {#. Wrap shell snippets such as ${#var} in {% raw %} ... {% endraw %}.
values: {}

# Inherit files and values from another skeleton:
#
# parent:
#   skeleton: base
#   repository: https://github.com/owner/skeletons
";

const README_TEMPLATE: &str = "\
# {{ Project.Name }}

Created by {{ Project.Author }}.

Repository: {{ Project.URL }}
";

fn create(session: &Session, args: CreateArgs) -> Result<()> {
    let marker = args.dir.join(SKELETON_CONFIG_FILENAME);
    if marker.exists() {
        anyhow::bail!(
            "A skeleton already exists at {}\n\nhint: Choose another directory or edit {} directly",
            args.dir.display(),
            marker.display()
        );
    }

    scaffold(&args.dir)?;

    let output = &session.output;
    println!(
        "{} {}",
        emoji(output, "✨", "[OK]"),
        output.success(format!("Created skeleton in {}", args.dir.display()))
    );
    println!(
        "{}",
        output.dim(format!(
            "  edit {} and add files; files ending in .skel are rendered as templates",
            SKELETON_CONFIG_FILENAME
        ))
    );
    Ok(())
}

fn scaffold(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let marker = dir.join(SKELETON_CONFIG_FILENAME);
    fs::write(&marker, MARKER_TEMPLATE)
        .with_context(|| format!("Failed to write {}", marker.display()))?;

    let readme = dir.join("README.md.skel");
    if !readme.exists() {
        fs::write(&readme, README_TEMPLATE)
            .with_context(|| format!("Failed to write {}", readme.display()))?;
    }
    Ok(())
}
