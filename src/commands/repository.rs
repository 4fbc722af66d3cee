//! # Repository Commands Implementation
//!
//! This module implements the `repository` subcommands, which list and edit
//! the skeleton repositories registered in the user configuration file.
//!
//! `add` and `remove` only touch the configuration; remote repositories are
//! cloned into the cache the first time a skeleton is looked up in them.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use kickoff::config::Config;
use kickoff::error::Error;
use kickoff::output::{emoji, OutputConfig};
use kickoff::repository::{RepositoryKind, RepositoryLocation};
use kickoff::suggestions;

use super::Session;

/// Repository subcommands
#[derive(Subcommand, Debug)]
pub enum RepositoryCommand {
    /// List configured repositories
    List(ListArgs),
    /// Register a skeleton repository
    Add(AddArgs),
    /// Remove a registered repository
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print the list as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Alias used to refer to the repository, e.g. in `<alias>:<skeleton>`.
    pub alias: String,

    /// Local directory or git URL. Append `?revision=<rev>` to pin a branch,
    /// tag or commit.
    pub location: String,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Alias of the repository to remove.
    pub alias: String,
}

/// Execute a `repository` subcommand.
pub fn execute(session: &Session, command: RepositoryCommand) -> Result<()> {
    match command {
        RepositoryCommand::List(args) => list(session, args),
        RepositoryCommand::Add(args) => add(session, args),
        RepositoryCommand::Remove(args) => remove(session, args),
    }
}

#[derive(Debug, Serialize)]
struct ListEntry<'a> {
    alias: &'a str,
    location: &'a str,
    kind: Option<RepositoryKind>,
}

fn entries(config: &Config) -> Vec<ListEntry<'_>> {
    config
        .repositories
        .iter()
        .map(|(alias, location)| ListEntry {
            alias,
            location,
            kind: RepositoryLocation::parse(location)
                .ok()
                .as_ref()
                .map(RepositoryKind::for_location),
        })
        .collect()
}

fn list(session: &Session, args: ListArgs) -> Result<()> {
    let config = session.load_config()?;
    let entries = entries(&config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        return Err(suggestions::no_repositories(&session.config_path));
    }
    print_list(&session.output, &entries);
    Ok(())
}

fn print_list(output: &OutputConfig, entries: &[ListEntry<'_>]) {
    let width = entries.iter().map(|e| e.alias.len()).max().unwrap_or(0);
    for entry in entries {
        let kind = entry
            .kind
            .map(|k| k.to_string())
            .unwrap_or_else(|| "invalid location".to_string());
        println!(
            "{}  {} {}",
            output.heading(format!("{:<width$}", entry.alias, width = width)),
            entry.location,
            output.dim(format!("({})", kind))
        );
    }
}

fn add(session: &Session, args: AddArgs) -> Result<()> {
    let mut config = session.load_config()?;
    config.add_repository(&args.alias, &args.location)?;
    config.save(&session.config_path)?;

    let output = &session.output;
    println!(
        "{} {}",
        emoji(output, "✅", "[OK]"),
        output.success(format!(
            "Added repository {:?}: {}",
            args.alias, config.repositories[&args.alias]
        ))
    );
    Ok(())
}

fn remove(session: &Session, args: RemoveArgs) -> Result<()> {
    let mut config = session.load_config()?;
    let location = match config.remove_repository(&args.alias) {
        Ok(location) => location,
        Err(Error::UnknownRepository { alias }) => {
            let aliases: Vec<&str> = config.repositories.keys().map(String::as_str).collect();
            return Err(suggestions::unknown_repository(&alias, &aliases));
        }
        Err(e) => return Err(e.into()),
    };
    config.save(&session.config_path)?;

    let output = &session.output;
    println!(
        "{} {}",
        emoji(output, "🗑️", "[OK]"),
        output.success(format!("Removed repository {:?}: {}", args.alias, location))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_report_kind() {
        let mut config = Config::default();
        config
            .repositories
            .insert("remote".to_string(), "https://github.com/o/r".to_string());
        config
            .repositories
            .insert("local".to_string(), "/srv/skeletons".to_string());
        config
            .repositories
            .insert("pinned".to_string(), "/srv/skeletons?revision=v1".to_string());
        config
            .repositories
            .insert("broken".to_string(), "https://".to_string());

        let entries = entries(&config);
        let kinds: Vec<(&str, Option<RepositoryKind>)> =
            entries.iter().map(|e| (e.alias, e.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("broken", None),
                ("local", Some(RepositoryKind::LocalDirectory)),
                ("pinned", Some(RepositoryKind::LocalGitCheckout)),
                ("remote", Some(RepositoryKind::RemoteGit)),
            ]
        );
    }
}
