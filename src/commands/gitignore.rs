//! # Gitignore Commands Implementation
//!
//! `gitignore list` prints the template names accepted by
//! `create --gitignore`; `gitignore show` prints the combined templates for a
//! comma-separated query.

use anyhow::Result;
use clap::{Args, Subcommand};

use kickoff::gitignore::{GitignoreIoProvider, GitignoreProvider};

/// Gitignore subcommands
#[derive(Subcommand, Debug)]
pub enum GitignoreCommand {
    /// List available gitignore templates
    List,
    /// Print the gitignore for one or more templates
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Comma-separated template names, e.g. `rust,go`.
    pub query: String,
}

/// Execute a `gitignore` subcommand.
pub fn execute(command: GitignoreCommand) -> Result<()> {
    print!("{}", run(&GitignoreIoProvider::new(), command)?);
    Ok(())
}

fn run(provider: &dyn GitignoreProvider, command: GitignoreCommand) -> Result<String> {
    let text = match command {
        GitignoreCommand::List => provider
            .list()?
            .into_iter()
            .map(|name| name + "\n")
            .collect(),
        GitignoreCommand::Show(args) => {
            let mut content = provider.get(&args.query)?;
            if !content.ends_with('\n') {
                content.push('\n');
            }
            content
        }
    };
    Ok(text)
}
