//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use kickoff::defaults::{default_cache_root, default_config_path};
use kickoff::output::OutputConfig;

use crate::commands::{self, Session};

/// kickoff - Bootstrap new projects from skeleton repositories
#[derive(Parser, Debug)]
#[command(name = "kickoff")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Path to the user configuration file.
    ///
    /// Defaults to `~/.config/kickoff/config.yaml` on Linux.
    #[arg(long, global = true, value_name = "FILE", env = "KICKOFF_CONFIG")]
    config: Option<PathBuf>,

    /// The root directory for cached clones of remote repositories.
    ///
    /// Defaults to the system cache directory (`~/.cache/kickoff/repositories`
    /// on Linux, `~/Library/Caches/kickoff/repositories` on macOS).
    #[arg(long, global = true, value_name = "DIR", env = "KICKOFF_CACHE")]
    cache_root: Option<PathBuf>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new project from one or more skeletons
    Create(commands::create::CreateArgs),

    /// List, inspect and scaffold skeletons
    #[command(subcommand)]
    Skeleton(commands::skeleton::SkeletonCommand),

    /// Manage the configured skeleton repositories
    #[command(subcommand)]
    Repository(commands::repository::RepositoryCommand),

    /// Browse the available licenses
    #[command(subcommand)]
    License(commands::license::LicenseCommand),

    /// Browse the available gitignore templates
    #[command(subcommand)]
    Gitignore(commands::gitignore::GitignoreCommand),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let session = Session {
            config_path: self.config.unwrap_or_else(default_config_path),
            cache_root: self.cache_root.unwrap_or_else(default_cache_root),
            output: OutputConfig::from_env_and_flag(&self.color),
        };

        match self.command {
            Commands::Create(args) => commands::create::execute(&session, args),
            Commands::Skeleton(command) => commands::skeleton::execute(&session, command),
            Commands::Repository(command) => commands::repository::execute(&session, command),
            Commands::License(command) => commands::license::execute(&session, command),
            Commands::Gitignore(command) => commands::gitignore::execute(command),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// `RUST_LOG` wins over `--log-level` when it is set.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .init();
}
