//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the `kickoff`
//! command-line tool. Each subcommand is defined in its own file to keep the
//! logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct (or a subcommand enum) that defines the command-specific
//!   arguments and options, derived using `clap`.
//! - An `execute` function that takes the [`Session`] and the parsed arguments
//!   and performs the command's logic.
//!
//! The `execute` function is the main entry point for the command and is
//! responsible for orchestrating the necessary operations, calling into the
//! `kickoff` library to perform the core logic.

pub mod completions;
pub mod create;
pub mod gitignore;
pub mod license;
pub mod repository;
pub mod skeleton;

use std::path::PathBuf;

use anyhow::Result;

use kickoff::config::Config;
use kickoff::output::OutputConfig;
use kickoff::repository::RepositoryManager;

/// Settings resolved from the global flags, shared by every command.
#[derive(Debug, Clone)]
pub struct Session {
    pub config_path: PathBuf,
    pub cache_root: PathBuf,
    pub output: OutputConfig,
}

impl Session {
    /// Load the user configuration; a missing file is an empty configuration.
    pub fn load_config(&self) -> Result<Config> {
        Ok(Config::load(&self.config_path)?)
    }

    pub fn repository_manager(&self) -> RepositoryManager {
        RepositoryManager::new(self.cache_root.clone())
    }
}
