//! Default values for kickoff configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// File that marks a directory as a skeleton.
pub const SKELETON_CONFIG_FILENAME: &str = ".kickoff.yaml";

/// Suffix of files whose content is rendered through the template engine.
pub const TEMPLATE_SUFFIX: &str = ".skel";

/// Revision used for remote repositories that do not specify one.
pub const DEFAULT_REVISION: &str = "master";

/// Host used for project URLs when the configuration does not set one.
pub const DEFAULT_PROJECT_HOST: &str = "github.com";

/// Name of the license file written into new projects.
pub const LICENSE_FILENAME: &str = "LICENSE";

/// Name of the gitignore file written into new projects.
pub const GITIGNORE_FILENAME: &str = ".gitignore";

/// Returns the default cache root directory for remote repository clones.
///
/// Uses the platform-appropriate cache directory:
/// - Linux: `~/.cache/kickoff/repositories` (XDG Base Directory)
/// - macOS: `~/Library/Caches/kickoff/repositories`
/// - Windows: `{FOLDERID_LocalAppData}\kickoff\repositories`
///
/// Falls back to `.kickoff-cache` in the current directory if the platform
/// cache directory cannot be determined.
///
/// This can be overridden by the `--cache-root` CLI flag or the
/// `KICKOFF_CACHE` environment variable.
pub fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".kickoff-cache"))
        .join("kickoff")
        .join("repositories")
}

/// Returns the default location of the user configuration file.
///
/// Overridden by `--config` or the `KICKOFF_CONFIG` environment variable.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".kickoff"))
        .join("kickoff")
        .join("config.yaml")
}
