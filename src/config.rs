//! # User Configuration
//!
//! The user configuration file (`~/.config/kickoff/config.yaml` by default)
//! provides project defaults, the configured skeleton repositories and
//! values that are layered on top of the composed skeleton's values.
//!
//! ```yaml
//! project:
//!   author: Jane Doe
//!   email: jane@example.com
//!   host: github.com
//!   owner: jane
//! license: mit
//! gitignore: rust,go
//! repositories:
//!   default: https://github.com/jane/skeletons
//!   local: ~/src/skeletons
//! values:
//!   rust:
//!     edition: "2021"
//! ```
//!
//! Every key is optional and a missing file is the same as an empty one.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

use crate::defaults::DEFAULT_PROJECT_HOST;
use crate::error::{Error, Result};
use crate::repository::{GitOperations, RepositoryLocation};

/// Project defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub owner: String,
}

/// The user configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub project: ProjectConfig,
    /// License key applied to new projects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Comma-separated gitignore templates applied to new projects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gitignore: Option<String>,
    /// Repository alias to location.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub repositories: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Mapping::is_empty")]
    pub values: Mapping,
}

impl Config {
    /// Load the configuration at `path`; a missing file yields the default.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(path).map_err(|e| Error::filesystem("read", path, e))?;
        Self::parse(&content, path)
    }

    /// Parse configuration content; `path` is only used in errors.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| Error::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
            hint: Some(
                "Allowed top-level keys are `project`, `license`, `gitignore`, \
                 `repositories` and `values`"
                    .to_string(),
            ),
        })
    }

    /// Write the configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| Error::filesystem("create directory", parent, e))?;
            }
        }

        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).map_err(|e| Error::filesystem("write", path, e))
    }

    /// Fill unset project fields: the host defaults to github.com, author
    /// and email come from the user's git configuration.
    pub fn apply_defaults(&mut self, git: &dyn GitOperations) {
        let project = &mut self.project;
        if project.host.is_empty() {
            project.host = DEFAULT_PROJECT_HOST.to_string();
        }
        if project.author.is_empty() {
            project.author = git.config_value("user.name").unwrap_or_default();
        }
        if project.email.is_empty() {
            project.email = git.config_value("user.email").unwrap_or_default();
        }
    }

    /// Register a repository under `alias`.
    ///
    /// Local paths are stored absolute so the configuration does not depend
    /// on the working directory it is used from.
    pub fn add_repository(&mut self, alias: &str, location: &str) -> Result<()> {
        validate_alias(alias)?;
        if self.repositories.contains_key(alias) {
            return Err(Error::Validation {
                message: format!("repository {:?} is already configured", alias),
            });
        }

        let parsed = RepositoryLocation::parse(location)?;
        let stored = if parsed.is_local() {
            parsed.to_string()
        } else {
            location.trim().to_string()
        };
        self.repositories.insert(alias.to_string(), stored);
        Ok(())
    }

    /// Remove the repository registered under `alias`.
    pub fn remove_repository(&mut self, alias: &str) -> Result<String> {
        self.repositories
            .remove(alias)
            .ok_or_else(|| Error::UnknownRepository {
                alias: alias.to_string(),
            })
    }
}

fn validate_alias(alias: &str) -> Result<()> {
    let valid = !alias.is_empty()
        && alias
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::Validation {
            message: format!(
                "invalid repository alias {:?}: use letters, digits, '-', '_' or '.'",
                alias
            ),
        })
    }
}
