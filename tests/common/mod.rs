//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a fixture that lays out skeleton repositories and a
//! user configuration inside a temporary directory, and builds `kickoff`
//! commands pointed at them.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_skeleton("skeletons", "go", "description: Go\n")
//!         .with_repository("default", "skeletons");
//!     fixture.command().args(["skeleton", "list"]).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::markers;
    #[allow(unused_imports)]
    pub use super::should_skip_network_tests;
    pub use super::TestFixture;
}

/// Common skeleton marker files.
#[allow(dead_code)]
pub mod markers {
    /// A skeleton without values or parent.
    pub const EMPTY: &str = "";

    /// A base skeleton providing defaults.
    pub const BASE: &str = r#"
description: Base skeleton
values:
  greeting: hello
  ci:
    provider: github
"#;

    /// A skeleton inheriting from `base` in the same repository.
    pub const CHILD: &str = r#"
description: Child skeleton
parent:
  skeleton: base
values:
  ci:
    provider: gitlab
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "description: [unterminated";
}

/// Check if network tests should be skipped.
///
/// Returns `true` if the `SKIP_NETWORK_TESTS` environment variable is set.
#[allow(dead_code)]
pub fn should_skip_network_tests() -> bool {
    env::var("SKIP_NETWORK_TESTS").is_ok()
}

/// A temporary workspace holding skeleton repositories, a configuration
/// file, a cache directory and room for output projects.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
    repositories: BTreeMap<String, String>,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
            repositories: BTreeMap::new(),
        }
    }

    /// Add a skeleton `name` in the repository directory `repo` with the
    /// given marker file content.
    pub fn with_skeleton(self, repo: &str, name: &str, marker: &str) -> Self {
        self.with_file(&format!("{}/{}/.kickoff.yaml", repo, name), marker)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Register the repository directory `repo` under `alias` and rewrite
    /// the configuration file.
    pub fn with_repository(mut self, alias: &str, repo: &str) -> Self {
        let location = self.path().join(repo).display().to_string();
        self.repositories.insert(alias.to_string(), location);
        self.write_config("");
        self
    }

    /// Rewrite the configuration file with the registered repositories plus
    /// `extra` YAML appended verbatim.
    #[allow(dead_code)]
    pub fn with_config_extra(self, extra: &str) -> Self {
        self.write_config(extra);
        self
    }

    fn write_config(&self, extra: &str) {
        let mut content = String::new();
        if !self.repositories.is_empty() {
            content.push_str("repositories:\n");
            for (alias, location) in &self.repositories {
                content.push_str(&format!("  {}: {:?}\n", alias, location));
            }
        }
        content.push_str(extra);
        std::fs::write(self.config_path(), content).expect("Failed to write config file");
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("config.yaml")
    }

    /// Get the path to the repository cache.
    pub fn cache_path(&self) -> PathBuf {
        self.temp_dir.path().join("cache")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory, using
    /// the fixture's configuration file and cache, with colors disabled.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("kickoff");
        cmd.current_dir(self.path())
            .env("KICKOFF_CONFIG", self.config_path())
            .env("KICKOFF_CACHE", self.cache_path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_writes_skeleton_marker() {
        let fixture = TestFixture::new().with_skeleton("repo", "go", markers::BASE);
        assert!(fixture.path().join("repo/go/.kickoff.yaml").exists());
    }

    #[test]
    fn test_fixture_writes_repositories_to_config() {
        let fixture = TestFixture::new().with_repository("default", "repo");
        let content = std::fs::read_to_string(fixture.config_path()).unwrap();
        assert!(content.starts_with("repositories:\n  default: "));
    }

    #[test]
    fn test_markers_are_valid_yaml() {
        for marker in [markers::BASE, markers::CHILD] {
            serde_yaml::from_str::<serde_yaml::Value>(marker).expect("Marker should be valid YAML");
        }
        assert!(serde_yaml::from_str::<serde_yaml::Value>(markers::INVALID_YAML).is_err());
    }
}
