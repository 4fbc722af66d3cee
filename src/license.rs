//! License texts for generated projects.
//!
//! The texts come from the GitHub licenses API. The license body contains
//! `[fullname]` and `[year]` placeholders which are filled in when the
//! LICENSE file is written.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use ureq::Agent;

use crate::error::{Error, Result};

/// Base URL of the GitHub licenses API.
pub const GITHUB_LICENSES_URL: &str = "https://api.github.com/licenses";

/// Timeout applied to every HTTP request.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// A license with its full text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub key: String,
    pub name: String,
    pub body: String,
}

/// Replace the `[fullname]` and `[year]` placeholders of a license text.
pub fn fill_placeholders(body: &str, fullname: &str, year: i32) -> String {
    body.replace("[fullname]", fullname)
        .replace("[year]", &year.to_string())
}

/// A license as listed by the provider, without its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseSummary {
    pub key: String,
    pub name: String,
}

/// Source of license texts.
pub trait LicenseProvider {
    /// Fetch the license identified by `key`.
    fn get(&self, key: &str) -> Result<License>;

    /// List every available license.
    fn list(&self) -> Result<Vec<LicenseSummary>>;
}

/// Build the HTTP agent shared by the providers.
pub(crate) fn http_agent() -> Agent {
    Agent::config_builder()
        .timeout_global(Some(HTTP_TIMEOUT))
        .user_agent(concat!("kickoff/", env!("CARGO_PKG_VERSION")))
        .build()
        .into()
}

pub(crate) fn network_error(url: &str, err: impl std::fmt::Display) -> Error {
    Error::Network {
        url: url.to_string(),
        message: err.to_string(),
    }
}

/// Licenses served by the GitHub API.
pub struct GitHubLicenseProvider {
    agent: Agent,
    base_url: String,
}

impl GitHubLicenseProvider {
    pub fn new() -> Self {
        Self::with_base_url(GITHUB_LICENSES_URL)
    }

    /// Use an alternative endpoint serving the same API.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            agent: http_agent(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for GitHubLicenseProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LicenseProvider for GitHubLicenseProvider {
    fn get(&self, key: &str) -> Result<License> {
        let url = format!("{}/{}", self.base_url, key);
        let mut response = self
            .agent
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .call()
            .map_err(|e| match e {
                ureq::Error::StatusCode(404) => Error::LicenseNotFound {
                    key: key.to_string(),
                },
                other => network_error(&url, other),
            })?;

        response
            .body_mut()
            .read_json::<License>()
            .map_err(|e| network_error(&url, e))
    }

    fn list(&self) -> Result<Vec<LicenseSummary>> {
        let url = &self.base_url;
        let mut response = self
            .agent
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .call()
            .map_err(|e| network_error(url, e))?;

        let mut licenses = response
            .body_mut()
            .read_json::<Vec<LicenseSummary>>()
            .map_err(|e| network_error(url, e))?;
        licenses.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(licenses)
    }
}
