//! `.gitignore` templates from the gitignore.io API.

use ureq::Agent;

use crate::error::Result;
use crate::license::{http_agent, network_error};

/// Base URL of the gitignore.io API.
pub const GITIGNORE_API_URL: &str = "https://www.toptal.com/developers/gitignore/api";

/// Source of `.gitignore` templates.
pub trait GitignoreProvider {
    /// Fetch the combined template for a comma-separated list of names.
    fn get(&self, query: &str) -> Result<String>;

    /// List every available template name.
    fn list(&self) -> Result<Vec<String>>;
}

/// Normalize a comma-separated template query.
///
/// `" rust, ,go "` becomes `"rust,go"`.
pub fn normalize_query(query: &str) -> String {
    query
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Templates served by gitignore.io.
pub struct GitignoreIoProvider {
    agent: Agent,
    base_url: String,
}

impl GitignoreIoProvider {
    pub fn new() -> Self {
        Self::with_base_url(GITIGNORE_API_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            agent: http_agent(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn fetch(&self, url: &str) -> Result<String> {
        self.agent
            .get(url)
            .call()
            .map_err(|e| network_error(url, e))?
            .body_mut()
            .read_to_string()
            .map_err(|e| network_error(url, e))
    }
}

impl Default for GitignoreIoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GitignoreProvider for GitignoreIoProvider {
    fn get(&self, query: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url, normalize_query(query));
        self.fetch(&url)
    }

    fn list(&self) -> Result<Vec<String>> {
        let url = format!("{}/list", self.base_url);
        let body = self.fetch(&url)?;
        Ok(parse_list(&body))
    }
}

/// The list endpoint answers with comma and newline separated names.
fn parse_list(body: &str) -> Vec<String> {
    let mut names: Vec<String> = body
        .split(|c| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    names.sort();
    names.dedup();
    names
}
