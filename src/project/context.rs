//! The values templates are rendered against.
//!
//! Keys are exposed in PascalCase, e.g. `{{ Project.Name }}`,
//! `{{ Values.go.version }}`, `{{ License.Name }}`.

use serde::Serialize;
use serde_yaml::Mapping;

use crate::license::License;

/// Project metadata available as `Project`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectContext {
    pub name: String,
    pub author: String,
    pub email: String,
    pub host: String,
    pub owner: String,
    #[serde(rename = "URL")]
    pub url: String,
}

impl ProjectContext {
    /// Build the project metadata, deriving the URL from host, owner and
    /// name.
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        email: impl Into<String>,
        host: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        let mut project = Self {
            name: name.into(),
            author: author.into(),
            email: email.into(),
            host: host.into(),
            owner: owner.into(),
            url: String::new(),
        };
        project.url = project.build_url();
        project
    }

    fn build_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if self.owner.is_empty() {
            format!("https://{}/{}", host, self.name)
        } else {
            format!("https://{}/{}/{}", host, self.owner, self.name)
        }
    }
}

/// License information available as `License`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LicenseContext {
    pub key: String,
    pub name: String,
    pub body: String,
}

impl From<&License> for LicenseContext {
    fn from(license: &License) -> Self {
        Self {
            key: license.key.clone(),
            name: license.name.clone(),
            body: license.body.clone(),
        }
    }
}

/// Everything a template can reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateContext {
    pub project: ProjectContext,
    pub values: Mapping,
    pub license: Option<LicenseContext>,
    pub gitignore: Option<String>,
}

impl TemplateContext {
    pub fn new(project: ProjectContext, values: Mapping) -> Self {
        Self {
            project,
            values,
            license: None,
            gitignore: None,
        }
    }

    pub fn with_license(mut self, license: &License) -> Self {
        self.license = Some(license.into());
        self
    }

    pub fn with_gitignore(mut self, gitignore: impl Into<String>) -> Self {
        self.gitignore = Some(gitignore.into());
        self
    }
}
