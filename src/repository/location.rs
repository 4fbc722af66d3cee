//! # Repository Locations
//!
//! A repository is addressed by a single string that is either a filesystem
//! path or a URL with a host. This module parses that string into a
//! [`RepositoryLocation`] and maps it onto the directory that holds the
//! repository's files on disk.
//!
//! ## Accepted forms
//!
//! - `/abs/path`, `rel/path`, `~/path`, `file:///abs/path`: local
//! - any of the above with `?revision=<rev>` or `?branch=<rev>`: local git
//!   checkout at that revision
//! - `https://github.com/owner/repo[?revision=<rev>]`: remote
//! - `git@github.com:owner/repo[?revision=<rev>]`: remote over ssh
//!
//! Remote locations without a revision use [`DEFAULT_REVISION`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Serialize, Serializer};
use url::Url;

use crate::defaults::DEFAULT_REVISION;
use crate::error::{Error, Result};
use crate::path::{absolutize, encode_path_segment, expand_home};

/// Where a repository lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepositoryLocation {
    /// A directory on the local filesystem. With a revision, the directory
    /// is expected to be a git working tree.
    Local {
        path: PathBuf,
        revision: Option<String>,
    },
    /// A git repository reachable over the network, cloned into the cache.
    Remote {
        scheme: String,
        user: Option<String>,
        host: String,
        path: String,
        revision: String,
    },
}

fn scp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<user>[A-Za-z0-9._-]+)@(?P<host>[A-Za-z0-9.-]+):(?P<path>[^?]+)(?:\?(?P<query>.*))?$")
            .expect("scp location pattern is valid")
    })
}

impl RepositoryLocation {
    /// Parse a location, resolving relative local paths against the current
    /// working directory.
    pub fn parse(raw: &str) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::parse_relative_to(raw, &cwd)
    }

    /// Parse a location, resolving relative local paths against `base`.
    pub fn parse_relative_to(raw: &str, base: &Path) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(invalid(raw, "location is empty"));
        }

        if let Some(captures) = scp_pattern().captures(raw) {
            let revision = captures
                .name("query")
                .and_then(|q| revision_from_query(q.as_str()))
                .unwrap_or_else(|| DEFAULT_REVISION.to_string());
            return Self::remote(
                raw,
                "ssh",
                Some(captures["user"].to_string()),
                &captures["host"],
                &captures["path"],
                revision,
            );
        }

        match Url::parse(raw) {
            Ok(url) if url.scheme() == "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| invalid(raw, "file URL does not name a local path"))?;
                let revision = url.query().and_then(revision_from_query);
                Ok(RepositoryLocation::Local {
                    path: absolutize(&path, base),
                    revision,
                })
            }
            Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => {
                let revision = url
                    .query()
                    .and_then(revision_from_query)
                    .unwrap_or_else(|| DEFAULT_REVISION.to_string());
                let user = Some(url.username())
                    .filter(|u| !u.is_empty())
                    .map(str::to_string);
                let host = match url.port() {
                    Some(port) => format!("{}:{}", url.host_str().unwrap_or_default(), port),
                    None => url.host_str().unwrap_or_default().to_string(),
                };
                Self::remote(raw, url.scheme(), user, &host, url.path(), revision)
            }
            // A single-letter scheme is a Windows drive, anything without a
            // host is a plain path.
            Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => {
                if raw.contains("://") {
                    return Err(invalid(raw, "URL has no host"));
                }
                Ok(Self::local(raw, base))
            }
            Err(err) if raw.contains("://") => Err(invalid(raw, &err.to_string())),
            Err(_) => Ok(Self::local(raw, base)),
        }
    }

    fn local(raw: &str, base: &Path) -> Self {
        let (path, revision) = match raw.split_once('?') {
            Some((path, query)) => (path, revision_from_query(query)),
            None => (raw, None),
        };
        RepositoryLocation::Local {
            path: absolutize(&expand_home(path), base),
            revision,
        }
    }

    fn remote(
        raw: &str,
        scheme: &str,
        user: Option<String>,
        host: &str,
        path: &str,
        revision: String,
    ) -> Result<Self> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Err(invalid(raw, "remote location must include a repository path"));
        }
        Ok(RepositoryLocation::Remote {
            scheme: scheme.to_string(),
            user,
            host: host.to_string(),
            path: path.to_string(),
            revision,
        })
    }

    /// Returns true if the repository lives on the local filesystem.
    pub fn is_local(&self) -> bool {
        matches!(self, RepositoryLocation::Local { .. })
    }

    /// The revision requested for this location, if any.
    pub fn revision(&self) -> Option<&str> {
        match self {
            RepositoryLocation::Local { revision, .. } => revision.as_deref(),
            RepositoryLocation::Remote { revision, .. } => Some(revision),
        }
    }

    /// The directory on disk that holds the repository's files.
    ///
    /// Local locations map to their own path; remote locations map to
    /// `cache_root/<host>/<path>@<revision>`.
    pub fn local_path(&self, cache_root: &Path) -> PathBuf {
        match self {
            RepositoryLocation::Local { path, .. } => path.clone(),
            RepositoryLocation::Remote {
                host,
                path,
                revision,
                ..
            } => cache_root
                .join(encode_path_segment(host))
                .join(encode_path_segment(&format!("{}@{}", path, revision))),
        }
    }

    /// The URL handed to `git clone` for remote locations.
    pub fn git_url(&self) -> String {
        match self {
            RepositoryLocation::Local { path, .. } => path.display().to_string(),
            RepositoryLocation::Remote {
                scheme,
                user,
                host,
                path,
                ..
            } => match user {
                Some(user) => format!("{}://{}@{}/{}", scheme, user, host, path),
                None => format!("{}://{}/{}", scheme, host, path),
            },
        }
    }
}

impl fmt::Display for RepositoryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryLocation::Local { path, revision } => {
                write!(f, "{}", path.display())?;
                if let Some(revision) = revision {
                    write!(f, "?revision={}", revision)?;
                }
                Ok(())
            }
            RepositoryLocation::Remote { revision, .. } => {
                write!(f, "{}?revision={}", self.git_url(), revision)
            }
        }
    }
}

impl Serialize for RepositoryLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn revision_from_query(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, value)| (key == "revision" || key == "branch") && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

fn invalid(raw: &str, message: &str) -> Error {
    Error::InvalidLocation {
        location: raw.to_string(),
        message: message.to_string(),
    }
}
