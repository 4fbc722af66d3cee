//! Thin wrappers around the system `git` command.
//!
//! Using the git binary instead of a library automatically honors:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens
//! - Any authentication configured in ~/.gitconfig

use std::fs;
use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};

/// Clone `url` at `revision` into `target_dir` as a shallow, single-branch
/// clone.
///
/// `revision` may name a branch, a tag or a commit. `git clone --branch`
/// only understands the first two, so a revision the remote does not
/// advertise as a ref is fetched by id into a fresh repository instead.
pub fn clone_shallow(url: &str, revision: &str, target_dir: &Path) -> Result<()> {
    // Remove target directory if it exists (git won't clone into existing non-empty dir)
    if target_dir.exists() {
        fs::remove_dir_all(target_dir).map_err(|e| Error::filesystem("remove", target_dir, e))?;
    }

    if let Some(parent) = target_dir.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::filesystem("create directory", parent, e))?;
    }

    debug!("git clone {} ({}) into {}", url, revision, target_dir.display());

    let output = Command::new("git")
        .args([
            "clone",
            "--depth=1",
            "--single-branch",
            "--branch",
            revision,
            url,
        ])
        .arg(target_dir)
        .output()
        .map_err(|e| Error::GitClone {
            url: url.to_string(),
            revision: revision.to_string(),
            message: e.to_string(),
            hint: Some("Make sure git is installed and on your PATH".to_string()),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);

        if stderr.contains("Remote branch") && stderr.contains("not found") {
            debug!("{} is not a branch or tag of {}, fetching it by id", revision, url);
            return clone_by_id(url, revision, target_dir);
        }

        // Provide helpful error message for common auth failures
        let hint = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository")
        {
            Some(
                "For private repositories, ensure an SSH key is loaded into ssh-agent \
                 or git credentials are configured"
                    .to_string(),
            )
        } else {
            None
        };

        return Err(Error::GitClone {
            url: url.to_string(),
            revision: revision.to_string(),
            message: stderr.trim().to_string(),
            hint,
        });
    }

    Ok(())
}

/// Shallow clone of a single commit: `init`, fetch `revision` and check out
/// what was fetched. `target_dir` is removed again when any step fails.
fn clone_by_id(url: &str, revision: &str, target_dir: &Path) -> Result<()> {
    let result = fs::create_dir_all(target_dir)
        .map_err(|e| Error::filesystem("create directory", target_dir, e))
        .and_then(|_| run(target_dir, &["init", "--quiet"]))
        .and_then(|_| run(target_dir, &["remote", "add", "origin", url]))
        .and_then(|_| run(target_dir, &["fetch", "--depth=1", "origin", revision]))
        .and_then(|_| run(target_dir, &["checkout", "--force", "--quiet", "FETCH_HEAD"]));

    if let Err(err) = result {
        let _ = fs::remove_dir_all(target_dir);
        let message = match err {
            Error::GitCommand { stderr, .. } => stderr,
            other => other.to_string(),
        };
        return Err(Error::GitClone {
            url: url.to_string(),
            revision: revision.to_string(),
            message,
            hint: Some(format!(
                "Revision '{}' does not exist; set ?revision=<branch, tag or commit> on the repository URL",
                revision
            )),
        });
    }

    Ok(())
}

/// Returns true if `path` is the root of a git working tree.
///
/// Only the directory itself is checked; an enclosing repository higher up
/// the tree does not count.
pub fn is_repository(path: &Path) -> bool {
    path.join(".git").exists()
}

/// Returns true if the working tree has uncommitted or untracked changes.
pub fn is_dirty(repo: &Path) -> Result<bool> {
    let stdout = run(repo, &["status", "--porcelain"])?;
    Ok(!stdout.trim().is_empty())
}

/// Throw away every uncommitted modification and untracked file.
pub fn discard_changes(repo: &Path) -> Result<()> {
    run(repo, &["reset", "--hard", "HEAD"])?;
    run(repo, &["clean", "-fd"])?;
    Ok(())
}

/// Check out `revision` in the working tree at `repo`.
pub fn checkout(repo: &Path, revision: &str, force: bool) -> Result<()> {
    if force {
        run(repo, &["checkout", "--force", revision])?;
    } else {
        run(repo, &["checkout", revision])?;
    }
    Ok(())
}

/// Bring the shallow clone at `repo` up to date with `revision` on `origin`.
///
/// The clone only holds a grafted tip, so a newer upstream tip shares no
/// history with it and cannot be fast-forwarded. The new tip is fetched at
/// depth one and the working tree is reset onto it. Nothing new upstream
/// leaves the tree as it was.
pub fn pull(repo: &Path, revision: &str) -> Result<()> {
    let before = run(repo, &["rev-parse", "HEAD"])?;
    run(repo, &["fetch", "--depth=1", "origin", revision])?;
    run(repo, &["reset", "--hard", "--quiet", "FETCH_HEAD"])?;
    let after = run(repo, &["rev-parse", "HEAD"])?;

    if before.trim() == after.trim() {
        debug!("{} already up to date at {}", repo.display(), after.trim());
    } else {
        debug!(
            "{} updated from {} to {}",
            repo.display(),
            before.trim(),
            after.trim()
        );
    }
    Ok(())
}

/// Initialize an empty repository at `path`.
pub fn init(path: &Path) -> Result<()> {
    let output = Command::new("git")
        .arg("init")
        .arg(path)
        .output()
        .map_err(|e| git_command_error("init", path, &e.to_string()))?;

    if !output.status.success() {
        return Err(git_command_error(
            "init",
            path,
            String::from_utf8_lossy(&output.stderr).trim(),
        ));
    }

    Ok(())
}

/// Read a value from the user's global git configuration.
///
/// Missing keys and a missing git binary both yield `None`.
pub fn config_value(key: &str) -> Option<String> {
    let output = Command::new("git")
        .args(["config", "--global", "--get", key])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Run `git <args>` inside `repo` and return stdout.
fn run(repo: &Path, args: &[&str]) -> Result<String> {
    let command = args.join(" ");
    debug!("git {} in {}", command, repo.display());

    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .output()
        .map_err(|e| git_command_error(&command, repo, &e.to_string()))?;

    if !output.status.success() {
        return Err(git_command_error(
            &command,
            repo,
            String::from_utf8_lossy(&output.stderr).trim(),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn git_command_error(command: &str, location: &Path, stderr: &str) -> Error {
    Error::GitCommand {
        command: command.to_string(),
        location: location.display().to_string(),
        stderr: stderr.to_string(),
    }
}
