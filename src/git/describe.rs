//! `git describe` backed tag source.

use super::operations::{ReleaseTag, TagSource};
use crate::error::{GitError, Result};
use std::path::{Path, PathBuf};

const DESCRIBE_ARGS: [&str; 3] = ["describe", "--tags", "--abbrev=0"];

/// Resolves tags by running the `git` executable in a repository
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_path: PathBuf,
}

impl GitCli {
    /// Tag source for the repository containing `repo_path`
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    /// Directory git is run in
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }
}

impl TagSource for GitCli {
    async fn latest_tag(&self) -> Result<ReleaseTag> {
        let command = format!("git {}", DESCRIBE_ARGS.join(" "));
        log::debug!("Running '{}' in {}", command, self.repo_path.display());

        let output = tokio::process::Command::new("git")
            .args(DESCRIBE_ARGS)
            .current_dir(&self.repo_path)
            .output()
            .await
            .map_err(|source| GitError::SpawnFailed {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::NoTag {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let stdout = String::from_utf8(output.stdout).map_err(|e| GitError::InvalidTag {
            reason: format!("output of '{}' is not UTF-8: {}", command, e),
        })?;

        ReleaseTag::new(&stdout)
    }
}
