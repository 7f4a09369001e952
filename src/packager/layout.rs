//! Output tree layout.
//!
//! ```text
//! <project_root>/<out_dir>/
//!   <target>/                         one per target, e.g. linux_amd64
//!     <name>[.exe]
//!     README.md, CHANGELOG.md, LICENSE.md
//!   _release/
//!     <name>-<tag>_<target>.zip       windows, darwin
//!     <name>-<tag>_<target>.tar.gz    everything else
//! ```

use crate::error::Result;
use crate::git::ReleaseTag;
use crate::target::Target;
use crate::utils::fs;
use std::path::{Path, PathBuf};

/// Directory under the output root that receives the archives
pub const RELEASE_DIR_NAME: &str = "_release";

/// Paths of one packaging run's output tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
    release_dir: PathBuf,
}

impl OutputLayout {
    /// Layout rooted at `project_root/out_dir`
    pub fn new(project_root: &Path, out_dir: &Path) -> Self {
        let root = project_root.join(out_dir);
        let release_dir = root.join(RELEASE_DIR_NAME);
        Self { root, release_dir }
    }

    /// Output root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Archive directory
    pub fn release_dir(&self) -> &Path {
        &self.release_dir
    }

    /// Per-target staging directory
    pub fn target_dir(&self, target: &Target) -> PathBuf {
        self.root.join(target.to_string())
    }

    /// Where the compiler must place the binary for `target`
    pub fn binary_path(&self, target: &Target, name: &str) -> PathBuf {
        self.target_dir(target).join(target.binary_file_name(name))
    }

    /// `<name>-<tag>_<target>.<ext>`
    pub fn archive_file_name(name: &str, tag: &ReleaseTag, target: &Target) -> String {
        format!(
            "{}-{}_{}.{}",
            name,
            tag,
            target,
            target.archive_format().extension()
        )
    }

    /// Full path of the archive for `target`
    pub fn archive_path(&self, name: &str, tag: &ReleaseTag, target: &Target) -> PathBuf {
        self.release_dir
            .join(Self::archive_file_name(name, tag, target))
    }

    /// Delete the output root if present and recreate it with an empty
    /// archive directory.
    pub async fn reset(&self) -> Result<()> {
        log::info!("Resetting output directory {}", self.root.display());
        fs::recreate_dir(&self.root).await?;
        fs::ensure_dir(&self.release_dir).await
    }
}
