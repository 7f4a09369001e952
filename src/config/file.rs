//! `release.toml` schema.
//!
//! Every key is optional; missing keys keep the built-in defaults.
//!
//! ```toml
//! name = "brother-cert"
//! entry_point = "./cmd/brother-cert"
//! out_dir = "_out"
//! targets = ["linux_amd64", "windows_amd64"]
//! docs = ["README.md", "CHANGELOG.md", "LICENSE.md"]
//! compiler = "go"
//! on_build_failure = "abort"
//! ```

use super::BuildFailurePolicy;
use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Contents of a `release.toml` file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Binary and archive name
    pub name: Option<String>,
    /// Entry point passed to the compiler
    pub entry_point: Option<String>,
    /// Output directory relative to the project root
    pub out_dir: Option<PathBuf>,
    /// `OS_ARCH` targets, in build order
    pub targets: Option<Vec<String>>,
    /// Files copied next to every binary
    pub docs: Option<Vec<PathBuf>>,
    /// Compiler program
    pub compiler: Option<String>,
    /// What to do when a build fails
    pub on_build_failure: Option<BuildFailurePolicy>,
}

impl ConfigFile {
    /// Read and parse a config file
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse config text; `origin` is only used in error messages
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        Ok(toml::from_str(content).map_err(|source| ConfigError::ParseFailed {
            path: origin.to_path_buf(),
            source,
        })?)
    }
}
