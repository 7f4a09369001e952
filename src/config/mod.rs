//! Packaging configuration.
//!
//! Defaults reproduce the fixed release setup for `brother-cert`. A
//! `release.toml` in the project root, then command-line overrides, are
//! layered on top, and the result is validated before anything on disk is
//! touched.

mod file;

pub use file::ConfigFile;

use crate::error::{ConfigError, Result};
use crate::packager::OutputLayout;
use crate::target::Target;
use path_absolutize::Absolutize;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Config file looked up in the project root when none is given explicitly
pub const DEFAULT_CONFIG_FILE: &str = "release.toml";

/// Default binary name
pub const DEFAULT_NAME: &str = "brother-cert";

/// Default compiler entry point
pub const DEFAULT_ENTRY_POINT: &str = "./cmd/brother-cert";

/// Default output directory, relative to the project root
pub const DEFAULT_OUT_DIR: &str = "_out";

/// Default compiler program
pub const DEFAULT_COMPILER: &str = "go";

/// Default targets, in build order
pub const DEFAULT_TARGETS: [(&str, &str); 7] = [
    ("windows", "amd64"),
    ("linux", "amd64"),
    ("linux", "arm64"),
    ("darwin", "amd64"),
    ("darwin", "arm64"),
    ("freebsd", "amd64"),
    ("freebsd", "arm64"),
];

/// Files copied from the project root next to every binary
pub const DEFAULT_DOCS: [&str; 3] = ["README.md", "CHANGELOG.md", "LICENSE.md"];

/// What to do when the compiler fails for a target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildFailurePolicy {
    /// Stop the run and report the failing target
    #[default]
    Abort,
    /// Skip the failing target, package the rest, and fail at the end
    Continue,
}

/// Command-line overrides applied after the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replaces the configured target list when non-empty
    pub targets: Vec<String>,
    /// Replaces the output directory
    pub out_dir: Option<PathBuf>,
    /// Replaces the compiler program
    pub compiler: Option<String>,
    /// Forces [`BuildFailurePolicy::Continue`]
    pub keep_going: bool,
}

/// Fully resolved configuration for a packaging run
#[derive(Debug, Clone)]
pub struct PackagerConfig {
    /// Absolute project root; docs, compiler working dir and output live here
    pub project_root: PathBuf,
    /// Binary name and archive prefix
    pub name: String,
    /// Entry point passed to the compiler
    pub entry_point: String,
    /// Output directory relative to the project root
    pub out_dir: PathBuf,
    /// Targets in build order
    pub targets: Vec<Target>,
    /// Files copied next to every binary, relative to the project root
    pub docs: Vec<PathBuf>,
    /// Compiler program
    pub compiler: String,
    /// Build failure handling
    pub on_build_failure: BuildFailurePolicy,
}

impl PackagerConfig {
    /// Built-in defaults rooted at `project_root`
    pub fn with_defaults(project_root: impl Into<PathBuf>) -> Result<Self> {
        let targets = DEFAULT_TARGETS
            .iter()
            .map(|(os, arch)| Target::from_parts(os, arch))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            project_root: project_root.into(),
            name: DEFAULT_NAME.to_string(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            targets,
            docs: DEFAULT_DOCS.iter().map(PathBuf::from).collect(),
            compiler: DEFAULT_COMPILER.to_string(),
            on_build_failure: BuildFailurePolicy::default(),
        })
    }

    /// Resolve the configuration for `project_root`.
    ///
    /// Reads `config_path` if given (it must exist), otherwise
    /// `<project_root>/release.toml` if present, then applies `overrides`
    /// and validates the result.
    pub fn load(
        project_root: &Path,
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let project_root = project_root.absolutize()?.to_path_buf();
        let mut config = Self::with_defaults(&project_root)?;

        let file = match config_path {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
                .into());
            }
            Some(path) => Some(path.to_path_buf()),
            None => Some(project_root.join(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
        };

        if let Some(path) = file {
            log::info!("Loading configuration from {}", path.display());
            config.apply_file(ConfigFile::read(&path)?)?;
        }

        config.apply_overrides(overrides)?;
        config.validate()?;
        Ok(config)
    }

    /// Layer a parsed config file over the current values
    pub fn apply_file(&mut self, file: ConfigFile) -> Result<()> {
        if let Some(name) = file.name {
            self.name = name;
        }
        if let Some(entry_point) = file.entry_point {
            self.entry_point = entry_point;
        }
        if let Some(out_dir) = file.out_dir {
            self.out_dir = out_dir;
        }
        if let Some(targets) = file.targets {
            self.targets = parse_targets(&targets)?;
        }
        if let Some(docs) = file.docs {
            self.docs = docs;
        }
        if let Some(compiler) = file.compiler {
            self.compiler = compiler;
        }
        if let Some(policy) = file.on_build_failure {
            self.on_build_failure = policy;
        }
        Ok(())
    }

    /// Layer command-line overrides over the current values
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        if !overrides.targets.is_empty() {
            self.targets = parse_targets(&overrides.targets)?;
        }
        if let Some(out_dir) = &overrides.out_dir {
            self.out_dir = out_dir.clone();
        }
        if let Some(compiler) = &overrides.compiler {
            self.compiler = compiler.clone();
        }
        if overrides.keep_going {
            self.on_build_failure = BuildFailurePolicy::Continue;
        }
        Ok(())
    }

    /// Check invariants the packaging run relies on
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyField { field: "name" }.into());
        }
        if self.name.contains(['/', '\\']) || self.name.starts_with('.') {
            return Err(ConfigError::InvalidValue {
                field: "name",
                value: self.name.clone(),
                reason: "must be a plain file name".to_string(),
            }
            .into());
        }
        if self.entry_point.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                field: "entry_point",
            }
            .into());
        }
        if self.compiler.trim().is_empty() {
            return Err(ConfigError::EmptyField { field: "compiler" }.into());
        }

        validate_out_dir(&self.out_dir)?;

        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets.into());
        }
        let mut seen = HashSet::new();
        for target in &self.targets {
            if !seen.insert(target.to_string()) {
                return Err(ConfigError::DuplicateTarget {
                    target: target.to_string(),
                }
                .into());
            }
        }

        let mut doc_names = HashSet::new();
        for doc in &self.docs {
            let file_name = doc.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
                ConfigError::InvalidValue {
                    field: "docs",
                    value: doc.display().to_string(),
                    reason: "must name a file".to_string(),
                }
            })?;
            if !doc_names.insert(file_name.to_string()) {
                return Err(ConfigError::InvalidValue {
                    field: "docs",
                    value: doc.display().to_string(),
                    reason: "two docs share the same file name".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Output paths for this configuration
    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.project_root, &self.out_dir)
    }
}

fn parse_targets(raw: &[String]) -> Result<Vec<Target>> {
    Ok(raw
        .iter()
        .map(|t| t.parse::<Target>())
        .collect::<std::result::Result<Vec<_>, _>>()?)
}

/// The output directory is deleted on every run, so it must sit strictly
/// inside the project root.
fn validate_out_dir(out_dir: &Path) -> Result<()> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        field: "out_dir",
        value: out_dir.display().to_string(),
        reason: reason.to_string(),
    };

    let mut normal_components = 0;
    for component in out_dir.components() {
        match component {
            Component::Normal(_) => normal_components += 1,
            Component::CurDir => {}
            Component::ParentDir => return Err(invalid("must not contain '..'").into()),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("must be relative to the project root").into());
            }
        }
    }

    if normal_components == 0 {
        return Err(invalid("must name a subdirectory of the project root").into());
    }
    Ok(())
}
