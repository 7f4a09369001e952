//! Error types for release packaging.
//!
//! Every failure mode of a packaging run maps onto one of the domain enums
//! below, wrapped by [`PackagerError`]. Filesystem failures carry the path
//! that caused them via [`ErrorExt::fs_context`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for packaging operations
pub type Result<T> = std::result::Result<T, PackagerError>;

/// Main error type for all packaging operations
#[derive(Error, Debug)]
pub enum PackagerError {
    /// Configuration errors (invalid targets, unreadable release.toml, ...)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Release tag resolution errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Compiler invocation errors
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Archive creation errors
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Operation that failed (e.g., "copying release file")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// A file expected in the project root is missing
    #[error("{path} does not exist or is not a regular file")]
    MissingFile {
        /// Path that was expected to be a file
        path: PathBuf,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration errors, all detected before the output tree is touched
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Target string is not of the form `OS_ARCH`
    #[error("invalid target '{target}': {reason}")]
    InvalidTarget {
        /// Target string as configured
        target: String,
        /// Reason for the error
        reason: String,
    },

    /// Target list is empty
    #[error("no targets configured")]
    NoTargets,

    /// Same target listed twice
    #[error("target '{target}' is listed more than once")]
    DuplicateTarget {
        /// Duplicated target
        target: String,
    },

    /// Required field is empty
    #[error("'{field}' must not be empty")]
    EmptyField {
        /// Field name
        field: &'static str,
    },

    /// Invalid value for a field
    #[error("invalid {field} '{value}': {reason}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Offending value
        value: String,
        /// Reason for the error
        reason: String,
    },

    /// Explicitly requested config file does not exist
    #[error("config file not found: {path}")]
    NotFound {
        /// Path to the config file
        path: PathBuf,
    },

    /// Config file could not be read
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Config file is not valid TOML or has unknown keys
    #[error("failed to parse {path}: {source}")]
    ParseFailed {
        /// Path to the config file
        path: PathBuf,
        /// Parsing error
        #[source]
        source: toml::de::Error,
    },
}

/// Release tag resolution errors
#[derive(Error, Debug)]
pub enum GitError {
    /// git could not be spawned
    #[error("failed to run '{command}': {source}")]
    SpawnFailed {
        /// Command line that was attempted
        command: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// `git describe` exited unsuccessfully (no tag, not a repository, ...)
    #[error("could not determine release tag: {stderr}")]
    NoTag {
        /// Captured stderr of git
        stderr: String,
    },

    /// git printed something that is not a usable tag
    #[error("git returned an unusable tag: {reason}")]
    InvalidTag {
        /// Reason for the error
        reason: String,
    },
}

/// Compiler invocation errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// Compiler program is not on PATH
    #[error("compiler '{program}' not found: {source}")]
    CompilerNotFound {
        /// Program that was looked up
        program: String,
        /// Lookup error
        #[source]
        source: which::Error,
    },

    /// Compiler process could not be started
    #[error("failed to start compiler for {target}: {source}")]
    SpawnFailed {
        /// Target being built
        target: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Compiler exited unsuccessfully
    #[error("build for {target} failed (exit code {}): {stderr}", .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    Failed {
        /// Target being built
        target: String,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Captured stderr of the compiler
        stderr: String,
    },

    /// Compiler reported success but produced no binary
    #[error("build for {target} succeeded but {path} was not produced")]
    MissingBinary {
        /// Target being built
        target: String,
        /// Expected binary path
        path: PathBuf,
    },
}

impl BuildError {
    /// Target the error refers to, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            BuildError::CompilerNotFound { .. } => None,
            BuildError::SpawnFailed { target, .. }
            | BuildError::Failed { target, .. }
            | BuildError::MissingBinary { target, .. } => Some(target.as_str()),
        }
    }
}

/// Archive creation errors
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// zip writer error
    #[error("failed to write {path}: {source}")]
    Zip {
        /// Archive path
        path: PathBuf,
        /// Underlying zip error
        #[source]
        source: zip::result::ZipError,
    },

    /// Listing the directory to archive failed
    #[error("failed to list {path}: {source}")]
    Walk {
        /// Directory being archived
        path: PathBuf,
        /// Underlying walkdir error
        #[source]
        source: walkdir::Error,
    },

    /// Entry name cannot be stored in an archive
    #[error("file name is not valid UTF-8: {path}")]
    NonUtf8Name {
        /// Offending path
        path: PathBuf,
    },

    /// Background archive task did not complete
    #[error("archive task for {path} did not complete: {reason}")]
    TaskFailed {
        /// Archive path
        path: PathBuf,
        /// Join error description
        reason: String,
    },
}

impl PackagerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PackagerError::Git(GitError::SpawnFailed { .. }) => vec![
                "Install git and make sure it is on PATH".to_string(),
            ],
            PackagerError::Git(GitError::NoTag { .. }) => vec![
                "Run from inside the project's git repository".to_string(),
                "Create a release tag first: git tag v0.1.0".to_string(),
                "Fetch tags from the remote: git fetch --tags".to_string(),
            ],
            PackagerError::Config(ConfigError::InvalidTarget { .. }) => vec![
                "Targets are written as OS_ARCH, e.g. linux_amd64 or darwin_arm64".to_string(),
                "List valid pairs with: go tool dist list".to_string(),
            ],
            PackagerError::Config(ConfigError::ParseFailed { .. }) => vec![
                "Check release.toml for typos; unknown keys are rejected".to_string(),
            ],
            PackagerError::Build(BuildError::CompilerNotFound { program, .. }) => vec![
                format!("Install '{}' or pass --compiler with its path", program),
            ],
            PackagerError::Build(BuildError::Failed { target, .. }) => vec![
                format!("Reproduce the failing build for {} and fix it", target),
                "Pass --keep-going to package the remaining targets anyway".to_string(),
            ],
            PackagerError::MissingFile { .. } => vec![
                "Release docs are copied from the project root; check --project-root".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

/// Extension trait for filesystem operations with automatic path context.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "copying binary".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| PackagerError::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}
