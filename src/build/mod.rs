//! Cross-compilation of the released command.
//!
//! The compiler is an external collaborator. [`Compiler`] is the seam the
//! packager drives; [`GoToolchain`] runs `go build` with the target's
//! environment attached to that one subprocess, so the packager's own
//! environment is never mutated.

mod go;

pub use go::GoToolchain;

use crate::error::Result;
use crate::target::Target;
use std::future::Future;
use std::path::PathBuf;

/// One binary to build
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Target to compile for
    pub target: Target,
    /// Package or entry point handed to the compiler (e.g. `./cmd/brother-cert`)
    pub entry_point: String,
    /// Where the single output binary must be written
    pub output: PathBuf,
    /// Working directory for the compiler (the project root)
    pub working_dir: PathBuf,
}

/// Outcome of a compiler invocation that was started successfully
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    /// Whether the compiler exited with status zero
    pub success: bool,
    /// Exit code, if any
    pub code: Option<i32>,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
}

impl BuildOutput {
    /// Successful build with no output
    pub fn success() -> Self {
        Self {
            success: true,
            code: Some(0),
            ..Default::default()
        }
    }

    /// Failed build with the given exit code and stderr
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Anything that can turn a [`BuildRequest`] into a binary on disk
pub trait Compiler {
    /// Run the build. `Err` means the compiler could not be started at all;
    /// a compiler that ran and failed is reported through [`BuildOutput`].
    fn build(&self, request: &BuildRequest) -> impl Future<Output = Result<BuildOutput>>;
}
