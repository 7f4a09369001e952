//! `go build` compiler.

use super::{BuildOutput, BuildRequest, Compiler};
use crate::error::{BuildError, Result};
use crate::target::Target;
use std::path::{Path, PathBuf};

/// Environment variable selecting the target OS
pub const GOOS: &str = "GOOS";
/// Environment variable selecting the target architecture
pub const GOARCH: &str = "GOARCH";
/// Environment variable toggling cgo
pub const CGO_ENABLED: &str = "CGO_ENABLED";

/// Go toolchain invoked as a subprocess
#[derive(Debug, Clone)]
pub struct GoToolchain {
    program: PathBuf,
}

impl GoToolchain {
    /// Use `program` as-is, without checking that it exists.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolve `program` on PATH (or as a path) up front, so a missing
    /// toolchain is reported before any output is deleted.
    pub fn locate(program: &str) -> Result<Self> {
        let resolved = which::which(program).map_err(|source| BuildError::CompilerNotFound {
            program: program.to_string(),
            source,
        })?;
        log::debug!("Using compiler at {}", resolved.display());
        Ok(Self::new(resolved))
    }

    /// Program that will be executed
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Environment for a static, cgo-free build of `target`
    pub fn build_env(target: &Target) -> [(&'static str, String); 3] {
        [
            (GOOS, target.os().to_string()),
            (GOARCH, target.arch().to_string()),
            (CGO_ENABLED, "0".to_string()),
        ]
    }
}

impl Default for GoToolchain {
    fn default() -> Self {
        Self::new("go")
    }
}

impl Compiler for GoToolchain {
    async fn build(&self, request: &BuildRequest) -> Result<BuildOutput> {
        log::debug!(
            "{} build -o {} {} (target {})",
            self.program.display(),
            request.output.display(),
            request.entry_point,
            request.target
        );

        let output = tokio::process::Command::new(&self.program)
            .arg("build")
            .arg("-o")
            .arg(&request.output)
            .arg(&request.entry_point)
            .current_dir(&request.working_dir)
            .envs(Self::build_env(&request.target))
            .output()
            .await
            .map_err(|source| BuildError::SpawnFailed {
                target: request.target.to_string(),
                source,
            })?;

        Ok(BuildOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
