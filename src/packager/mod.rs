//! Release packaging orchestration.
//!
//! [`Packager`] runs the whole pipeline strictly in order:
//!
//! 1. reset the output tree
//! 2. resolve the release tag
//! 3. for each target: build, verify the binary, copy the docs, archive
//!
//! Nothing is retried. A failing build aborts the run unless the
//! configuration asks to continue, in which case the failure is recorded in
//! the [`PackageReport`] and the remaining targets are still packaged.

mod layout;

pub use layout::{OutputLayout, RELEASE_DIR_NAME};

use crate::archive::{self, ArchiveFormat};
use crate::build::{BuildOutput, BuildRequest, Compiler};
use crate::config::{BuildFailurePolicy, PackagerConfig};
use crate::error::{BuildError, ErrorExt, PackagerError, Result};
use crate::git::{ReleaseTag, TagSource};
use crate::target::Target;
use crate::utils::{checksum, fs};
use std::path::{Path, PathBuf};

/// A finished release archive
#[derive(Debug, Clone)]
pub struct PackagedArtifact {
    /// Target the archive was built for
    pub target: Target,
    /// Archive format
    pub format: ArchiveFormat,
    /// Archive path
    pub path: PathBuf,
    /// Archive size in bytes
    pub size: u64,
    /// Hex-encoded SHA-256 of the archive
    pub sha256: String,
}

/// A target whose build failed under [`BuildFailurePolicy::Continue`]
#[derive(Debug)]
pub struct TargetFailure {
    /// Target that failed
    pub target: Target,
    /// Why it failed
    pub error: BuildError,
}

/// Outcome of a packaging run
#[derive(Debug)]
pub struct PackageReport {
    /// Tag embedded in every archive name
    pub tag: ReleaseTag,
    /// Archives produced, in target order
    pub artifacts: Vec<PackagedArtifact>,
    /// Targets skipped because their build failed
    pub failures: Vec<TargetFailure>,
}

impl PackageReport {
    /// True when every target produced an archive
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One target of a dry run
#[derive(Debug, Clone)]
pub struct PlannedTarget {
    /// Target
    pub target: Target,
    /// Where the binary would be built
    pub binary: PathBuf,
    /// Where the archive would be written
    pub archive: PathBuf,
    /// Archive format
    pub format: ArchiveFormat,
}

/// What a run would produce, without producing it
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    /// Resolved release tag
    pub tag: ReleaseTag,
    /// Output root that a run would recreate
    pub root: PathBuf,
    /// Per-target outputs, in build order
    pub targets: Vec<PlannedTarget>,
}

/// Progress notifications emitted during [`Packager::run_observed`]
#[derive(Debug)]
pub enum PackageEvent<'a> {
    /// Output tree was deleted and recreated
    TreeReset {
        /// Output root
        root: &'a Path,
    },
    /// Release tag was resolved
    TagResolved {
        /// The tag
        tag: &'a ReleaseTag,
    },
    /// Compiler is about to run for a target
    Building {
        /// Target being built
        target: &'a Target,
    },
    /// A successful build printed something (warnings, usually)
    CompilerOutput {
        /// Target that was built
        target: &'a Target,
        /// Captured stdout, trimmed
        stdout: &'a str,
        /// Captured stderr, trimmed
        stderr: &'a str,
    },
    /// A build failed and the run continues
    BuildSkipped {
        /// Target that failed
        target: &'a Target,
        /// Why it failed
        error: &'a BuildError,
    },
    /// An archive was written
    Archived {
        /// The archive
        artifact: &'a PackagedArtifact,
    },
}

/// Drives a packaging run for one configuration
#[derive(Debug)]
pub struct Packager<T, C> {
    config: PackagerConfig,
    layout: OutputLayout,
    tags: T,
    compiler: C,
}

impl<T: TagSource, C: Compiler> Packager<T, C> {
    /// Packager for a validated configuration
    pub fn new(config: PackagerConfig, tags: T, compiler: C) -> Self {
        let layout = config.layout();
        Self {
            config,
            layout,
            tags,
            compiler,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &PackagerConfig {
        &self.config
    }

    /// Output layout in use
    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Resolve the tag and list every output a run would produce.
    ///
    /// Touches neither the output tree nor the compiler.
    pub async fn plan(&self) -> Result<ReleasePlan> {
        let tag = self.tags.latest_tag().await?;
        let targets = self
            .config
            .targets
            .iter()
            .map(|target| PlannedTarget {
                target: target.clone(),
                binary: self.layout.binary_path(target, &self.config.name),
                archive: self.layout.archive_path(&self.config.name, &tag, target),
                format: target.archive_format(),
            })
            .collect();

        Ok(ReleasePlan {
            tag,
            root: self.layout.root().to_path_buf(),
            targets,
        })
    }

    /// Run the full pipeline.
    pub async fn run(&self) -> Result<PackageReport> {
        self.run_observed(|_| {}).await
    }

    /// Run the full pipeline, reporting progress to `observe`.
    pub async fn run_observed<F>(&self, mut observe: F) -> Result<PackageReport>
    where
        F: FnMut(PackageEvent<'_>),
    {
        self.layout.reset().await?;
        observe(PackageEvent::TreeReset {
            root: self.layout.root(),
        });

        let tag = self.tags.latest_tag().await?;
        log::info!("Packaging {} {}", self.config.name, tag);
        observe(PackageEvent::TagResolved { tag: &tag });

        let mut artifacts = Vec::with_capacity(self.config.targets.len());
        let mut failures = Vec::new();

        for target in &self.config.targets {
            observe(PackageEvent::Building { target });

            match self.build_target(target).await {
                Ok(output) => {
                    let (stdout, stderr) = (output.stdout.trim(), output.stderr.trim());
                    if !stdout.is_empty() || !stderr.is_empty() {
                        log::debug!("Compiler output for {}: stdout={:?} stderr={:?}", target, stdout, stderr);
                        observe(PackageEvent::CompilerOutput {
                            target,
                            stdout,
                            stderr,
                        });
                    }
                }
                Err(PackagerError::Build(error))
                    if self.config.on_build_failure == BuildFailurePolicy::Continue =>
                {
                    log::warn!("Skipping {}: {}", target, error);
                    observe(PackageEvent::BuildSkipped {
                        target,
                        error: &error,
                    });
                    failures.push(TargetFailure {
                        target: target.clone(),
                        error,
                    });
                    continue;
                }
                Err(e) => return Err(e),
            }

            self.copy_docs(target).await?;

            let artifact = self.archive_target(target, &tag).await?;
            observe(PackageEvent::Archived {
                artifact: &artifact,
            });
            artifacts.push(artifact);
        }

        Ok(PackageReport {
            tag,
            artifacts,
            failures,
        })
    }

    /// Compile the binary for `target` into its staging directory.
    async fn build_target(&self, target: &Target) -> Result<BuildOutput> {
        let target_dir = self.layout.target_dir(target);
        fs::ensure_dir(&target_dir).await?;

        let output = self.layout.binary_path(target, &self.config.name);
        log::info!("Building {} for {}", self.config.name, target);

        let request = BuildRequest {
            target: target.clone(),
            entry_point: self.config.entry_point.clone(),
            output: output.clone(),
            working_dir: self.config.project_root.clone(),
        };
        let result = self.compiler.build(&request).await?;

        if !result.success {
            return Err(BuildError::Failed {
                target: target.to_string(),
                code: result.code,
                stderr: result.stderr.trim().to_string(),
            }
            .into());
        }

        if !output.is_file() {
            return Err(BuildError::MissingBinary {
                target: target.to_string(),
                path: output,
            }
            .into());
        }

        log::debug!("Built {}", output.display());
        Ok(result)
    }

    async fn copy_docs(&self, target: &Target) -> Result<()> {
        let target_dir = self.layout.target_dir(target);
        for doc in &self.config.docs {
            let source = self.config.project_root.join(doc);
            // validate() guarantees every doc has a file name
            let Some(file_name) = doc.file_name() else {
                continue;
            };
            fs::copy_file(&source, &target_dir.join(file_name)).await?;
        }
        Ok(())
    }

    async fn archive_target(&self, target: &Target, tag: &ReleaseTag) -> Result<PackagedArtifact> {
        let format = target.archive_format();
        let path = self.layout.archive_path(&self.config.name, tag, target);

        let entries = archive::create_archive(
            format,
            &self.layout.target_dir(target),
            &path,
            &self.config.name,
        )
        .await?;

        let size = tokio::fs::metadata(&path)
            .await
            .fs_context("reading metadata of", &path)?
            .len();
        let sha256 = checksum::sha256_file(&path).await?;

        log::info!(
            "Created {} ({} entries, {} bytes)",
            path.display(),
            entries,
            size
        );

        Ok(PackagedArtifact {
            target: target.clone(),
            format,
            path,
            size,
            sha256,
        })
    }
}
