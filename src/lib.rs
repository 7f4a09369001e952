//! # Release Packager
//!
//! Cross-compiles a Go command for a fixed list of `OS_ARCH` targets and
//! packages each build, with its readme, changelog and license, into one
//! release archive per target.
//!
//! ## Pipeline
//!
//! 1. Validate the configuration (targets must be `OS_ARCH`)
//! 2. Delete and recreate the output tree
//! 3. Resolve the release tag with `git describe --tags --abbrev=0`
//! 4. For each target: `go build` with `GOOS`/`GOARCH`/`CGO_ENABLED=0`,
//!    copy the docs, archive as `.zip` (windows, darwin) or `.tar.gz`
//!
//! ## Usage
//!
//! ```bash
//! release_packager                                   # default targets into _out/
//! release_packager --target linux_amd64 --keep-going
//! release_packager --plan                            # dry run
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod archive;
pub mod build;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod packager;
pub mod target;
pub mod utils;

pub use archive::ArchiveFormat;
pub use build::{BuildOutput, BuildRequest, Compiler, GoToolchain};
pub use cli::Args;
pub use config::{BuildFailurePolicy, ConfigOverrides, PackagerConfig};
pub use error::{PackagerError, Result};
pub use git::{GitCli, ReleaseTag, TagSource};
pub use packager::{OutputLayout, PackageEvent, PackageReport, PackagedArtifact, Packager};
pub use target::Target;
