//! Release tag resolution.
//!
//! The packager only needs one thing from version control: the most recent
//! tag reachable from HEAD. [`TagSource`] is the seam; [`GitCli`] is the
//! production implementation backed by the `git` executable.

mod describe;
mod operations;

pub use describe::GitCli;
pub use operations::{ReleaseTag, TagSource};
