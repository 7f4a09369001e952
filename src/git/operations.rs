//! Tag source trait and the release tag value type.

use crate::error::{GitError, Result};
use std::fmt;
use std::future::Future;

/// Anything that can resolve the release tag for the current checkout
pub trait TagSource {
    /// Most recent tag reachable from HEAD
    fn latest_tag(&self) -> impl Future<Output = Result<ReleaseTag>>;
}

/// Version-control tag identifying the release, embedded verbatim in
/// every archive file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag(String);

impl ReleaseTag {
    /// Validate raw tag text, trimming surrounding whitespace.
    pub fn new(raw: &str) -> Result<Self> {
        let tag = raw.trim();
        if tag.is_empty() {
            return Err(GitError::InvalidTag {
                reason: "tag is empty".to_string(),
            }
            .into());
        }
        if tag.contains(['/', '\\']) || tag.chars().any(char::is_whitespace) {
            return Err(GitError::InvalidTag {
                reason: format!("'{}' cannot be used in a file name", tag),
            }
            .into());
        }
        Ok(Self(tag.to_string()))
    }

    /// Tag text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
