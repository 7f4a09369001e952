//! Build targets written as `OS_ARCH` strings.
//!
//! The OS and architecture identifiers follow the Go toolchain's `GOOS` and
//! `GOARCH` vocabulary (`linux_amd64`, `darwin_arm64`, ...). Parsing is strict:
//! a target that does not split into exactly two non-empty parts is a
//! configuration error rather than a pair of garbage environment values.
//! Both parts are restricted to ASCII letters and digits, since the target
//! string also names a directory under the output root.

use crate::archive::ArchiveFormat;
use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Separator between the OS and architecture components
pub const TARGET_SEPARATOR: char = '_';

/// A single (operating system, CPU architecture) build target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    os: String,
    arch: String,
}

impl Target {
    /// Build a target from its components.
    pub fn from_parts(os: &str, arch: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidTarget {
            target: format!("{os}{TARGET_SEPARATOR}{arch}"),
            reason: reason.to_string(),
        };

        if os.is_empty() || arch.is_empty() {
            return Err(invalid("OS and architecture must both be non-empty"));
        }
        if os.contains(TARGET_SEPARATOR) || arch.contains(TARGET_SEPARATOR) {
            return Err(invalid("expected exactly one '_' separator"));
        }
        if os.chars().chain(arch.chars()).any(char::is_whitespace) {
            return Err(invalid("whitespace is not allowed"));
        }
        if !os.chars().chain(arch.chars()).all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid("OS and architecture may only contain ASCII letters and digits"));
        }

        Ok(Self {
            os: os.to_string(),
            arch: arch.to_string(),
        })
    }

    /// Operating system component (e.g. `linux`)
    pub fn os(&self) -> &str {
        &self.os
    }

    /// Architecture component (e.g. `amd64`)
    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// Whether this target's OS is Windows (case-insensitive)
    pub fn is_windows(&self) -> bool {
        self.os.eq_ignore_ascii_case("windows")
    }

    /// File extension for executables on this target
    pub fn binary_extension(&self) -> &'static str {
        if self.is_windows() { ".exe" } else { "" }
    }

    /// Executable file name for a binary called `name`
    pub fn binary_file_name(&self, name: &str) -> String {
        format!("{}{}", name, self.binary_extension())
    }

    /// Archive format used when packaging this target
    pub fn archive_format(&self) -> ArchiveFormat {
        ArchiveFormat::for_os(&self.os)
    }
}

impl FromStr for Target {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(TARGET_SEPARATOR).collect();
        if parts.len() != 2 {
            return Err(ConfigError::InvalidTarget {
                target: s.to_string(),
                reason: format!(
                    "expected OS_ARCH with exactly one '_' separator, found {} part(s)",
                    parts.len()
                ),
            });
        }

        Target::from_parts(parts[0], parts[1]).map_err(|e| match e {
            ConfigError::InvalidTarget { reason, .. } => ConfigError::InvalidTarget {
                target: s.to_string(),
                reason,
            },
            other => other,
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.os, TARGET_SEPARATOR, self.arch)
    }
}
