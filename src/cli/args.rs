//! Command line argument parsing and validation.
//!
//! Every flag is optional: run from the project root with no arguments and
//! the packager builds the default target list into `_out/`.

use crate::config::ConfigOverrides;
use clap::Parser;
use std::path::PathBuf;

/// Cross-compile and package release archives
#[derive(Parser, Debug)]
#[command(
    name = "release_packager",
    version,
    about = "Cross-compile a Go command and package one release archive per target",
    long_about = "Cross-compile a Go command for every configured OS_ARCH target and package
each build, together with README.md, CHANGELOG.md and LICENSE.md, into
<out>/_release/<name>-<tag>_<target>.zip (windows, darwin) or .tar.gz.

The output directory is deleted and recreated on every run.

Usage:
  release_packager
  release_packager --target linux_amd64 --target windows_amd64
  release_packager --project-root ../brother-cert --keep-going
  release_packager --plan"
)]
pub struct Args {
    /// Project root containing the sources, docs and release.toml
    #[arg(long, value_name = "DIR", env = "RELEASE_PACKAGER_ROOT", default_value = ".")]
    pub project_root: PathBuf,

    /// Config file (default: <project-root>/release.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Build only these targets, in this order (repeatable)
    #[arg(long = "target", value_name = "OS_ARCH")]
    pub targets: Vec<String>,

    /// Output directory relative to the project root
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Compiler program to invoke
    #[arg(long, value_name = "PROGRAM")]
    pub compiler: Option<String>,

    /// Package the remaining targets when a build fails (still exits non-zero)
    #[arg(long)]
    pub keep_going: bool,

    /// Print what would be produced without building anything
    #[arg(long)]
    pub plan: bool,

    /// Also print compiler stdout and extra detail (compiler warnings are always shown)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.project_root.as_os_str().is_empty() {
            return Err("--project-root must not be empty".to_string());
        }
        if self.plan && self.keep_going {
            return Err("--keep-going has no effect with --plan".to_string());
        }
        Ok(())
    }

    /// Config values given on the command line
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            targets: self.targets.clone(),
            out_dir: self.out_dir.clone(),
            compiler: self.compiler.clone(),
            keep_going: self.keep_going,
        }
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(verbose, quiet),
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print message only in verbose mode
    pub fn verbose_println(&self, message: &str) {
        let _ = self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print an indented line under an error (always shown, on stderr)
    pub fn error_detail_println(&self, message: &str) {
        self.output.error_detail(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print progress message
    pub fn progress_println(&self, message: &str) {
        let _ = self.output.progress(message);
    }

    /// Print section header
    pub fn section(&self, title: &str) {
        let _ = self.output.section(title);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }

    /// Check if verbose output is enabled
    pub fn is_verbose(&self) -> bool {
        self.output.is_verbose()
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.verbose, args.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_uses_defaults() {
        let args = Args::try_parse_from(["release_packager"]).unwrap();
        assert!(args.targets.is_empty());
        assert!(!args.keep_going);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_repeated_targets_keep_order() {
        let args = Args::try_parse_from([
            "release_packager",
            "--target",
            "windows_amd64",
            "--target",
            "linux_amd64",
            "--keep-going",
        ])
        .unwrap();
        let overrides = args.overrides();
        assert_eq!(overrides.targets, vec!["windows_amd64", "linux_amd64"]);
        assert!(overrides.keep_going);
    }

    #[test]
    fn test_plan_with_keep_going_is_rejected() {
        let args =
            Args::try_parse_from(["release_packager", "--plan", "--keep-going"]).unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["release_packager", "-v", "-q"]).is_err());
    }
}
