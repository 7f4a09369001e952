//! Packaging run.

use crate::build::GoToolchain;
use crate::cli::RuntimeConfig;
use crate::config::PackagerConfig;
use crate::error::Result;
use crate::git::GitCli;
use crate::packager::{PackageEvent, PackageReport, Packager};

/// Build and archive every configured target
pub(super) async fn execute_package(packager_config: PackagerConfig, config: &RuntimeConfig) -> Result<i32> {
    // Fail on a missing toolchain before the output tree is wiped
    let compiler = GoToolchain::locate(&packager_config.compiler)?;
    let tags = GitCli::new(&packager_config.project_root);
    let packager = Packager::new(packager_config, tags, compiler);

    config.section(&format!("Packaging {}", packager.config().name));
    config.verbose_println(&format!(
        "Project root: {}",
        packager.config().project_root.display()
    ));

    let report = packager
        .run_observed(|event| match event {
            PackageEvent::TreeReset { root } => {
                config.verbose_println(&format!("Recreated {}", root.display()));
            }
            PackageEvent::TagResolved { tag } => {
                config.println(&format!("🏷  Release tag: {}", tag));
            }
            PackageEvent::Building { target } => {
                config.progress_println(&format!("Building {}", target));
            }
            PackageEvent::CompilerOutput {
                target,
                stdout,
                stderr,
            } => {
                for line in stdout.lines() {
                    config.verbose_println(&format!("[{}] {}", target, line));
                }
                for line in stderr.lines() {
                    config.warning_println(&format!("[{}] {}", target, line));
                }
            }
            PackageEvent::BuildSkipped { target, error } => {
                config.warning_println(&format!("{} skipped: {}", target, error));
            }
            PackageEvent::Archived { artifact } => {
                config.success_println(&format!(
                    "{} → {}",
                    artifact.target,
                    artifact.path.display()
                ));
            }
        })
        .await?;

    print_summary(&report, config);

    Ok(if report.is_success() { 0 } else { 1 })
}

fn print_summary(report: &PackageReport, config: &RuntimeConfig) {
    config.section("Summary");

    if report.artifacts.is_empty() {
        config.warning_println("No archives were created");
    } else {
        config.success_println(&format!(
            "Created {} archive(s) for {}",
            report.artifacts.len(),
            report.tag
        ));
    }

    for artifact in &report.artifacts {
        let size_mb = artifact.size as f64 / 1_048_576.0;
        config.println(&format!(
            "\n  {} ({}):",
            artifact.target, artifact.format
        ));
        config.indent(&format!("📦 {} ({:.2} MB)", artifact.path.display(), size_mb));
        config.indent(&format!("🔐 SHA256: {}", artifact.sha256));
    }

    if !report.failures.is_empty() {
        config.error_println(&format!(
            "{} target(s) failed to build",
            report.failures.len()
        ));
        for failure in &report.failures {
            config.error_println(&format!("  {}: {}", failure.target, failure.error));
        }
    }
}
