//! Dry run: show what a packaging run would produce.

use crate::build::GoToolchain;
use crate::cli::RuntimeConfig;
use crate::config::PackagerConfig;
use crate::error::Result;
use crate::git::GitCli;
use crate::packager::Packager;

/// Resolve the tag and list binaries and archives without building
pub(super) async fn execute_plan(packager_config: PackagerConfig, config: &RuntimeConfig) -> Result<i32> {
    let compiler = GoToolchain::new(&packager_config.compiler);
    let tags = GitCli::new(&packager_config.project_root);
    let packager = Packager::new(packager_config, tags, compiler);

    let plan = packager.plan().await?;

    config.section(&format!("Plan for {} {}", packager.config().name, plan.tag));
    let _ = config
        .output()
        .info(&format!("{} would be deleted and recreated", plan.root.display()));

    for planned in &plan.targets {
        config.println(&format!("\n  {} ({}):", planned.target, planned.format));
        config.indent(&format!("binary:  {}", planned.binary.display()));
        config.indent(&format!("archive: {}", planned.archive.display()));
    }

    Ok(0)
}
