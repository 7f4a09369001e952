//! Command execution.
//!
//! Resolves the configuration, runs either a packaging run or a plan, and
//! turns the outcome into a process exit code.

mod package;
mod plan;

use crate::cli::{Args, RuntimeConfig};
use crate::config::PackagerConfig;
use crate::error::PackagerError;

use package::execute_package;
use plan::execute_plan;

/// Execute the command described by `args` and return the exit code.
///
/// Every error is reported here, with its recovery suggestions, on stderr.
pub async fn execute_command(args: Args) -> i32 {
    if let Err(validation_error) = args.validate() {
        let output = super::OutputManager::new(false, false);
        output.error(&format!("Invalid arguments: {}", validation_error));
        return 1;
    }

    let config = RuntimeConfig::from(&args);
    let command = if args.plan { "plan" } else { "package" };

    let result = match PackagerConfig::load(&args.project_root, args.config.as_deref(), &args.overrides()) {
        Ok(packager_config) if args.plan => execute_plan(packager_config, &config).await,
        Ok(packager_config) => execute_package(packager_config, &config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(exit_code) => exit_code,
        Err(e) => {
            report_error(&config, command, &e);
            1
        }
    }
}

fn report_error(config: &RuntimeConfig, command: &str, error: &PackagerError) {
    config.error_println(&format!("Command '{}' failed: {}", command, error));

    let suggestions = error.recovery_suggestions();
    if !suggestions.is_empty() {
        config.error_detail_println("\n💡 Recovery suggestions:");
        for suggestion in suggestions {
            config.error_detail_println(&format!("  • {}", suggestion));
        }
    }
}
