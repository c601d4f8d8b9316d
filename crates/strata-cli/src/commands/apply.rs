//! `strata apply`: apply exactly one migration.

use strata_core::application::{MigrationOutcome, format_result};

use crate::{
    cli::{ApplyArgs, GlobalArgs},
    commands::build_runner,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    args: ApplyArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let runner = build_runner(&global, &config)?;
    let result = runner.apply(args.version)?;

    if output.is_json() {
        output.json(&result)?;
    } else {
        output.block(&format_result(&result))?;
    }

    match result.outcome {
        MigrationOutcome::Applied => {
            if !output.is_json() {
                output.success(&format!("Applied {}", result.version))?;
            }
            Ok(())
        }
        MigrationOutcome::AlreadyApplied => {
            if !output.is_json() {
                output.info(&format!("{} is already applied", result.version))?;
            }
            Ok(())
        }
        MigrationOutcome::Failed => Err(CliError::MigrationFailed {
            version: result.version,
            applied: Vec::new(),
        }),
    }
}
