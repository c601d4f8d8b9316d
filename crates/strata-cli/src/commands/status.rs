//! `strata status`: applied, pending, and drifted migrations.

use strata_core::application::format_status;

use crate::{
    cli::GlobalArgs, commands::build_runner, config::AppConfig, error::CliResult,
    output::OutputManager,
};

pub fn execute(global: GlobalArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let runner = build_runner(&global, &config)?;
    let status = runner.status()?;

    if output.is_json() {
        output.json(&status)?;
        return Ok(());
    }

    output.header(&format!("Project: {}", global.project.display()))?;
    output.block(&format_status(&status))?;

    for drift in &status.drifted {
        output.warning(&format!(
            "{} changed after it was applied; the ledger is left as recorded",
            drift.version
        ))?;
    }

    match status.next_pending() {
        Some(next) => output.info(&format!(
            "Next: {} ({}). Run 'strata migrate' to apply.",
            next.version, next.description
        ))?,
        None => output.success("Up to date")?,
    }
    Ok(())
}
