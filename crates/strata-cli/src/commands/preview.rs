//! `strata preview`: dry-run a single migration.

use strata_core::application::format_preview;

use crate::{
    cli::{GlobalArgs, PreviewArgs},
    commands::build_runner,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Preview `args.version`, or the next pending migration when omitted.
pub fn execute(
    args: PreviewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let runner = build_runner(&global, &config)?;

    let version = match args.version {
        Some(version) => version,
        None => match runner.status()?.next_pending() {
            Some(next) => next.version,
            None => {
                output.success("Up to date; nothing to preview")?;
                return Ok(());
            }
        },
    };

    let preview = runner.preview(version)?;

    if output.is_json() {
        output.json(&preview)?;
        return Ok(());
    }

    output.block(&format_preview(&preview))?;
    if !preview.is_ok() {
        output.warning(&format!(
            "{version} would fail; applying it now would write nothing"
        ))?;
    }
    Ok(())
}
