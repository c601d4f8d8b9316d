//! `strata migrate`: apply every pending migration in order.

use serde::Serialize;

use strata_core::{
    application::{MigrationOptions, MigrationResult, RunReport, format_run_report},
    domain::{MigrationPreview, MigrationVersion},
};

use crate::{
    cli::{GlobalArgs, MigrateArgs},
    commands::build_runner,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// JSON shape of a run; the abort error is rendered as text.
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    dry_run: bool,
    success: bool,
    results: &'a [MigrationResult],
    previews: &'a [MigrationPreview],
    aborted: Option<AbortSummary>,
}

#[derive(Debug, Serialize)]
struct AbortSummary {
    version: MigrationVersion,
    error: String,
}

pub fn execute(
    args: MigrateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let runner = build_runner(&global, &config)?;
    let options = MigrationOptions {
        dry_run: args.dry_run,
        target: args.to,
    };
    let report = runner.run_all(&options)?;

    if output.is_json() {
        output.json(&summary(&report, options.dry_run))?;
    } else {
        output.block(&format_run_report(&report))?;
    }

    outcome(report, options.dry_run, &output)
}

fn summary(report: &RunReport, dry_run: bool) -> RunSummary<'_> {
    RunSummary {
        dry_run,
        success: report.is_success(),
        results: &report.results,
        previews: &report.previews,
        aborted: report.aborted.as_ref().map(|a| AbortSummary {
            version: a.version,
            error: a.error.to_string(),
        }),
    }
}

/// Map a finished run to the process result.
///
/// A storage error keeps its own category; a failed transform, real or
/// previewed, is a migration failure.
fn outcome(report: RunReport, dry_run: bool, output: &OutputManager) -> CliResult<()> {
    let applied = report.applied_versions();

    if let Some(aborted) = report.aborted {
        return Err(CliError::Core(aborted.error));
    }

    let failed = report
        .results
        .iter()
        .find(|r| !r.success())
        .map(|r| r.version)
        .or_else(|| report.previews.iter().find(|p| !p.is_ok()).map(|p| p.version));
    if let Some(version) = failed {
        return Err(CliError::MigrationFailed { version, applied });
    }

    if output.is_json() {
        return Ok(());
    }
    if dry_run {
        if !report.previews.is_empty() {
            output.info(&format!(
                "Dry run: {} migration(s) would be applied",
                report.previews.len()
            ))?;
        }
    } else if !applied.is_empty() {
        output.success(&format!("Applied {} migration(s)", applied.len()))?;
    }
    Ok(())
}
