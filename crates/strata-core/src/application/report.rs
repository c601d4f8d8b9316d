//! Plain-text reports for runner output.
//!
//! Pure formatting. Colour and layout choices beyond plain text belong to
//! the CLI.

use std::fmt::Write;

use crate::application::services::migration_runner::{MigrationOutcome, MigrationResult, RunReport};
use crate::domain::{MigrationPreview, MigrationStatus};

/// Human-readable report of one apply.
pub fn format_result(result: &MigrationResult) -> String {
    let mut out = String::new();
    let headline = match result.outcome {
        MigrationOutcome::Applied => "applied",
        MigrationOutcome::AlreadyApplied => "already applied",
        MigrationOutcome::Failed => "FAILED",
    };
    let _ = writeln!(out, "Migration {} ({}): {headline}", result.version, result.description);

    for file in &result.files {
        let mark = if file.written { "✓" } else { "-" };
        let _ = writeln!(out, "  {mark} {:<6} {}", file.action, file.path);
    }
    for error in &result.errors {
        let _ = writeln!(out, "  ✗ {error}");
    }
    if !result.skipped.is_empty() {
        let _ = writeln!(out, "  skipped: {}", result.skipped.join(", "));
    }
    if result.outcome == MigrationOutcome::Failed && !result.changes.is_empty() {
        let _ = writeln!(
            out,
            "  {} change(s) computed before the failure were not written",
            result.changes.len()
        );
    }
    out
}

/// Human-readable dry-run report.
pub fn format_preview(preview: &MigrationPreview) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Preview {} ({})", preview.version, preview.description);

    if preview.changes.is_empty() && preview.is_ok() {
        let _ = writeln!(out, "  no changes");
    }
    for change in &preview.changes {
        let _ = writeln!(out, "  {change}");
    }
    for error in preview.errors() {
        let _ = writeln!(out, "  ✗ {error}");
    }
    if !preview.skipped.is_empty() {
        let _ = writeln!(out, "  skipped: {}", preview.skipped.join(", "));
    }
    out
}

/// Applied, pending, and drifted migrations.
pub fn format_status(status: &MigrationStatus) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Applied ({}):", status.applied.len());
    for entry in &status.applied {
        let _ = writeln!(
            out,
            "  {:<10} {}",
            entry.version,
            entry.applied_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    let _ = writeln!(out, "Pending ({}):", status.pending.len());
    for pending in &status.pending {
        let _ = writeln!(out, "  {:<10} {}", pending.version, pending.description);
    }

    if !status.drifted.is_empty() {
        let _ = writeln!(out, "Drifted ({}):", status.drifted.len());
        for drift in &status.drifted {
            let _ = writeln!(
                out,
                "  {:<10} recorded {} != current {}",
                drift.version,
                short(&drift.recorded),
                short(&drift.current)
            );
        }
    }
    out
}

/// Every result or preview of a run, then the abort reason if any.
pub fn format_run_report(report: &RunReport) -> String {
    if report.is_empty() {
        return "Nothing to migrate.\n".to_string();
    }

    let mut out = String::new();
    for preview in &report.previews {
        out.push_str(&format_preview(preview));
    }
    for result in &report.results {
        out.push_str(&format_result(result));
    }
    if let Some(aborted) = &report.aborted {
        let _ = writeln!(out, "Run aborted at {}: {}", aborted.version, aborted.error);
    }
    out
}

fn short(checksum: &str) -> &str {
    checksum.get(..12).unwrap_or(checksum)
}
