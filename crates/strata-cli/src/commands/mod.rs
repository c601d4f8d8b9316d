//! Command handlers, one module per subcommand.
//!
//! Handlers translate parsed arguments into calls on the core
//! [`MigrationRunner`] and render the outcome through [`OutputManager`].
//!
//! [`OutputManager`]: crate::output::OutputManager

use std::path::Path;

use tracing::debug;

use strata_adapters::{JsonTrackerStore, LocalFilesystem, builtin_migrations};
use strata_core::{application::MigrationRunner, domain::RelativePath};

use crate::{cli::GlobalArgs, config::AppConfig, error::CliResult};

pub mod apply;
pub mod config;
pub mod init;
pub mod layer;
pub mod migrate;
pub mod preview;
pub mod status;

/// Wire the built-in catalog to the project named by `-C/--project`.
///
/// The ledger lives at `project.tracker_file`, relative to the project root
/// unless absolute. When it falls inside the project it is reserved, so no
/// migration can read or rewrite it whatever `project.ignore` says.
pub(crate) fn build_runner(global: &GlobalArgs, config: &AppConfig) -> CliResult<MigrationRunner> {
    let root = global.project_root()?;
    let registry = builtin_migrations::registry()?;
    let tracker_path = root.join(&config.project.tracker_file);

    let mut filesystem =
        LocalFilesystem::new(&root).with_ignored(config.project.ignore.iter());
    match ledger_in_project(&root, &tracker_path) {
        Some(ledger) => filesystem = filesystem.reserving(ledger),
        None => debug!(tracker = %tracker_path.display(), "ledger outside the project tree"),
    }

    debug!(
        root = %root.display(),
        tracker = %tracker_path.display(),
        migrations = registry.len(),
        "runner configured"
    );

    Ok(MigrationRunner::new(
        registry,
        Box::new(filesystem),
        Box::new(JsonTrackerStore::new(tracker_path)),
    ))
}

/// The ledger's path relative to `root`, if it lies inside it.
fn ledger_in_project(root: &Path, tracker_path: &Path) -> Option<RelativePath> {
    let relative = tracker_path.strip_prefix(root).ok()?;
    RelativePath::try_new(relative).ok()
}
