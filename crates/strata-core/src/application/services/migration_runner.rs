//! Migration Runner - main application orchestrator.
//!
//! This service coordinates the migration workflow:
//! 1. Load and verify the ledger against the catalog
//! 2. Snapshot the project through the `Filesystem` port
//! 3. Fold the migration's transforms over the snapshot
//! 4. Commit the net changes, then append one ledger entry
//!
//! A failed fold commits nothing. A storage failure during commit stops the
//! run where it is; files already written are not rolled back.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TrackerStore},
    },
    domain::{
        AppliedMigration, ChangeKind, FileTree, Migration, MigrationPreview, MigrationRegistry,
        MigrationStatus, MigrationTracker, MigrationVersion, RelativePath, TransformChange,
        TransformError,
    },
    error::{StrataError, StrataResult},
};

// ── Results ──────────────────────────────────────────────────────────────────

/// How an `apply` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationOutcome {
    /// Changes committed and the ledger entry recorded.
    Applied,
    /// Already in the ledger; nothing was done.
    AlreadyApplied,
    /// A transform failed; nothing was committed.
    Failed,
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResult {
    pub path: RelativePath,
    pub action: &'static str,
    pub written: bool,
}

/// Outcome of applying a single migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationResult {
    pub version: MigrationVersion,
    pub description: String,
    pub outcome: MigrationOutcome,
    /// Changes gathered by the fold. On failure these are the changes of the
    /// transforms that succeeded before it; none of them were committed.
    pub changes: Vec<TransformChange>,
    pub files: Vec<FileResult>,
    pub errors: Vec<TransformError>,
    /// Transforms not run because an earlier one failed.
    pub skipped: Vec<String>,
}

impl MigrationResult {
    fn already_applied(migration: &Migration) -> Self {
        Self {
            version: migration.version(),
            description: migration.description().to_string(),
            outcome: MigrationOutcome::AlreadyApplied,
            changes: Vec::new(),
            files: Vec::new(),
            errors: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// `false` only when a transform failed.
    pub fn success(&self) -> bool {
        self.outcome != MigrationOutcome::Failed
    }
}

/// Options for [`MigrationRunner::run_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationOptions {
    /// Preview every pending migration instead of applying it.
    pub dry_run: bool,
    /// Stop after this version (inclusive).
    pub target: Option<MigrationVersion>,
}

/// A run stopped by a storage or ledger error.
#[derive(Debug, Clone, PartialEq)]
pub struct AbortedRun {
    pub version: MigrationVersion,
    pub error: StrataError,
}

/// Everything a run produced, in version order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Apply results. Empty for dry runs.
    pub results: Vec<MigrationResult>,
    /// Chained previews. Empty unless the run was a dry run.
    pub previews: Vec<MigrationPreview>,
    pub aborted: Option<AbortedRun>,
}

impl RunReport {
    /// No transform failed and no storage error stopped the run.
    pub fn is_success(&self) -> bool {
        self.aborted.is_none()
            && self.results.iter().all(MigrationResult::success)
            && self.previews.iter().all(MigrationPreview::is_ok)
    }

    /// Versions committed during this run.
    pub fn applied_versions(&self) -> Vec<MigrationVersion> {
        self.results
            .iter()
            .filter(|r| r.outcome == MigrationOutcome::Applied)
            .map(|r| r.version)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.previews.is_empty() && self.aborted.is_none()
    }
}

// ── Single-migration apply ───────────────────────────────────────────────────

/// Fold `migration` over `tree` and commit it.
///
/// On a clean fold the net changes go to `filesystem` and one entry is
/// appended to `tracker`. On a failed fold neither is touched. Persisting the
/// tracker is left to the caller.
pub fn apply_migration(
    migration: &Migration,
    tree: &FileTree,
    tracker: &mut MigrationTracker,
    filesystem: &dyn Filesystem,
) -> StrataResult<MigrationResult> {
    if tracker.has_applied(migration.version()) {
        debug!(version = %migration.version(), "already applied, skipping");
        return Ok(MigrationResult::already_applied(migration));
    }

    let preview = migration.preview(tree);
    for step in &preview.steps {
        debug!(
            transform = %step.transform,
            changes = step.changes.len(),
            errors = step.errors.len(),
            "transform evaluated"
        );
    }

    if !preview.is_ok() {
        warn!(
            version = %migration.version(),
            errors = preview.errors().count(),
            "migration failed, nothing committed"
        );
        let files = preview
            .changes
            .iter()
            .map(|c| FileResult {
                path: c.path.clone(),
                action: c.kind.label(),
                written: false,
            })
            .collect();
        let errors = preview.errors().cloned().collect();
        return Ok(MigrationResult {
            version: preview.version,
            description: preview.description,
            outcome: MigrationOutcome::Failed,
            changes: preview.changes,
            files,
            errors,
            skipped: preview.skipped,
        });
    }

    let mut files = Vec::with_capacity(preview.changes.len());
    for change in &preview.changes {
        commit(filesystem, change)?;
        files.push(FileResult {
            path: change.path.clone(),
            action: change.kind.label(),
            written: true,
        });
    }

    tracker.record_applied(AppliedMigration::new(
        migration.version(),
        Utc::now(),
        migration.checksum(),
    ))?;

    info!(
        version = %migration.version(),
        files = files.len(),
        "migration applied"
    );

    Ok(MigrationResult {
        version: preview.version,
        description: preview.description,
        outcome: MigrationOutcome::Applied,
        changes: preview.changes,
        files,
        errors: Vec::new(),
        skipped: Vec::new(),
    })
}

fn commit(filesystem: &dyn Filesystem, change: &TransformChange) -> StrataResult<()> {
    match &change.kind {
        ChangeKind::Add { content } | ChangeKind::Modify { content } => {
            filesystem.write_file(&change.path, content)
        }
        ChangeKind::Delete => filesystem.remove_file(&change.path),
    }
}

// ── Runner ───────────────────────────────────────────────────────────────────

/// Orchestrates status, preview, apply, and full runs for one project.
///
/// Holds no cross-process lock. Callers must not run two runners against
/// the same project at once.
pub struct MigrationRunner {
    registry: MigrationRegistry,
    filesystem: Box<dyn Filesystem>,
    tracker_store: Box<dyn TrackerStore>,
}

impl MigrationRunner {
    /// Create a new runner with the given catalog and adapters.
    pub fn new(
        registry: MigrationRegistry,
        filesystem: Box<dyn Filesystem>,
        tracker_store: Box<dyn TrackerStore>,
    ) -> Self {
        Self {
            registry,
            filesystem,
            tracker_store,
        }
    }

    pub fn registry(&self) -> &MigrationRegistry {
        &self.registry
    }

    /// Applied, pending, and drifted migrations.
    #[instrument(skip_all)]
    pub fn status(&self) -> StrataResult<MigrationStatus> {
        let tracker = self.load_tracker()?;
        let status = MigrationStatus::compute(&self.registry, &tracker);

        for drift in &status.drifted {
            warn!(
                version = %drift.version,
                recorded = %drift.recorded,
                current = %drift.current,
                "applied migration changed since it ran"
            );
        }
        debug!(
            applied = status.applied.len(),
            pending = status.pending.len(),
            "status computed"
        );
        Ok(status)
    }

    /// Dry-run one migration against the current project files.
    #[instrument(skip(self), fields(version = %version))]
    pub fn preview(&self, version: MigrationVersion) -> StrataResult<MigrationPreview> {
        let migration = self.lookup(version)?;
        let tree = self.filesystem.read_tree()?;
        Ok(migration.preview(&tree))
    }

    /// Apply one migration.
    ///
    /// Already-applied versions are skipped. Refuses while an earlier
    /// registered version is still pending.
    #[instrument(skip(self), fields(version = %version))]
    pub fn apply(&self, version: MigrationVersion) -> StrataResult<MigrationResult> {
        let migration = self.lookup(version)?;
        let mut tracker = self.load_tracker()?;

        if tracker.has_applied(version) {
            info!("already applied");
            return Ok(MigrationResult::already_applied(migration));
        }

        let pending: Vec<String> = self
            .registry
            .before(version)
            .filter(|m| !tracker.has_applied(m.version()))
            .map(|m| m.version().to_string())
            .collect();
        if !pending.is_empty() {
            return Err(ApplicationError::PrerequisitePending {
                version: version.to_string(),
                pending,
            }
            .into());
        }

        let tree = self.filesystem.read_tree()?;
        let result = apply_migration(migration, &tree, &mut tracker, self.filesystem.as_ref())?;
        if result.outcome == MigrationOutcome::Applied {
            self.tracker_store.save(&tracker)?;
        }
        Ok(result)
    }

    /// Apply every pending migration in ascending order.
    ///
    /// Stops at the first failed migration. A storage error is recorded in
    /// [`RunReport::aborted`] alongside the results that came before it. A
    /// corrupt ledger fails the whole call before anything runs.
    #[instrument(skip(self))]
    pub fn run_all(&self, options: &MigrationOptions) -> StrataResult<RunReport> {
        if let Some(target) = options.target {
            self.lookup(target)?;
        }

        let mut tracker = self.load_tracker()?;
        let pending: Vec<&Migration> = self
            .registry
            .iter()
            .filter(|m| !tracker.has_applied(m.version()))
            .take_while(|m| options.target.is_none_or(|t| m.version() <= t))
            .collect();

        info!(pending = pending.len(), dry_run = options.dry_run, "starting run");

        let mut report = RunReport::default();
        if pending.is_empty() {
            return Ok(report);
        }

        if options.dry_run {
            let mut tree = self.filesystem.read_tree()?;
            for migration in pending {
                let preview = migration.preview(&tree);
                let ok = preview.is_ok();
                tree = preview.projected().clone();
                report.previews.push(preview);
                if !ok {
                    break;
                }
            }
            return Ok(report);
        }

        for migration in pending {
            let step = self
                .filesystem
                .read_tree()
                .and_then(|tree| {
                    apply_migration(migration, &tree, &mut tracker, self.filesystem.as_ref())
                })
                .and_then(|result| {
                    if result.outcome == MigrationOutcome::Applied {
                        self.tracker_store.save(&tracker)?;
                    }
                    Ok(result)
                });

            match step {
                Ok(result) => {
                    let failed = !result.success();
                    report.results.push(result);
                    if failed {
                        break;
                    }
                }
                Err(error) => {
                    warn!(version = %migration.version(), %error, "run aborted");
                    report.aborted = Some(AbortedRun {
                        version: migration.version(),
                        error,
                    });
                    break;
                }
            }
        }

        Ok(report)
    }

    fn lookup(&self, version: MigrationVersion) -> StrataResult<&Migration> {
        self.registry.get(version).ok_or_else(|| {
            ApplicationError::MigrationNotFound {
                version: version.to_string(),
            }
            .into()
        })
    }

    fn load_tracker(&self) -> StrataResult<MigrationTracker> {
        let tracker = self.tracker_store.load()?;
        tracker.verify_against(&self.registry)?;
        Ok(tracker)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::application::ports::output::{MockFilesystem, MockTrackerStore};
    use crate::domain::{EnsureFile, FnTransform, TransformResult};

    fn v(s: &str) -> MigrationVersion {
        s.parse().unwrap()
    }

    fn failing(_: &FileTree) -> TransformResult {
        TransformResult::new().with_error(TransformError::new("failing", "cannot proceed"))
    }

    fn registry() -> MigrationRegistry {
        let ok = Migration::builder(v("0.1.0"))
            .description("add readme")
            .transform(EnsureFile::new("README.md", "# hi"))
            .build()
            .unwrap();
        let partial = Migration::builder(v("0.2.0"))
            .description("half works")
            .transform(EnsureFile::new("docs/a.md", "a"))
            .transform(FnTransform::new("failing", "always fails", failing))
            .build()
            .unwrap();
        MigrationRegistry::new(vec![ok, partial]).unwrap()
    }

    fn empty_store() -> MockTrackerStore {
        let mut store = MockTrackerStore::new();
        store.expect_load().returning(|| Ok(MigrationTracker::new()));
        store
    }

    #[test]
    fn apply_migration_skips_recorded_versions() {
        let registry = registry();
        let migration = registry.get(v("0.1.0")).unwrap();
        let mut tracker = MigrationTracker::new();
        tracker
            .record_applied(AppliedMigration::new(migration.version(), Utc::now(), "x"))
            .unwrap();

        let mut fs = MockFilesystem::new();
        fs.expect_write_file().never();
        fs.expect_remove_file().never();

        let result = apply_migration(migration, &FileTree::new(), &mut tracker, &fs).unwrap();
        assert_eq!(result.outcome, MigrationOutcome::AlreadyApplied);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn failed_fold_writes_nothing() {
        let registry = registry();
        let migration = registry.get(v("0.2.0")).unwrap();
        let mut tracker = MigrationTracker::new();

        let mut fs = MockFilesystem::new();
        fs.expect_write_file().never();

        let result = apply_migration(migration, &FileTree::new(), &mut tracker, &fs).unwrap();
        assert!(!result.success());
        assert_eq!(result.changes, vec![TransformChange::add("docs/a.md", "a")]);
        assert!(result.files.iter().all(|f| !f.written));
        assert!(tracker.is_empty());
    }

    #[test]
    fn storage_failure_aborts_the_run() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_tree().returning(|| Ok(FileTree::new()));
        fs.expect_write_file().returning(|path, _| {
            Err(ApplicationError::Storage {
                path: path.as_path().to_path_buf(),
                reason: "disk full".into(),
            }
            .into())
        });

        let mut store = empty_store();
        store.expect_save().never();

        let runner = MigrationRunner::new(registry(), Box::new(fs), Box::new(store));
        let report = runner.run_all(&MigrationOptions::default()).unwrap();

        assert!(report.results.is_empty());
        let aborted = report.aborted.unwrap();
        assert_eq!(aborted.version, v("0.1.0"));
        assert_eq!(aborted.error.category(), crate::error::ErrorCategory::Storage);
    }

    #[test]
    fn apply_refuses_out_of_order() {
        let runner = MigrationRunner::new(
            registry(),
            Box::new(MockFilesystem::new()),
            Box::new(empty_store()),
        );
        let err = runner.apply(v("0.2.0")).unwrap_err();
        assert!(matches!(
            err,
            StrataError::Application(ApplicationError::PrerequisitePending { .. })
        ));
    }

    #[test]
    fn unknown_version_is_not_found() {
        let runner = MigrationRunner::new(
            registry(),
            Box::new(MockFilesystem::new()),
            Box::new(MockTrackerStore::new()),
        );
        assert!(matches!(
            runner.preview(v("9.9.9")),
            Err(StrataError::Application(ApplicationError::MigrationNotFound { .. }))
        ));
    }

    #[test]
    fn run_saves_tracker_after_each_applied_migration() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&written);

        let mut fs = MockFilesystem::new();
        fs.expect_read_tree().returning(|| Ok(FileTree::new()));
        fs.expect_write_file().returning(move |path, _| {
            sink.lock().unwrap().push(path.to_string());
            Ok(())
        });

        let mut store = empty_store();
        store
            .expect_save()
            .times(1)
            .withf(|t: &MigrationTracker| t.has_applied("0.1.0".parse().unwrap()))
            .returning(|_| Ok(()));

        let runner = MigrationRunner::new(registry(), Box::new(fs), Box::new(store));
        let report = runner.run_all(&MigrationOptions::default()).unwrap();

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.applied_versions(), vec![v("0.1.0")]);
        assert!(!report.results[1].success());
        assert!(!report.is_success());
        assert_eq!(*written.lock().unwrap(), vec!["README.md".to_string()]);
    }

    #[test]
    fn corrupt_ledger_fails_before_running() {
        let mut store = MockTrackerStore::new();
        store.expect_load().returning(|| {
            let mut t = MigrationTracker::new();
            t.record_applied(AppliedMigration::new("0.2.0".parse().unwrap(), Utc::now(), "x"))?;
            Ok(t)
        });

        let runner = MigrationRunner::new(registry(), Box::new(MockFilesystem::new()), Box::new(store));
        let err = runner.run_all(&MigrationOptions::default()).unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::TrackerState);
    }
}
