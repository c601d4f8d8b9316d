//! Built-in catalog against real adapters on a temporary project.

use std::fs;

use strata_adapters::{
    JsonTrackerStore, LocalFilesystem, MemoryFilesystem, MemoryTrackerStore, builtin_migrations,
};
use strata_core::{
    application::{MigrationOptions, MigrationOutcome, MigrationRunner, ports::TrackerStore},
    domain::MigrationVersion,
};
use tempfile::TempDir;

fn v020() -> MigrationVersion {
    MigrationVersion::new(0, 2, 0)
}

fn legacy_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join(".claude/commands")).unwrap();
    fs::write(dir.path().join(".claude/commands/review.md"), "# Review\n").unwrap();
    fs::write(dir.path().join(".claude/commands/ship.md"), "# Ship\n").unwrap();
    fs::write(dir.path().join("strata.json"), r#"{"name":"demo"}"#).unwrap();
    dir
}

fn runner_for(dir: &TempDir) -> MigrationRunner {
    MigrationRunner::new(
        builtin_migrations::registry().unwrap(),
        Box::new(LocalFilesystem::new(dir.path())),
        Box::new(JsonTrackerStore::in_project(dir.path())),
    )
}

#[test]
fn migrate_legacy_project_on_disk() {
    let dir = legacy_project();
    let runner = runner_for(&dir);

    let report = runner.run_all(&MigrationOptions::default()).unwrap();
    assert!(report.is_success());
    assert_eq!(report.applied_versions(), vec![v020()]);

    let root = dir.path();
    assert_eq!(
        fs::read_to_string(root.join(".ai/commands/review.md")).unwrap(),
        "# Review\n"
    );
    assert!(!root.join(".claude/commands/ship.md").exists());

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join("strata.json")).unwrap()).unwrap();
    assert_eq!(manifest["layer"], "app");

    let ledger = JsonTrackerStore::in_project(root).load().unwrap();
    assert_eq!(ledger.len(), 1);
    assert!(ledger.has_applied(v020()));
}

#[test]
fn second_run_is_a_noop() {
    let dir = legacy_project();
    let runner = runner_for(&dir);
    runner.run_all(&MigrationOptions::default()).unwrap();

    let again = runner.run_all(&MigrationOptions::default()).unwrap();
    assert!(again.is_empty());

    let single = runner.apply(v020()).unwrap();
    assert_eq!(single.outcome, MigrationOutcome::AlreadyApplied);
}

#[test]
fn dry_run_leaves_disk_untouched() {
    let dir = legacy_project();
    let runner = runner_for(&dir);

    let report = runner
        .run_all(&MigrationOptions {
            dry_run: true,
            target: None,
        })
        .unwrap();

    assert_eq!(report.previews.len(), 1);
    assert!(dir.path().join(".claude/commands/review.md").exists());
    assert!(!dir.path().join(".ai").exists());
    assert!(!dir.path().join(".strata").exists());
}

#[test]
fn collision_fails_without_writing() {
    let dir = legacy_project();
    fs::create_dir_all(dir.path().join(".ai/commands")).unwrap();
    fs::write(dir.path().join(".ai/commands/review.md"), "different").unwrap();
    let runner = runner_for(&dir);

    let result = runner.apply(v020()).unwrap();
    assert!(!result.success());
    assert!(dir.path().join(".claude/commands/review.md").exists());
    assert!(!dir.path().join(".strata/migrations.json").exists());
}

#[test]
fn non_utf8_manifest_is_never_overwritten() {
    let dir = TempDir::new().unwrap();
    let latin1: &[u8] = b"{\"name\":\"caf\xe9\"}";
    fs::write(dir.path().join("strata.json"), latin1).unwrap();
    let runner = runner_for(&dir);

    let report = runner.run_all(&MigrationOptions::default()).unwrap();
    assert!(!report.is_success());
    assert!(report.applied_versions().is_empty());

    assert_eq!(fs::read(dir.path().join("strata.json")).unwrap(), latin1);
    assert!(!dir.path().join(".strata/migrations.json").exists());
}

#[test]
fn non_utf8_relocation_target_blocks_the_move() {
    let dir = legacy_project();
    fs::create_dir_all(dir.path().join(".ai/commands")).unwrap();
    fs::write(dir.path().join(".ai/commands/review.md"), [0xff, 0xfe]).unwrap();
    let runner = runner_for(&dir);

    let result = runner.apply(v020()).unwrap();
    assert!(!result.success());
    assert_eq!(
        fs::read(dir.path().join(".ai/commands/review.md")).unwrap(),
        [0xff, 0xfe]
    );
    assert!(dir.path().join(".claude/commands/review.md").exists());
}

#[test]
fn ledger_outside_ignored_dirs_stays_out_of_migrations() {
    let dir = legacy_project();
    // relocation would carry an unreserved ledger along with the commands
    let ledger = dir.path().join(".claude/commands/ledger.md");
    let runner = MigrationRunner::new(
        builtin_migrations::registry().unwrap(),
        Box::new(
            LocalFilesystem::new(dir.path())
                .with_ignored(Vec::<String>::new())
                .reserving(".claude/commands/ledger.md".into()),
        ),
        Box::new(JsonTrackerStore::new(ledger.clone())),
    );

    let report = runner.run_all(&MigrationOptions::default()).unwrap();
    assert!(report.is_success());
    assert!(!dir.path().join(".ai/commands/ledger.md").exists());
    assert!(JsonTrackerStore::new(ledger).load().unwrap().has_applied(v020()));
}

#[test]
fn storage_failure_mid_commit_leaves_ledger_empty() {
    let fs_adapter = MemoryFilesystem::with_files([(".claude/commands/review.md", "r")]);
    fs_adapter.fail_on("strata.json");
    let tracker = MemoryTrackerStore::new();

    let runner = MigrationRunner::new(
        builtin_migrations::registry().unwrap(),
        Box::new(fs_adapter.clone()),
        Box::new(tracker.clone()),
    );
    let report = runner.run_all(&MigrationOptions::default()).unwrap();

    let aborted = report.aborted.expect("storage failure aborts the run");
    assert_eq!(aborted.version, v020());
    assert!(tracker.snapshot().is_empty());
}
