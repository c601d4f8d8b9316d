// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Strata.
//!
//! Pure logic only. Reading and writing project files or the migration
//! ledger happens through ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: transforms see a [`FileTree`] snapshot, never the disk
//! - **Deterministic**: the same snapshot always yields the same preview
//! - **Append-only ledger**: [`MigrationTracker`] entries are never rewritten
//!
pub mod entities;
pub mod error;
pub mod layers;
pub mod value_objects;

pub use entities::{
    AppliedMigration, ChangeKind, DriftedMigration, EnsureFile, FileTree, FnTransform, Migration,
    MigrationBuilder, MigrationPreview, MigrationRegistry, MigrationStatus, MigrationTracker,
    MoveFile, PendingMigration, RelativePath, RemoveFile, ReplaceText, Transform, TransformChange,
    TransformError, TransformOutcome, TransformResult,
};

pub use error::{DomainError, ErrorCategory};

pub use layers::{
    CommandSelection, LayerPlan, ScaffoldSources, TargetPolicy, UNMAPPED_TARGET_POLICY,
    is_target_applicable, select_command_variant,
};

pub use value_objects::{Layer, MigrationVersion};

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    // ========================================================================
    // Layer filtering over a scaffold tree
    // ========================================================================

    #[test]
    fn plan_from_scaffold_tree() {
        let tree = FileTree::from_iter([
            ("targets/CLAUDE.md", "c"),
            ("targets/AGENTS.md", "a"),
            ("targets/README.md", "r"),
            ("commands/review.md", "generic"),
            ("commands/review.sdk.md", "sdk"),
            ("commands/review.react.md", "react"),
            ("GUIDELINES.md", "g"),
        ]);
        let sources = ScaffoldSources::from_tree(&tree);

        let sdk = LayerPlan::build(Layer::Sdk, &sources);
        let review = sdk.commands.iter().find(|c| c.base == "review").unwrap();
        assert_eq!(review.variant, "review.sdk.md");

        let app = LayerPlan::build(Layer::App, &sources);
        let review = app.commands.iter().find(|c| c.base == "review").unwrap();
        assert_eq!(review.variant, "review.react.md");
    }

    // ========================================================================
    // Fold + ledger
    // ========================================================================

    #[test]
    fn applying_a_preview_then_recording_makes_it_idempotent() {
        let migration = Migration::builder("0.2.0".parse().unwrap())
            .description("move docs")
            .transform(MoveFile::new("old/a.md", "new/a.md"))
            .transform(EnsureFile::new("new/index.md", "# index"))
            .build()
            .unwrap();
        let registry = MigrationRegistry::new(vec![migration.clone()]).unwrap();

        let tree = FileTree::new().with_file("old/a.md", "a");
        let preview = migration.preview(&tree);
        assert!(preview.is_ok());

        // re-running against the projected tree is a no-op
        let again = migration.preview(preview.projected());
        assert!(again.changes.is_empty());

        let mut tracker = MigrationTracker::new();
        tracker
            .record_applied(AppliedMigration::new(
                migration.version(),
                Utc::now(),
                migration.checksum(),
            ))
            .unwrap();

        let status = MigrationStatus::compute(&registry, &tracker);
        assert!(status.is_up_to_date());
        assert!(status.drifted.is_empty());
        assert!(tracker.verify_against(&registry).is_ok());
    }

    #[test]
    fn tracker_errors_are_categorized() {
        let err = DomainError::TrackerGap {
            missing: "0.1.0".into(),
            version: "0.2.0".into(),
        };
        assert!(err.is_tracker_state());
        assert!(!err.suggestions().is_empty());
        assert_eq!(
            DomainError::InvalidLayer("x".into()).category(),
            ErrorCategory::Validation
        );
    }
}
