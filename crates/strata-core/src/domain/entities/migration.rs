//! The `Migration` aggregate and the transform fold.
//!
//! A migration is an immutable, versioned, non-empty list of transforms.
//! Running it means folding the transforms over a snapshot:
//!
//! ```text
//! S0 ──T1──▶ S1 ──T2──▶ S2 ── … ──▶ Sn
//!        │          │
//!        R1         R2        (changes + errors per step)
//! ```
//!
//! Each step sees the effects of the previous ones. The first step with
//! errors (its own, or a change that conflicts with the working snapshot)
//! stops the fold; later transforms are skipped, not run. Changes gathered
//! before the failure stay visible in the [`MigrationPreview`], but nothing
//! is committed anywhere: committing is the runner's job and only happens
//! for a clean fold.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::{
    entities::{
        change::{TransformChange, TransformError},
        file_tree::FileTree,
        transform::Transform,
    },
    error::DomainError,
    value_objects::MigrationVersion,
};

// ── Aggregate root ────────────────────────────────────────────────────────────

/// A versioned batch of transforms, applied at most once per project.
#[derive(Debug, Clone)]
pub struct Migration {
    version: MigrationVersion,
    description: String,
    transforms: Vec<Arc<dyn Transform>>,
}

impl Migration {
    /// Start building a migration for `version`.
    pub fn builder(version: MigrationVersion) -> MigrationBuilder {
        MigrationBuilder {
            version,
            description: None,
            transforms: Vec::new(),
        }
    }

    pub const fn version(&self) -> MigrationVersion {
        self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn transforms(&self) -> &[Arc<dyn Transform>] {
        &self.transforms
    }

    /// Re-check construction invariants.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.transforms.is_empty() {
            return Err(DomainError::EmptyMigration {
                version: self.version.to_string(),
            });
        }
        Ok(())
    }

    /// SHA-256 over the migration's identity and transform list, hex encoded.
    ///
    /// Recorded in the tracker so a later edit of an already-applied migration
    /// shows up as drift.
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.version.to_string().as_bytes());
        hasher.update(b"\n");
        hasher.update(self.description.as_bytes());
        for transform in &self.transforms {
            hasher.update(b"\n");
            hasher.update(transform.name().as_bytes());
            hasher.update(b"\t");
            hasher.update(transform.description().as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    /// Run the fold against `snapshot` without writing anything.
    ///
    /// Deterministic: the same migration and snapshot always produce the same
    /// preview. `snapshot` is never modified.
    pub fn preview(&self, snapshot: &FileTree) -> MigrationPreview {
        let mut working = snapshot.clone();
        let mut steps = Vec::with_capacity(self.transforms.len());
        let mut skipped = Vec::new();
        let mut failed = false;

        for transform in &self.transforms {
            if failed {
                skipped.push(transform.name().to_string());
                continue;
            }

            let result = transform.apply(&working);
            let mut step = TransformOutcome {
                transform: transform.name().to_string(),
                changes: result.changes,
                errors: result.errors,
            };

            if step.errors.is_empty() {
                if let Err(conflict) = working.apply_all(&step.changes) {
                    step.errors
                        .push(TransformError::new(transform.name(), conflict.to_string()));
                }
            }

            failed = !step.errors.is_empty();
            steps.push(step);
        }

        MigrationPreview {
            version: self.version,
            description: self.description.clone(),
            changes: FileTree::diff(snapshot, &working),
            steps,
            skipped,
            projected: working,
        }
    }
}

impl fmt::Display for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.version, self.description)
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Builder for [`Migration`]. `build` rejects an empty transform list.
pub struct MigrationBuilder {
    version: MigrationVersion,
    description: Option<String>,
    transforms: Vec<Arc<dyn Transform>>,
}

impl MigrationBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a transform; transforms run in the order they are added.
    pub fn transform(mut self, transform: impl Transform + 'static) -> Self {
        self.transforms.push(Arc::new(transform));
        self
    }

    pub fn build(self) -> Result<Migration, DomainError> {
        let description = self
            .description
            .filter(|d| !d.trim().is_empty())
            .ok_or(DomainError::MissingRequiredField {
                field: "description",
            })?;

        let migration = Migration {
            version: self.version,
            description,
            transforms: self.transforms,
        };
        migration.validate()?;
        Ok(migration)
    }
}

// ── Preview ───────────────────────────────────────────────────────────────────

/// What one transform produced during the fold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformOutcome {
    pub transform: String,
    pub changes: Vec<TransformChange>,
    pub errors: Vec<TransformError>,
}

impl TransformOutcome {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Dry-run projection of a migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationPreview {
    pub version: MigrationVersion,
    pub description: String,
    /// Per-transform outcomes, in execution order.
    pub steps: Vec<TransformOutcome>,
    /// Names of transforms not run because an earlier one failed.
    pub skipped: Vec<String>,
    /// Net effect of every step that succeeded.
    pub changes: Vec<TransformChange>,
    #[serde(skip)]
    projected: FileTree,
}

impl MigrationPreview {
    /// `true` when every transform ran without errors.
    pub fn is_ok(&self) -> bool {
        self.skipped.is_empty() && self.steps.iter().all(TransformOutcome::is_ok)
    }

    pub fn errors(&self) -> impl Iterator<Item = &TransformError> {
        self.steps.iter().flat_map(|s| s.errors.iter())
    }

    /// Changes produced by the successful steps, in the order they ran.
    pub fn step_changes(&self) -> impl Iterator<Item = &TransformChange> {
        self.steps
            .iter()
            .filter(|s| s.is_ok())
            .flat_map(|s| s.changes.iter())
    }

    /// The snapshot after every successful step.
    pub fn projected(&self) -> &FileTree {
        &self.projected
    }

    pub fn into_projected(self) -> FileTree {
        self.projected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        change::TransformResult,
        transform::{EnsureFile, FnTransform},
    };

    fn v(s: &str) -> MigrationVersion {
        s.parse().unwrap()
    }

    fn broken(_: &FileTree) -> TransformResult {
        TransformResult::new().with_error(TransformError::new("broken", "boom"))
    }

    fn reads_previous(tree: &FileTree) -> TransformResult {
        match tree.read("first.md") {
            Some(_) => TransformResult::new().with_change(TransformChange::add("second.md", "2")),
            None => TransformResult::new().with_error(TransformError::new("second", "first.md missing")),
        }
    }

    #[test]
    fn builder_rejects_empty_transform_list() {
        let result = Migration::builder(v("0.2.0")).description("empty").build();
        assert_eq!(
            result.unwrap_err(),
            DomainError::EmptyMigration {
                version: "0.2.0".into()
            }
        );
    }

    #[test]
    fn builder_requires_description() {
        let result = Migration::builder(v("0.2.0"))
            .transform(EnsureFile::new("a.md", ""))
            .build();
        assert!(matches!(
            result,
            Err(DomainError::MissingRequiredField { field: "description" })
        ));
    }

    #[test]
    fn later_transforms_see_earlier_changes() {
        let m = Migration::builder(v("0.2.0"))
            .description("chain")
            .transform(EnsureFile::new("first.md", "1"))
            .transform(FnTransform::new("second", "needs first", reads_previous))
            .build()
            .unwrap();

        let preview = m.preview(&FileTree::new());
        assert!(preview.is_ok());
        assert_eq!(preview.changes.len(), 2);
        assert_eq!(preview.projected().read("second.md"), Some("2"));
    }

    #[test]
    fn failure_skips_remaining_transforms() {
        let m = Migration::builder(v("0.2.0"))
            .description("fails midway")
            .transform(EnsureFile::new("kept.md", "k"))
            .transform(FnTransform::new("broken", "always fails", broken))
            .transform(EnsureFile::new("never.md", "n"))
            .build()
            .unwrap();

        let preview = m.preview(&FileTree::new());
        assert!(!preview.is_ok());
        assert_eq!(preview.steps.len(), 2);
        assert_eq!(preview.skipped, vec!["ensure-file:never.md"]);
        assert_eq!(preview.changes, vec![TransformChange::add("kept.md", "k")]);
        assert_eq!(preview.errors().count(), 1);
    }

    #[test]
    fn conflicting_change_fails_its_transform() {
        fn clobber(_: &FileTree) -> TransformResult {
            TransformResult::new().with_change(TransformChange::add("a.md", "dup"))
        }
        let m = Migration::builder(v("0.2.0"))
            .description("conflict")
            .transform(FnTransform::new("clobber", "adds over existing", clobber))
            .build()
            .unwrap();

        let preview = m.preview(&FileTree::new().with_file("a.md", "orig"));
        assert!(!preview.is_ok());
        assert!(preview.changes.is_empty());
        assert_eq!(preview.errors().next().unwrap().transform, "clobber");
    }

    #[test]
    fn preview_is_deterministic_and_pure() {
        let m = Migration::builder(v("0.2.0"))
            .description("pure")
            .transform(EnsureFile::new("a.md", "a"))
            .build()
            .unwrap();
        let tree = FileTree::new().with_file("b.md", "b");
        let snapshot = tree.clone();

        assert_eq!(m.preview(&tree), m.preview(&tree));
        assert_eq!(tree, snapshot);
    }

    #[test]
    fn checksum_tracks_content() {
        let build = |desc: &str| {
            Migration::builder(v("0.2.0"))
                .description(desc)
                .transform(EnsureFile::new("a.md", "a"))
                .build()
                .unwrap()
        };
        assert_eq!(build("x").checksum(), build("x").checksum());
        assert_ne!(build("x").checksum(), build("y").checksum());
        assert_eq!(build("x").checksum().len(), 64);
    }
}
