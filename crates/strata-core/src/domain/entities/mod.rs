pub mod change;
pub mod common;
pub mod file_tree;
pub mod migration;
pub mod registry;
pub mod status;
pub mod tracker;
pub mod transform;

pub use crate::domain::DomainError;
pub use change::{ChangeKind, TransformChange, TransformError, TransformResult};
pub use common::RelativePath;
pub use file_tree::FileTree;
pub use migration::{Migration, MigrationBuilder, MigrationPreview, TransformOutcome};
pub use registry::MigrationRegistry;
pub use status::{DriftedMigration, MigrationStatus, PendingMigration};
pub use tracker::{AppliedMigration, MigrationTracker};
pub use transform::{EnsureFile, FnTransform, MoveFile, RemoveFile, ReplaceText, Transform};
