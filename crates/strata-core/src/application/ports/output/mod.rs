//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `strata-adapters` crate provides implementations.

use crate::domain::{FileTree, MigrationTracker, RelativePath};
use crate::error::StrataResult;

/// Port for reading and writing the project's files.
///
/// Implemented by:
/// - `strata_adapters::filesystem::LocalFilesystem` (production)
/// - `strata_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - All paths are relative to the project root
/// - Calls complete before returning; the runner never overlaps them
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Snapshot every tracked file under the project root.
    fn read_tree(&self) -> StrataResult<FileTree>;

    /// Create or overwrite a file, creating parent directories as needed.
    fn write_file(&self, path: &RelativePath, content: &str) -> StrataResult<()>;

    /// Delete a file.
    fn remove_file(&self, path: &RelativePath) -> StrataResult<()>;
}

/// Port for the persisted migration ledger.
///
/// Implemented by:
/// - `strata_adapters::tracker_store::JsonTrackerStore` (production)
/// - `strata_adapters::tracker_store::MemoryTrackerStore` (testing)
///
/// The ledger is read and written wholesale. A project with no ledger yet
/// loads as an empty tracker.
#[cfg_attr(test, mockall::automock)]
pub trait TrackerStore: Send + Sync {
    fn load(&self) -> StrataResult<MigrationTracker>;

    fn save(&self, tracker: &MigrationTracker) -> StrataResult<()>;
}
