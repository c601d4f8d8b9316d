//! Infrastructure adapters for Strata.
//!
//! This crate implements the ports defined in `strata-core::application::ports`.
//! It contains all external dependencies and I/O operations, plus the
//! catalog of migrations that ship with Strata.

pub mod builtin_migrations;
pub mod filesystem;
pub mod tracker_store;

// Re-export commonly used adapters
pub use filesystem::{DEFAULT_IGNORED, LocalFilesystem, MemoryFilesystem};
pub use tracker_store::{DEFAULT_TRACKER_FILE, JsonTrackerStore, MemoryTrackerStore};
