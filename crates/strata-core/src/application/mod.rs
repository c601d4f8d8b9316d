//! Application layer for Strata.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (MigrationRunner)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Report**: Plain-text formatting of runner output
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod report;
pub mod services;

pub use services::{
    AbortedRun, FileResult, MigrationOptions, MigrationOutcome, MigrationResult, MigrationRunner,
    RunReport, apply_migration,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, TrackerStore};

pub use report::{format_preview, format_result, format_run_report, format_status};

pub use error::ApplicationError;
