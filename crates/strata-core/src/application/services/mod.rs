//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "show status" or "run every pending migration".

pub mod migration_runner;

pub use migration_runner::{
    AbortedRun, FileResult, MigrationOptions, MigrationOutcome, MigrationResult, MigrationRunner,
    RunReport, apply_migration,
};
