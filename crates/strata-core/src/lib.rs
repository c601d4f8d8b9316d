//! Strata Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Strata
//! scaffold-migration engine, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           strata-cli (CLI)              │
//! │     (status, preview, apply, migrate)   │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │            (MigrationRunner)            │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │       (Filesystem, TrackerStore)        │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    strata-adapters (Infrastructure)     │
//! │ (LocalFilesystem, JsonTrackerStore, …)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Layer filter, Migration, Tracker, …)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use strata_core::prelude::*;
//!
//! # fn demo(
//! #     registry: MigrationRegistry,
//! #     filesystem: Box<dyn Filesystem>,
//! #     tracker_store: Box<dyn TrackerStore>,
//! # ) -> StrataResult<()> {
//! let runner = MigrationRunner::new(registry, filesystem, tracker_store);
//! let report = runner.run_all(&MigrationOptions::default())?;
//! println!("{}", format_run_report(&report));
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        MigrationOptions, MigrationOutcome, MigrationResult, MigrationRunner, RunReport,
        format_preview, format_result, format_run_report, format_status,
        ports::{Filesystem, TrackerStore},
    };
    pub use crate::domain::{
        AppliedMigration, FileTree, Layer, LayerPlan, Migration, MigrationPreview,
        MigrationRegistry, MigrationStatus, MigrationTracker, MigrationVersion, RelativePath,
        ScaffoldSources, Transform, TransformChange, TransformError, TransformResult,
        is_target_applicable, select_command_variant,
    };
    pub use crate::error::{StrataError, StrataResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
