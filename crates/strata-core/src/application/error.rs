//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Reading or writing a project file failed.
    #[error("Storage error at {path}: {reason}")]
    Storage { path: PathBuf, reason: String },

    /// The project root does not exist or is not a directory.
    #[error("Project not found at {path}")]
    ProjectNotFound { path: PathBuf },

    /// Persisting or loading the ledger failed at the I/O level.
    #[error("Tracker store error at {path}: {reason}")]
    TrackerStore { path: PathBuf, reason: String },

    /// The ledger exists but cannot be decoded.
    #[error("Tracker at {path} is unreadable: {reason}")]
    TrackerUnreadable { path: PathBuf, reason: String },

    /// Store access failed (lock poisoned).
    #[error("In-memory store lock poisoned")]
    StoreLockError,

    /// No registered migration has this version.
    #[error("No migration registered for version {version}")]
    MigrationNotFound { version: String },

    /// An earlier migration must be applied first.
    #[error("Cannot apply {version}: earlier migrations are still pending ({})", pending.join(", "))]
    PrerequisitePending { version: String, pending: Vec<String> },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Storage { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have read and write permissions".into(),
                "Files written before the failure are not rolled back".into(),
            ],
            Self::ProjectNotFound { path } => vec![
                format!("Directory does not exist: {}", path.display()),
                "Pass the project root with -C/--project".into(),
            ],
            Self::TrackerStore { path, .. } => vec![
                format!("Failed to access the ledger: {}", path.display()),
                "Check permissions on the tracker directory".into(),
            ],
            Self::TrackerUnreadable { path, .. } => vec![
                format!("Inspect {} and repair it by hand", path.display()),
                "Strata never rewrites the ledger automatically".into(),
            ],
            Self::StoreLockError => vec![
                "An in-memory store is poisoned".into(),
                "Try again in a moment".into(),
            ],
            Self::MigrationNotFound { .. } => vec![
                "Try: strata status to list known migrations".into(),
            ],
            Self::PrerequisitePending { pending, .. } => vec![
                format!("Apply {} first", pending.join(", ")),
                "Or run: strata migrate --to <VERSION>".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Storage { .. } | Self::TrackerStore { .. } => ErrorCategory::Storage,
            Self::ProjectNotFound { .. } | Self::MigrationNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::TrackerUnreadable { .. } => ErrorCategory::TrackerState,
            Self::StoreLockError => ErrorCategory::Internal,
            Self::PrerequisitePending { .. } => ErrorCategory::Validation,
        }
    }
}
