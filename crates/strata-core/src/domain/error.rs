// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for reporting the same failure in several places)
/// - Categorizable (for CLI display and exit codes)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("invalid migration version '{value}': {reason}")]
    InvalidVersion { value: String, reason: String },

    #[error("unknown layer '{0}'")]
    InvalidLayer(String),

    #[error("migration {version} declares no transforms")]
    EmptyMigration { version: String },

    #[error("migration {version} is registered more than once")]
    DuplicateVersion { version: String },

    #[error("migration {version} is registered after {previous}; versions must ascend")]
    UnorderedRegistry { previous: String, version: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("path escapes the project root: {path}")]
    PathEscapesRoot { path: String },

    #[error("path names no file: '{path}'")]
    EmptyPath { path: String },

    // ========================================================================
    // Change Conflicts (raised while advancing a working snapshot)
    // ========================================================================
    #[error("cannot add {path}: file already exists")]
    FileAlreadyExists { path: String },

    #[error("cannot {action} {path}: file does not exist")]
    FileMissing { action: &'static str, path: String },

    #[error("cannot {action} {path}: file is binary or reserved by strata")]
    ProtectedFile { action: &'static str, path: String },

    // ========================================================================
    // Tracker State Violations
    // ========================================================================
    #[error("tracker records version {version} more than once")]
    DuplicateTrackerEntry { version: String },

    #[error("tracker records version {version}, which is not a registered migration")]
    UnknownTrackerVersion { version: String },

    #[error("tracker records {version} but earlier migration {missing} was never applied")]
    TrackerGap { missing: String, version: String },

    #[error("tracker records {version} after {previous}; entries must ascend")]
    TrackerOutOfOrder { previous: String, version: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidVersion { value, .. } => vec![
                format!("'{}' is not a MAJOR.MINOR.PATCH version", value),
                "Example: 0.2.0".into(),
            ],
            Self::InvalidLayer(layer) => vec![
                format!("'{}' is not a layer", layer),
                "Valid layers: sdk, framework, react, app".into(),
            ],
            Self::EmptyMigration { .. }
            | Self::DuplicateVersion { .. }
            | Self::UnorderedRegistry { .. } => vec![
                "The migration catalog is malformed".into(),
                "This is a bug in the built-in migrations, please report it".into(),
            ],
            Self::DuplicateTrackerEntry { .. }
            | Self::UnknownTrackerVersion { .. }
            | Self::TrackerGap { .. }
            | Self::TrackerOutOfOrder { .. } => vec![
                "The migration ledger does not match the known migrations".into(),
                "Inspect the tracker file and repair it by hand".into(),
                "Strata never rewrites the ledger automatically".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateTrackerEntry { .. }
            | Self::UnknownTrackerVersion { .. }
            | Self::TrackerGap { .. }
            | Self::TrackerOutOfOrder { .. } => ErrorCategory::TrackerState,
            Self::FileAlreadyExists { .. }
            | Self::FileMissing { .. }
            | Self::ProtectedFile { .. } => ErrorCategory::Conflict,
            _ => ErrorCategory::Validation,
        }
    }

    /// Whether this error describes a corrupted migration ledger.
    pub fn is_tracker_state(&self) -> bool {
        self.category() == ErrorCategory::TrackerState
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    TrackerState,
}
