//! Unified error handling for Strata Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Strata Core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StrataError {
    /// Errors from the domain layer (validation and ledger violations).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (storage and orchestration).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl StrataError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in Strata".into()],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation
                | crate::domain::ErrorCategory::Conflict => ErrorCategory::Validation,
                crate::domain::ErrorCategory::TrackerState => ErrorCategory::TrackerState,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Check if this error is retryable.
    ///
    /// Storage failures may be transient; ledger and validation errors are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::StoreLockError)
                | Self::Application(ApplicationError::Storage { .. })
        )
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    TrackerState,
    NotFound,
    Storage,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type StrataResult<T> = Result<T, StrataError>;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn categories_follow_the_wrapped_error() {
        let ledger: StrataError = DomainError::DuplicateTrackerEntry {
            version: "0.2.0".into(),
        }
        .into();
        assert_eq!(ledger.category(), ErrorCategory::TrackerState);

        let storage: StrataError = ApplicationError::Storage {
            path: PathBuf::from("a.md"),
            reason: "denied".into(),
        }
        .into();
        assert_eq!(storage.category(), ErrorCategory::Storage);
        assert!(storage.is_retryable());
        assert!(!ledger.is_retryable());
    }

    #[test]
    fn prerequisite_message_lists_pending_versions() {
        let err = ApplicationError::PrerequisitePending {
            version: "0.3.0".into(),
            pending: vec!["0.1.0".into(), "0.2.0".into()],
        };
        assert!(err.to_string().contains("0.1.0, 0.2.0"));
        assert_eq!(err.category(), ErrorCategory::Validation);
    }
}
