//! Change records produced by transforms.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::entities::common::RelativePath;

/// What happens to a file.
///
/// Closed on purpose: storage adapters match on it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChangeKind {
    Add { content: String },
    Modify { content: String },
    Delete,
}

impl ChangeKind {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Modify { .. } => "modify",
            Self::Delete => "delete",
        }
    }

    /// Resulting content, `None` for deletions.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Add { content } | Self::Modify { content } => Some(content),
            Self::Delete => None,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One file-level change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformChange {
    pub path: RelativePath,
    #[serde(flatten)]
    pub kind: ChangeKind,
}

impl TransformChange {
    pub fn add(path: impl Into<RelativePath>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Add {
                content: content.into(),
            },
        }
    }

    pub fn modify(path: impl Into<RelativePath>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Modify {
                content: content.into(),
            },
        }
    }

    pub fn delete(path: impl Into<RelativePath>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Delete,
        }
    }
}

impl fmt::Display for TransformChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<6} {}", self.kind.label(), self.path)
    }
}

/// A failure inside one transform's own logic.
///
/// Collected into [`TransformResult::errors`]; never raised across the fold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformError {
    pub transform: String,
    pub path: Option<RelativePath>,
    pub message: String,
}

impl TransformError {
    pub fn new(transform: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            transform: transform.into(),
            path: None,
            message: message.into(),
        }
    }

    pub fn at(mut self, path: impl Into<RelativePath>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "[{}] {}: {}", self.transform, path, self.message),
            None => write!(f, "[{}] {}", self.transform, self.message),
        }
    }
}

/// Output of running one transform against a snapshot.
///
/// Errors do not imply the changes are empty: a transform may report a
/// problem with one file while still producing changes for others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformResult {
    pub changes: Vec<TransformChange>,
    pub errors: Vec<TransformError>,
}

impl TransformResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_change(mut self, change: TransformChange) -> Self {
        self.changes.push(change);
        self
    }

    pub fn with_error(mut self, error: TransformError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn push_change(&mut self, change: TransformChange) {
        self.changes.push(change);
    }

    pub fn push_error(&mut self, error: TransformError) {
        self.errors.push(error);
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
