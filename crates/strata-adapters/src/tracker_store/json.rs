//! JSON ledger stored inside the project directory.
//!
//! ```json
//! {"applied":[{"version":"0.2.0","appliedAt":"2026-01-01T00:00:00Z","checksum":"…"}]}
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use strata_core::{
    application::{ApplicationError, ports::TrackerStore},
    domain::{AppliedMigration, MigrationTracker},
    error::{StrataError, StrataResult},
};

/// Ledger location relative to the project root.
pub const DEFAULT_TRACKER_FILE: &str = ".strata/migrations.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct TrackerFile {
    #[serde(default)]
    applied: Vec<AppliedMigration>,
}

/// Ledger persisted as one JSON document.
///
/// Saves replace the file atomically: a crash mid-save leaves the previous
/// ledger intact.
#[derive(Debug, Clone)]
pub struct JsonTrackerStore {
    path: PathBuf,
}

impl JsonTrackerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`DEFAULT_TRACKER_FILE`] under `project_root`.
    pub fn in_project(project_root: impl AsRef<Path>) -> Self {
        Self::new(project_root.as_ref().join(DEFAULT_TRACKER_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn store_error(&self, operation: &str, e: impl std::fmt::Display) -> StrataError {
        ApplicationError::TrackerStore {
            path: self.path.clone(),
            reason: format!("Failed to {}: {}", operation, e),
        }
        .into()
    }
}

impl TrackerStore for JsonTrackerStore {
    fn load(&self) -> StrataResult<MigrationTracker> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no ledger yet");
                return Ok(MigrationTracker::new());
            }
            Err(e) => return Err(self.store_error("read ledger", e)),
        };

        let file: TrackerFile =
            serde_json::from_str(&raw).map_err(|e| ApplicationError::TrackerUnreadable {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        debug!(entries = file.applied.len(), "ledger loaded");
        Ok(MigrationTracker::from_entries(file.applied)?)
    }

    fn save(&self, tracker: &MigrationTracker) -> StrataResult<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| self.store_error("create ledger directory", e))?;

        let file = TrackerFile {
            applied: tracker.list_applied().to_vec(),
        };
        let mut json =
            serde_json::to_string_pretty(&file).map_err(|e| self.store_error("encode ledger", e))?;
        json.push('\n');

        let mut temp = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| self.store_error("create temporary ledger", e))?;
        temp.write_all(json.as_bytes())
            .map_err(|e| self.store_error("write ledger", e))?;
        temp.persist(&self.path)
            .map_err(|e| self.store_error("replace ledger", e.error))?;

        debug!(path = %self.path.display(), entries = file.applied.len(), "ledger saved");
        Ok(())
    }
}
