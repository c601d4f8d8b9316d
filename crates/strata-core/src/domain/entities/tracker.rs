//! The per-project migration ledger.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::registry::MigrationRegistry, error::DomainError, value_objects::MigrationVersion,
};

/// One ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedMigration {
    pub version: MigrationVersion,
    pub applied_at: DateTime<Utc>,
    pub checksum: String,
}

impl AppliedMigration {
    pub fn new(version: MigrationVersion, applied_at: DateTime<Utc>, checksum: impl Into<String>) -> Self {
        Self {
            version,
            applied_at,
            checksum: checksum.into(),
        }
    }
}

/// Append-only record of applied migrations.
///
/// Entries are never removed or rewritten. A version appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationTracker {
    entries: Vec<AppliedMigration>,
    index: BTreeSet<MigrationVersion>,
}

impl MigrationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a tracker from persisted entries, keeping their order.
    pub fn from_entries(entries: Vec<AppliedMigration>) -> Result<Self, DomainError> {
        let mut tracker = Self::new();
        for entry in entries {
            tracker.record_applied(entry)?;
        }
        Ok(tracker)
    }

    pub fn has_applied(&self, version: MigrationVersion) -> bool {
        self.index.contains(&version)
    }

    /// Append an entry. Recording the same version twice is an error.
    pub fn record_applied(&mut self, entry: AppliedMigration) -> Result<(), DomainError> {
        if !self.index.insert(entry.version) {
            return Err(DomainError::DuplicateTrackerEntry {
                version: entry.version.to_string(),
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Entries in the order they were recorded.
    pub fn list_applied(&self) -> &[AppliedMigration] {
        &self.entries
    }

    pub fn get(&self, version: MigrationVersion) -> Option<&AppliedMigration> {
        self.entries.iter().find(|e| e.version == version)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check the ledger against the catalog.
    ///
    /// Every recorded version must be registered, entries must ascend in
    /// recording order, and the applied set must be a prefix of the
    /// registry: no registered migration may be skipped.
    pub fn verify_against(&self, registry: &MigrationRegistry) -> Result<(), DomainError> {
        let mut previous: Option<MigrationVersion> = None;
        for entry in &self.entries {
            if !registry.contains(entry.version) {
                return Err(DomainError::UnknownTrackerVersion {
                    version: entry.version.to_string(),
                });
            }
            if let Some(prev) = previous.filter(|p| *p >= entry.version) {
                return Err(DomainError::TrackerOutOfOrder {
                    previous: prev.to_string(),
                    version: entry.version.to_string(),
                });
            }
            previous = Some(entry.version);
        }

        if let Some(newest) = previous {
            if let Some(missing) = registry
                .before(newest)
                .find(|m| !self.has_applied(m.version()))
            {
                return Err(DomainError::TrackerGap {
                    missing: missing.version().to_string(),
                    version: newest.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{migration::Migration, transform::EnsureFile};

    fn v(s: &str) -> MigrationVersion {
        s.parse().unwrap()
    }

    fn entry(version: &str) -> AppliedMigration {
        AppliedMigration::new(v(version), Utc::now(), "abc")
    }

    fn registry(versions: &[&str]) -> MigrationRegistry {
        let migrations = versions
            .iter()
            .map(|ver| {
                Migration::builder(v(ver))
                    .description("m")
                    .transform(EnsureFile::new("a.md", ""))
                    .build()
                    .unwrap()
            })
            .collect();
        MigrationRegistry::new(migrations).unwrap()
    }

    #[test]
    fn records_each_version_once() {
        let mut tracker = MigrationTracker::new();
        tracker.record_applied(entry("0.1.0")).unwrap();
        assert!(tracker.has_applied(v("0.1.0")));
        assert!(matches!(
            tracker.record_applied(entry("0.1.0")),
            Err(DomainError::DuplicateTrackerEntry { .. })
        ));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn from_entries_rejects_duplicates() {
        let result = MigrationTracker::from_entries(vec![entry("0.1.0"), entry("0.1.0")]);
        assert!(result.is_err());
    }

    #[test]
    fn verify_accepts_prefix() {
        let reg = registry(&["0.1.0", "0.2.0", "0.3.0"]);
        let tracker = MigrationTracker::from_entries(vec![entry("0.1.0"), entry("0.2.0")]).unwrap();
        assert!(tracker.verify_against(&reg).is_ok());
        assert!(MigrationTracker::new().verify_against(&reg).is_ok());
    }

    #[test]
    fn verify_reports_unknown_gap_and_disorder() {
        let reg = registry(&["0.1.0", "0.2.0", "0.3.0"]);

        let unknown = MigrationTracker::from_entries(vec![entry("0.9.0")]).unwrap();
        assert!(matches!(
            unknown.verify_against(&reg),
            Err(DomainError::UnknownTrackerVersion { .. })
        ));

        let gap = MigrationTracker::from_entries(vec![entry("0.1.0"), entry("0.3.0")]).unwrap();
        assert_eq!(
            gap.verify_against(&reg),
            Err(DomainError::TrackerGap {
                missing: "0.2.0".into(),
                version: "0.3.0".into(),
            })
        );

        let disorder = MigrationTracker::from_entries(vec![entry("0.2.0"), entry("0.1.0")]).unwrap();
        assert!(matches!(
            disorder.verify_against(&reg),
            Err(DomainError::TrackerOutOfOrder { .. })
        ));
    }

    #[test]
    fn entry_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(entry("0.2.0")).unwrap();
        assert_eq!(json["version"], "0.2.0");
        assert!(json.get("appliedAt").is_some());
        assert_eq!(json["checksum"], "abc");
    }
}
