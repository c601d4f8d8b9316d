use serde::Serialize;

use crate::domain::{
    entities::{
        registry::MigrationRegistry,
        tracker::{AppliedMigration, MigrationTracker},
    },
    value_objects::MigrationVersion,
};

/// A registered migration not yet in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingMigration {
    pub version: MigrationVersion,
    pub description: String,
}

/// An applied migration whose recorded checksum no longer matches the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriftedMigration {
    pub version: MigrationVersion,
    pub recorded: String,
    pub current: String,
}

/// Where a project stands relative to the catalog.
///
/// `pending` is in registry order, `applied` in ledger order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub applied: Vec<AppliedMigration>,
    pub pending: Vec<PendingMigration>,
    pub drifted: Vec<DriftedMigration>,
}

impl MigrationStatus {
    pub fn compute(registry: &MigrationRegistry, tracker: &MigrationTracker) -> Self {
        let pending = registry
            .iter()
            .filter(|m| !tracker.has_applied(m.version()))
            .map(|m| PendingMigration {
                version: m.version(),
                description: m.description().to_string(),
            })
            .collect();

        let drifted = tracker
            .list_applied()
            .iter()
            .filter_map(|entry| {
                let current = registry.get(entry.version)?.checksum();
                (current != entry.checksum).then(|| DriftedMigration {
                    version: entry.version,
                    recorded: entry.checksum.clone(),
                    current,
                })
            })
            .collect();

        Self {
            applied: tracker.list_applied().to_vec(),
            pending,
            drifted,
        }
    }

    pub fn is_up_to_date(&self) -> bool {
        self.pending.is_empty()
    }

    /// The migration `migrate` would apply next.
    pub fn next_pending(&self) -> Option<&PendingMigration> {
        self.pending.first()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::entities::{migration::Migration, transform::EnsureFile};

    fn registry() -> MigrationRegistry {
        let build = |v: &str| {
            Migration::builder(v.parse().unwrap())
                .description(format!("m{v}"))
                .transform(EnsureFile::new("a.md", v))
                .build()
                .unwrap()
        };
        MigrationRegistry::new(vec![build("0.1.0"), build("0.2.0")]).unwrap()
    }

    #[test]
    fn splits_applied_and_pending() {
        let registry = registry();
        let first = registry.iter().next().unwrap();
        let mut tracker = MigrationTracker::new();
        tracker
            .record_applied(AppliedMigration::new(first.version(), Utc::now(), first.checksum()))
            .unwrap();

        let status = MigrationStatus::compute(&registry, &tracker);
        assert_eq!(status.applied.len(), 1);
        assert_eq!(status.pending.len(), 1);
        assert_eq!(status.next_pending().unwrap().version.to_string(), "0.2.0");
        assert!(status.drifted.is_empty());
    }

    #[test]
    fn detects_checksum_drift() {
        let registry = registry();
        let mut tracker = MigrationTracker::new();
        tracker
            .record_applied(AppliedMigration::new("0.1.0".parse().unwrap(), Utc::now(), "stale"))
            .unwrap();

        let status = MigrationStatus::compute(&registry, &tracker);
        assert_eq!(status.drifted.len(), 1);
        assert_eq!(status.drifted[0].recorded, "stale");
    }

    #[test]
    fn empty_tracker_has_everything_pending() {
        let status = MigrationStatus::compute(&registry(), &MigrationTracker::new());
        assert!(status.applied.is_empty());
        assert_eq!(status.pending.len(), 2);
        assert!(!status.is_up_to_date());
    }
}
