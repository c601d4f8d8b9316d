use crate::domain::{
    entities::migration::Migration, error::DomainError, value_objects::MigrationVersion,
};

/// Ordered catalog of every known migration.
///
/// Built once and read-only afterwards. Versions are unique and strictly
/// ascending, so iteration order is application order.
#[derive(Debug, Clone, Default)]
pub struct MigrationRegistry {
    migrations: Vec<Migration>,
}

impl MigrationRegistry {
    /// Build a registry, rejecting duplicate or out-of-order versions.
    pub fn new(migrations: Vec<Migration>) -> Result<Self, DomainError> {
        for pair in migrations.windows(2) {
            let (previous, current) = (pair[0].version(), pair[1].version());
            if previous == current {
                return Err(DomainError::DuplicateVersion {
                    version: current.to_string(),
                });
            }
            if previous > current {
                return Err(DomainError::UnorderedRegistry {
                    previous: previous.to_string(),
                    version: current.to_string(),
                });
            }
        }
        for migration in &migrations {
            migration.validate()?;
        }
        Ok(Self { migrations })
    }

    /// All migrations in ascending order.
    ///
    /// Returns an owned copy; callers cannot reorder or drop entries.
    pub fn list(&self) -> Vec<Migration> {
        self.migrations.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Migration> {
        self.migrations.iter()
    }

    pub fn get(&self, version: MigrationVersion) -> Option<&Migration> {
        self.migrations
            .binary_search_by(|m| m.version().cmp(&version))
            .ok()
            .map(|idx| &self.migrations[idx])
    }

    pub fn contains(&self, version: MigrationVersion) -> bool {
        self.get(version).is_some()
    }

    pub fn latest(&self) -> Option<&Migration> {
        self.migrations.last()
    }

    /// Migrations strictly older than `version`.
    pub fn before(&self, version: MigrationVersion) -> impl Iterator<Item = &Migration> {
        self.migrations
            .iter()
            .take_while(move |m| m.version() < version)
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}
