use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{
    entities::{
        change::{ChangeKind, TransformChange},
        common::RelativePath,
    },
    error::DomainError,
};

/// Read-only snapshot of a project's files.
///
/// Transforms receive a `&FileTree` and never mutate it; the fold advances a
/// private copy with [`FileTree::apply`]. Ordered by path so iteration and
/// diffs are deterministic.
///
/// Protected entries are files migrations must leave alone: content that is
/// not UTF-8 text, or paths the host reserves such as the migration ledger.
/// They count as present but have no content, and no change may touch them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    files: BTreeMap<RelativePath, String>,
    protected: BTreeSet<RelativePath>,
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<RelativePath>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn with_file(mut self, path: impl Into<RelativePath>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Record a path that exists for migrations but may not be changed.
    pub fn insert_protected(&mut self, path: impl Into<RelativePath>) {
        let path = path.into();
        self.files.remove(&path);
        self.protected.insert(path);
    }

    pub fn with_protected(mut self, path: impl Into<RelativePath>) -> Self {
        self.insert_protected(path);
        self
    }

    pub fn is_protected(&self, path: &RelativePath) -> bool {
        self.protected.contains(path)
    }

    pub fn protected(&self) -> impl Iterator<Item = &RelativePath> {
        self.protected.iter()
    }

    pub fn get(&self, path: &RelativePath) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Convenience lookup by string path.
    pub fn read(&self, path: &str) -> Option<&str> {
        RelativePath::try_new(path)
            .ok()
            .and_then(|p| self.files.get(&p))
            .map(String::as_str)
    }

    /// Whether a file exists at `path`, protected or not.
    pub fn contains(&self, path: &RelativePath) -> bool {
        self.files.contains_key(path) || self.protected.contains(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &RelativePath> {
        self.files.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RelativePath, &str)> {
        self.files.iter().map(|(p, c)| (p, c.as_str()))
    }

    /// Files whose path starts with `prefix`.
    pub fn under<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a RelativePath, &'a str)> + 'a {
        self.iter()
            .filter(move |(p, _)| p.as_path().starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Apply one change in memory.
    ///
    /// Rejects changes that contradict the snapshot: adding a file that
    /// exists, modifying/deleting one that does not, or touching a
    /// protected file in any way.
    pub fn apply(&mut self, change: &TransformChange) -> Result<(), DomainError> {
        let path = &change.path;
        if self.protected.contains(path) {
            return Err(DomainError::ProtectedFile {
                action: change.kind.label(),
                path: path.to_string(),
            });
        }
        match &change.kind {
            ChangeKind::Add { content } => {
                if self.files.contains_key(path) {
                    return Err(DomainError::FileAlreadyExists {
                        path: path.to_string(),
                    });
                }
                self.files.insert(path.clone(), content.clone());
            }
            ChangeKind::Modify { content } => {
                let Some(slot) = self.files.get_mut(path) else {
                    return Err(DomainError::FileMissing {
                        action: "modify",
                        path: path.to_string(),
                    });
                };
                *slot = content.clone();
            }
            ChangeKind::Delete => {
                if self.files.remove(path).is_none() {
                    return Err(DomainError::FileMissing {
                        action: "delete",
                        path: path.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Apply a batch in order, all or nothing.
    pub fn apply_all(&mut self, changes: &[TransformChange]) -> Result<(), DomainError> {
        let mut next = self.clone();
        for change in changes {
            next.apply(change)?;
        }
        *self = next;
        Ok(())
    }

    /// Net changes turning `before` into `after`, ordered by path.
    ///
    /// A file added then modified within one migration collapses into a
    /// single add; a file added then deleted disappears entirely.
    pub fn diff(before: &FileTree, after: &FileTree) -> Vec<TransformChange> {
        let mut changes = Vec::new();

        for (path, old) in &before.files {
            match after.files.get(path) {
                None => changes.push(TransformChange::delete(path.clone())),
                Some(new) if new != old => {
                    changes.push(TransformChange::modify(path.clone(), new.clone()))
                }
                Some(_) => {}
            }
        }
        for (path, new) in &after.files {
            if !before.files.contains_key(path) {
                changes.push(TransformChange::add(path.clone(), new.clone()));
            }
        }

        changes.sort_by(|a, b| a.path.cmp(&b.path));
        changes
    }
}

impl<P, C> FromIterator<(P, C)> for FileTree
where
    P: Into<RelativePath>,
    C: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut tree = Self::new();
        for (path, content) in iter {
            tree.insert(path, content);
        }
        tree
    }
}
