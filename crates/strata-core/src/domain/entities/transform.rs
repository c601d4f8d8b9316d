//! Transforms: named, pure units of change.
//!
//! A transform reads a [`FileTree`] snapshot and describes the changes it
//! wants as a [`TransformResult`]. It must not touch storage or any state
//! outside the returned value; that is what lets preview and apply share one
//! code path.
//!
//! The structural transforms below are written so that running them against
//! an already-migrated tree produces no changes.

use std::fmt;

use crate::domain::entities::{
    change::{TransformChange, TransformError, TransformResult},
    common::RelativePath,
    file_tree::FileTree,
};

/// A pure function from a snapshot to a set of changes plus errors.
pub trait Transform: Send + Sync + fmt::Debug {
    /// Stable identifier, also part of the migration checksum.
    fn name(&self) -> &str;

    /// One-line human description.
    fn description(&self) -> &str;

    /// Compute the changes this transform makes to `tree`.
    fn apply(&self, tree: &FileTree) -> TransformResult;
}

// ── FnTransform ──────────────────────────────────────────────────────────────

/// A transform backed by a plain function.
#[derive(Clone, Copy)]
pub struct FnTransform {
    name: &'static str,
    description: &'static str,
    run: fn(&FileTree) -> TransformResult,
}

impl FnTransform {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        run: fn(&FileTree) -> TransformResult,
    ) -> Self {
        Self {
            name,
            description,
            run,
        }
    }
}

impl fmt::Debug for FnTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransform")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Transform for FnTransform {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn apply(&self, tree: &FileTree) -> TransformResult {
        (self.run)(tree)
    }
}

// ── EnsureFile ───────────────────────────────────────────────────────────────

/// Create a file when it does not exist yet. Existing files are left alone.
#[derive(Debug, Clone)]
pub struct EnsureFile {
    name: String,
    description: String,
    path: RelativePath,
    content: String,
}

impl EnsureFile {
    pub fn new(path: impl Into<RelativePath>, content: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: format!("ensure-file:{path}"),
            description: format!("Create {path} if missing"),
            path,
            content: content.into(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Transform for EnsureFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn apply(&self, tree: &FileTree) -> TransformResult {
        if tree.contains(&self.path) {
            return TransformResult::new();
        }
        TransformResult::new().with_change(TransformChange::add(
            self.path.clone(),
            self.content.clone(),
        ))
    }
}

// ── MoveFile ─────────────────────────────────────────────────────────────────

/// Move a file to a new path.
///
/// A missing source is a no-op. A destination that already holds the same
/// content only removes the source; differing content is an error.
#[derive(Debug, Clone)]
pub struct MoveFile {
    name: String,
    description: String,
    from: RelativePath,
    to: RelativePath,
}

impl MoveFile {
    pub fn new(from: impl Into<RelativePath>, to: impl Into<RelativePath>) -> Self {
        let (from, to) = (from.into(), to.into());
        Self {
            name: format!("move-file:{from}"),
            description: format!("Move {from} to {to}"),
            from,
            to,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Transform for MoveFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn apply(&self, tree: &FileTree) -> TransformResult {
        move_file(&self.name, tree, &self.from, &self.to)
    }
}

/// Shared move logic, reusable by transforms that relocate many files.
pub fn move_file(
    transform: &str,
    tree: &FileTree,
    from: &RelativePath,
    to: &RelativePath,
) -> TransformResult {
    let mut result = TransformResult::new();
    if from == to {
        return result;
    }
    let Some(content) = tree.get(from) else {
        return result;
    };

    match tree.get(to) {
        None => {
            result.push_change(TransformChange::add(to.clone(), content));
            result.push_change(TransformChange::delete(from.clone()));
        }
        Some(existing) if existing == content => {
            result.push_change(TransformChange::delete(from.clone()));
        }
        Some(_) => result.push_error(
            TransformError::new(transform, format!("{to} already exists with different content"))
                .at(from.clone()),
        ),
    }
    result
}

// ── ReplaceText ──────────────────────────────────────────────────────────────

/// Replace every occurrence of a literal string inside one file.
#[derive(Debug, Clone)]
pub struct ReplaceText {
    name: String,
    description: String,
    path: RelativePath,
    from: String,
    to: String,
}

impl ReplaceText {
    pub fn new(
        path: impl Into<RelativePath>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        let path = path.into();
        let (from, to) = (from.into(), to.into());
        Self {
            name: format!("replace-text:{path}"),
            description: format!("Replace '{from}' with '{to}' in {path}"),
            path,
            from,
            to,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Transform for ReplaceText {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn apply(&self, tree: &FileTree) -> TransformResult {
        match tree.get(&self.path) {
            Some(content) if !self.from.is_empty() && content.contains(&self.from) => {
                TransformResult::new().with_change(TransformChange::modify(
                    self.path.clone(),
                    content.replace(&self.from, &self.to),
                ))
            }
            _ => TransformResult::new(),
        }
    }
}

// ── RemoveFile ───────────────────────────────────────────────────────────────

/// Delete a file if it exists.
#[derive(Debug, Clone)]
pub struct RemoveFile {
    name: String,
    description: String,
    path: RelativePath,
}

impl RemoveFile {
    pub fn new(path: impl Into<RelativePath>) -> Self {
        let path = path.into();
        Self {
            name: format!("remove-file:{path}"),
            description: format!("Delete {path}"),
            path,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Transform for RemoveFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn apply(&self, tree: &FileTree) -> TransformResult {
        if !tree.contains(&self.path) {
            return TransformResult::new();
        }
        TransformResult::new().with_change(TransformChange::delete(self.path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_file_is_noop_when_present() {
        let t = EnsureFile::new("a.md", "new");
        assert_eq!(t.apply(&FileTree::new()).changes.len(), 1);
        let present = FileTree::new().with_file("a.md", "old");
        assert!(t.apply(&present).changes.is_empty());
    }

    #[test]
    fn move_file_handles_collisions() {
        let t = MoveFile::new("old/a.md", "new/a.md");

        let moved = t.apply(&FileTree::new().with_file("old/a.md", "x"));
        assert_eq!(
            moved.changes,
            vec![
                TransformChange::add("new/a.md", "x"),
                TransformChange::delete("old/a.md"),
            ]
        );

        let same = FileTree::new()
            .with_file("old/a.md", "x")
            .with_file("new/a.md", "x");
        assert_eq!(
            t.apply(&same).changes,
            vec![TransformChange::delete("old/a.md")]
        );

        let clash = FileTree::new()
            .with_file("old/a.md", "x")
            .with_file("new/a.md", "y");
        let result = t.apply(&clash);
        assert!(result.changes.is_empty());
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn move_onto_itself_keeps_the_file() {
        let t = MoveFile::new("a.md", "a.md");
        let result = t.apply(&FileTree::new().with_file("a.md", "x"));
        assert!(result.is_ok());
        assert!(result.changes.is_empty());
    }

    #[test]
    fn replace_text_only_touches_matches() {
        let t = ReplaceText::new("cfg.md", "@old/pkg", "@new/pkg").named("rename-pkg");
        assert_eq!(t.name(), "rename-pkg");

        let tree = FileTree::new().with_file("cfg.md", "use @old/pkg and @old/pkg");
        assert_eq!(
            t.apply(&tree).changes,
            vec![TransformChange::modify("cfg.md", "use @new/pkg and @new/pkg")]
        );
        assert!(t.apply(&FileTree::new()).changes.is_empty());
    }

    #[test]
    fn remove_file_skips_missing() {
        let t = RemoveFile::new("gone.md");
        assert!(t.apply(&FileTree::new()).is_ok());
        assert_eq!(
            t.apply(&FileTree::new().with_file("gone.md", "")).changes,
            vec![TransformChange::delete("gone.md")]
        );
    }
}
