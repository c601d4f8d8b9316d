//! Local filesystem adapter rooted at a project directory.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use strata_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::{FileTree, RelativePath},
    error::{StrataError, StrataResult},
};

/// Directory names skipped when none are configured.
pub const DEFAULT_IGNORED: &[&str] = &[".git", "node_modules", "target", ".strata"];

/// Production filesystem implementation using `std::fs`.
///
/// Every path is resolved against `root`. Files that are not valid UTF-8
/// and reserved paths enter the snapshot as protected entries, so a
/// migration that tries to change them fails before anything is written.
#[derive(Debug, Clone)]
pub struct LocalFilesystem {
    root: PathBuf,
    ignored: Vec<String>,
    reserved: BTreeSet<RelativePath>,
}

impl LocalFilesystem {
    /// Create an adapter for the project at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignored: DEFAULT_IGNORED.iter().map(|s| s.to_string()).collect(),
            reserved: BTreeSet::new(),
        }
    }

    /// Replace the ignored directory names.
    pub fn with_ignored<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored = names.into_iter().map(Into::into).collect();
        self
    }

    /// Protect `path` from migrations whether or not it exists yet.
    ///
    /// Used for the migration ledger, which the tracker store owns.
    pub fn reserving(mut self, path: RelativePath) -> Self {
        self.reserved.insert(path);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &RelativePath) -> PathBuf {
        self.root.join(path.as_path())
    }

    fn is_ignored(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.ignored.iter().any(|i| i == name))
    }
}

impl Filesystem for LocalFilesystem {
    fn read_tree(&self) -> StrataResult<FileTree> {
        if !self.root.is_dir() {
            return Err(ApplicationError::ProjectNotFound {
                path: self.root.clone(),
            }
            .into());
        }

        let mut tree = FileTree::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_ignored(e));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map_or_else(|| self.root.clone(), Path::to_path_buf);
                storage_error(&path, "walk directory", e.to_string())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let relative = RelativePath::try_new(relative)?;
            if self.reserved.contains(&relative) {
                continue;
            }

            match fs::read_to_string(entry.path()) {
                Ok(content) => tree.insert(relative, content),
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    debug!(path = %relative, "not UTF-8 text, protected from migrations");
                    tree.insert_protected(relative);
                }
                Err(e) => return Err(map_io_error(entry.path(), e, "read file")),
            }
        }

        for path in &self.reserved {
            tree.insert_protected(path.clone());
        }

        debug!(
            root = %self.root.display(),
            files = tree.len(),
            protected = tree.protected().count(),
            "project snapshot read"
        );
        Ok(tree)
    }

    fn write_file(&self, path: &RelativePath, content: &str) -> StrataResult<()> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| map_io_error(parent, e, "create directory"))?;
        }
        fs::write(&target, content).map_err(|e| map_io_error(&target, e, "write file"))?;
        debug!(%path, bytes = content.len(), "file written");
        Ok(())
    }

    fn remove_file(&self, path: &RelativePath) -> StrataResult<()> {
        let target = self.resolve(path);
        fs::remove_file(&target).map_err(|e| map_io_error(&target, e, "remove file"))?;
        debug!(%path, "file removed");
        Ok(())
    }
}

fn storage_error(path: &Path, operation: &str, reason: String) -> StrataError {
    ApplicationError::Storage {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, reason),
    }
    .into()
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> StrataError {
    storage_error(path, operation, e.to_string())
}
