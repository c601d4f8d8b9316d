//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, RwLock},
};

use strata_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::{FileTree, RelativePath},
    error::StrataResult,
};

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can keep a handle after boxing one into a
/// runner.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<RelativePath, String>,
    failing: BTreeSet<RelativePath>,
    writes: usize,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with files.
    pub fn with_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<RelativePath>,
        C: Into<String>,
    {
        let fs = Self::new();
        if let Ok(mut inner) = fs.inner.write() {
            for (path, content) in files {
                inner.files.insert(path.into(), content.into());
            }
        }
        fs
    }

    /// Make every write or removal of `path` fail with a storage error.
    pub fn fail_on(&self, path: impl Into<RelativePath>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing.insert(path.into());
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &str) -> Option<String> {
        let inner = self.inner.read().ok()?;
        let path = RelativePath::try_new(path).ok()?;
        inner.files.get(&path).cloned()
    }

    /// Number of successful writes and removals so far.
    pub fn write_count(&self) -> usize {
        self.inner.read().map(|i| i.writes).unwrap_or_default()
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<RelativePath> {
        self.inner
            .read()
            .map(|i| i.files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Filesystem for MemoryFilesystem {
    fn read_tree(&self) -> StrataResult<FileTree> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner
            .files
            .iter()
            .map(|(p, c)| (p.clone(), c.clone()))
            .collect())
    }

    fn write_file(&self, path: &RelativePath, content: &str) -> StrataResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if inner.failing.contains(path) {
            return Err(injected_failure(path));
        }

        inner.files.insert(path.clone(), content.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn remove_file(&self, path: &RelativePath) -> StrataResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if inner.failing.contains(path) {
            return Err(injected_failure(path));
        }
        if inner.files.remove(path).is_none() {
            return Err(ApplicationError::Storage {
                path: path.as_path().to_path_buf(),
                reason: "File does not exist".into(),
            }
            .into());
        }
        inner.writes += 1;
        Ok(())
    }
}

fn injected_failure(path: &RelativePath) -> strata_core::error::StrataError {
    ApplicationError::Storage {
        path: path.as_path().to_path_buf(),
        reason: "write refused".into(),
    }
    .into()
}
