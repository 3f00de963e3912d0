//! Shared document handle.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::path_fs::{AccessMode, Attr, DirEntry, PathFS, RenameFlags};
use super::{mutate, resolve};
use crate::document::Document;
use crate::error::{IniError, IniResult};

/// Document shared between filesystem callbacks.
///
/// Reads hold the read lock for the whole lookup, edits hold the write lock,
/// so no traversal ever observes a half-applied mutation.
/// Clone is cheap (just clones the Arc).
#[derive(Clone, Default)]
pub struct SharedDocument {
    inner: Arc<RwLock<Document>>,
}

impl SharedDocument {
    pub fn new(doc: Document) -> Self {
        Self {
            inner: Arc::new(RwLock::new(doc)),
        }
    }

    /// Copy of the current document.
    pub fn snapshot(&self) -> IniResult<Document> {
        Ok(self.read_lock()?.clone())
    }

    fn read_lock(&self) -> IniResult<RwLockReadGuard<'_, Document>> {
        self.inner.read().map_err(|_| IniError::LockPoisoned)
    }

    fn write_lock(&self) -> IniResult<RwLockWriteGuard<'_, Document>> {
        self.inner.write().map_err(|_| IniError::LockPoisoned)
    }
}

impl From<Document> for SharedDocument {
    fn from(doc: Document) -> Self {
        Self::new(doc)
    }
}

impl PathFS for SharedDocument {
    fn getattr(&self, path: &str) -> IniResult<Attr> {
        let doc = self.read_lock()?;
        resolve::getattr(&doc, path)
    }

    fn readdir(&self, path: &str) -> IniResult<Vec<DirEntry>> {
        let doc = self.read_lock()?;
        let listing = resolve::readdir(&doc, path)?;
        tracing::debug!(path, entries = listing.len(), "readdir");
        Ok(listing)
    }

    fn open(&self, path: &str, mode: AccessMode) -> IniResult<()> {
        tracing::debug!(path, ?mode, "open");
        let doc = self.read_lock()?;
        resolve::open(&doc, path, mode)
    }

    fn read(&self, path: &str, offset: u64, size: usize) -> IniResult<Vec<u8>> {
        let doc = self.read_lock()?;
        let data = resolve::read(&doc, path, offset, size)?;
        tracing::debug!(path, offset, size, returned = data.len(), "read");
        Ok(data)
    }

    fn mkdir(&self, path: &str) -> IniResult<()> {
        let mut doc = self.write_lock()?;
        let result = mutate::mkdir(&mut doc, path);
        log_edit("mkdir", path, &result);
        result
    }

    fn rmdir(&self, path: &str) -> IniResult<()> {
        let mut doc = self.write_lock()?;
        let result = mutate::rmdir(&mut doc, path);
        log_edit("rmdir", path, &result);
        result
    }

    fn rename(&self, from: &str, to: &str, flags: RenameFlags) -> IniResult<()> {
        let mut doc = self.write_lock()?;
        let result = mutate::rename(&mut doc, from, to, flags);
        match &result {
            Ok(()) => tracing::debug!(from, to, ?flags, "rename"),
            Err(e) => tracing::warn!(from, to, ?flags, error = %e, "rename rejected"),
        }
        result
    }
}

fn log_edit(op: &str, path: &str, result: &IniResult<()>) {
    match result {
        Ok(()) => tracing::debug!(op, path, "applied"),
        Err(e) => tracing::warn!(op, path, error = %e, "rejected"),
    }
}
