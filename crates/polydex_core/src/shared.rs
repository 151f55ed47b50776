//! Thread-shared wrapper around a search index.
//!
//! The engine itself does no locking. When an index is shared between
//! threads, writers (`build_index`, `update_index`) must be serialized; this
//! wrapper does that with a `parking_lot` reader-writer lock while letting
//! searches run concurrently.

use crate::change::{Change, UpdateReport};
use crate::engine::SearchIndex;
use crate::error::CoreResult;
use crate::record::Record;
use crate::stats::IndexStats;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// A cloneable handle to a lock-protected [`SearchIndex`].
pub struct SharedSearchIndex<R> {
    inner: Arc<RwLock<SearchIndex<R>>>,
}

impl<R: Record> SharedSearchIndex<R> {
    /// Wraps an index.
    pub fn new(index: SearchIndex<R>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Acquires a read guard for searching.
    ///
    /// Search results borrow from the guard, so keep it alive while using
    /// them.
    pub fn read(&self) -> RwLockReadGuard<'_, SearchIndex<R>> {
        self.inner.read()
    }

    /// Acquires the write guard.
    pub fn write(&self) -> RwLockWriteGuard<'_, SearchIndex<R>> {
        self.inner.write()
    }

    /// Builds the index under the write lock.
    pub fn build_index<F, S>(&self, records: Vec<R>, fields: F)
    where
        F: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.inner.write().build_index(records, fields);
    }

    /// Applies a change batch under the write lock.
    pub fn update_index<I>(&self, changes: I) -> CoreResult<UpdateReport>
    where
        I: IntoIterator<Item = Change<R>>,
    {
        self.inner.write().update_index(changes)
    }

    /// Returns a statistics snapshot.
    pub fn stats(&self) -> IndexStats {
        self.inner.read().stats()
    }

    /// Returns the estimated memory use in bytes.
    pub fn memory_usage(&self) -> usize {
        self.inner.read().memory_usage()
    }
}

impl<R> Clone for SharedSearchIndex<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
