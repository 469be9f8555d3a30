//! File Registry
//!
//! Maps each file identity to its line store, creating stores lazily on the
//! first event from a file. Creation is exactly-once under concurrent
//! first-touch: an optimistic read-locked probe serves the common case, and
//! losers of the creation race rediscover the winner's store after taking
//! the write lock.

use super::{FileId, LineStore};
use crate::result::{CubrirError, CubrirResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Lazily-populated map from file identity to its line store
#[derive(Debug)]
pub struct FileRegistry {
    files: RwLock<HashMap<FileId, Arc<LineStore>>>,
    dense_bound: usize,
}

impl FileRegistry {
    /// Create an empty registry whose stores use the given dense bound
    #[must_use]
    pub fn new(dense_bound: usize) -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            dense_bound,
        }
    }

    /// Get the store for `file`, creating it if this is the file's first event
    ///
    /// Repeated calls with value-equal identities return the same store,
    /// even across threads racing on the first call. The write lock is only
    /// taken on first-touch of a file, so steady-state dispatch contends on
    /// nothing here but a read lock.
    pub fn get_or_create(&self, file: &FileId) -> CubrirResult<Arc<LineStore>> {
        {
            let files = self
                .files
                .read()
                .map_err(|_| CubrirError::LockPoisoned { what: "file registry" })?;
            if let Some(store) = files.get(file) {
                return Ok(Arc::clone(store));
            }
        }

        let mut files = self
            .files
            .write()
            .map_err(|_| CubrirError::LockPoisoned { what: "file registry" })?;
        // Re-check: another thread may have created the store while we
        // waited for the write lock.
        if let Some(store) = files.get(file) {
            return Ok(Arc::clone(store));
        }
        debug!(file = %file, "registering coverage store");
        let store = Arc::new(LineStore::new(file.clone(), self.dense_bound));
        files.insert(file.clone(), Arc::clone(&store));
        Ok(store)
    }

    /// All stores currently registered
    pub fn stores(&self) -> CubrirResult<Vec<Arc<LineStore>>> {
        let files = self
            .files
            .read()
            .map_err(|_| CubrirError::LockPoisoned { what: "file registry" })?;
        Ok(files.values().map(Arc::clone).collect())
    }

    /// Number of files registered
    pub fn len(&self) -> CubrirResult<usize> {
        Ok(self
            .files
            .read()
            .map_err(|_| CubrirError::LockPoisoned { what: "file registry" })?
            .len())
    }

    /// Whether any file has been registered
    pub fn is_empty(&self) -> CubrirResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Drop every registered store
    pub fn clear(&self) -> CubrirResult<()> {
        self.files
            .write()
            .map_err(|_| CubrirError::LockPoisoned { what: "file registry" })?
            .clear();
        Ok(())
    }
}
