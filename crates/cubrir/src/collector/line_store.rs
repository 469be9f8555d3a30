//! Per-File Line Storage
//!
//! Most source files are shorter than [`DEFAULT_DENSE_BOUND`] lines, so hits
//! are tracked in a fixed-size array of flags indexed by line number: one
//! relaxed atomic store per event, no allocation, no lock. Line numbers at or
//! beyond the bound are rare and go to a collector-wide [`OverflowSet`]
//! behind a mutex. Lowering the bound trades memory for a slower path on
//! lines past it.

use super::FileId;
use crate::result::{CubrirError, CubrirResult};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Line-number bound below which hits are stored densely
pub const DEFAULT_DENSE_BOUND: usize = 5000;

/// Executed-line record for a single source file
///
/// Owned by exactly one registry entry for the collector's lifetime. A flag
/// at index `i` is set iff line `i` of the file executed at least once.
/// Racing writers setting the same flag are idempotent, so recording needs
/// no synchronization beyond the atomic store itself.
#[derive(Debug)]
pub struct LineStore {
    /// The file these lines belong to
    file: FileId,
    /// One executed flag per line number below the dense bound
    lines: Box<[AtomicBool]>,
}

impl LineStore {
    /// Create an empty store for `file` covering lines `0..dense_bound`
    #[must_use]
    pub fn new(file: FileId, dense_bound: usize) -> Self {
        let lines = (0..dense_bound).map(|_| AtomicBool::new(false)).collect();
        Self { file, lines }
    }

    /// The file this store records
    #[must_use]
    pub fn file(&self) -> &FileId {
        &self.file
    }

    /// Number of line slots in the dense array
    #[must_use]
    pub fn dense_bound(&self) -> usize {
        self.lines.len()
    }

    /// Mark a line executed
    ///
    /// This is the hot path - a single relaxed store. Callers route line
    /// numbers at or beyond the dense bound to the overflow set instead.
    #[inline(always)]
    pub fn record(&self, line: u32) {
        if let Some(flag) = self.lines.get(line as usize) {
            flag.store(true, Ordering::Relaxed);
        }
    }

    /// Whether a specific line was recorded
    #[inline]
    #[must_use]
    pub fn contains(&self, line: u32) -> bool {
        self.lines
            .get(line as usize)
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Distinct recorded line numbers, ascending
    ///
    /// The dense array is naturally ordered by index, so no sort is needed.
    #[must_use]
    pub fn snapshot(&self) -> Vec<u32> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, flag)| flag.load(Ordering::Relaxed))
            .map(|(line, _)| line as u32)
            .collect()
    }
}

/// Sparse storage for line numbers past the dense bound
///
/// One overflow set serves the whole collector. An entry exists iff a
/// `(file, line)` with `line >= dense bound` was recorded and not cleared.
/// Per-file lines are kept sorted so snapshots merge without re-sorting.
#[derive(Debug, Default)]
pub struct OverflowSet {
    entries: Mutex<HashMap<FileId, BTreeSet<u32>>>,
}

impl OverflowSet {
    /// Create an empty overflow set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a line past the dense bound for `file`
    pub fn insert(&self, file: &FileId, line: u32) -> CubrirResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CubrirError::LockPoisoned { what: "overflow set" })?;
        entries.entry(file.clone()).or_default().insert(line);
        Ok(())
    }

    /// Sorted overflow lines recorded for `file`, if any
    pub fn lines_for(&self, file: &FileId) -> CubrirResult<Vec<u32>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| CubrirError::LockPoisoned { what: "overflow set" })?;
        Ok(entries
            .get(file)
            .map(|lines| lines.iter().copied().collect())
            .unwrap_or_default())
    }

    /// Drop every overflow entry
    pub fn clear(&self) -> CubrirResult<()> {
        self.entries
            .lock()
            .map_err(|_| CubrirError::LockPoisoned { what: "overflow set" })?
            .clear();
        Ok(())
    }

    /// Number of files with overflow entries
    pub fn file_count(&self) -> CubrirResult<usize> {
        Ok(self
            .entries
            .lock()
            .map_err(|_| CubrirError::LockPoisoned { what: "overflow set" })?
            .len())
    }
}
