//! Per-Event Dispatch
//!
//! The entry point for every executed line of the instrumented program. The
//! dominant case is long straight-line runs within one file, so a single
//! cached `(file, store)` slot short-circuits the filter and registry lookups
//! whenever consecutive events share a file. When many threads interleave
//! events from different files they invalidate each other's slot and fall
//! back to the resolve path more often; that degrades speed, never
//! correctness.

use super::{FileId, FileRegistry, LineStore, OverflowSet, PrefixFilter};
use crate::result::{CubrirError, CubrirResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Most recently dispatched file and its store
///
/// The hit path costs one uncontended `RwLock` read (a pair of atomic ops),
/// not a strictly lock-free load; a lock-free slot would need something
/// like `arc-swap`. A writer refilling the slot briefly degrades concurrent
/// readers to the resolve path, never to incorrect recording.
#[derive(Debug)]
struct CacheEntry {
    file: FileId,
    store: Arc<LineStore>,
}

/// Diagnostic counters for the dispatch path
///
/// Owned by the collector instance, never process-global. Reading them is
/// optional instrumentation; they use relaxed atomics and have no effect on
/// what gets recorded.
#[derive(Debug, Default)]
pub struct DispatchStats {
    lines: AtomicU64,
    cache_hits: AtomicU64,
    excluded: AtomicU64,
    exclusion_cache_hits: AtomicU64,
}

impl DispatchStats {
    pub(crate) fn reset(&self) {
        self.lines.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.excluded.store(0, Ordering::Relaxed);
        self.exclusion_cache_hits.store(0, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            lines: self.lines.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            excluded: self.excluded.load(Ordering::Relaxed),
            exclusion_cache_hits: self.exclusion_cache_hits.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the dispatch counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// In-scope line events dispatched
    pub lines: u64,
    /// Line events served from the dispatch cache
    pub cache_hits: u64,
    /// Line events dropped as out of scope
    pub excluded: u64,
    /// Exclusions served from the filter's one-entry cache
    pub exclusion_cache_hits: u64,
}

impl StatsSnapshot {
    /// Fraction of dispatched lines served from the cache
    #[must_use]
    pub fn cache_hit_ratio(&self) -> f64 {
        if self.lines == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / self.lines as f64
    }

    /// Fraction of exclusions served from the exclusion cache
    #[must_use]
    pub fn exclusion_hit_ratio(&self) -> f64 {
        if self.excluded == 0 {
            return 0.0;
        }
        self.exclusion_cache_hits as f64 / self.excluded as f64
    }
}

/// Hot-path dispatcher from line events to line stores
#[derive(Debug)]
pub struct EventDispatcher {
    registry: FileRegistry,
    overflow: OverflowSet,
    filter: PrefixFilter,
    cache: RwLock<Option<CacheEntry>>,
    stats: DispatchStats,
    dense_bound: usize,
}

impl EventDispatcher {
    /// Create a dispatcher over fresh registry/overflow state
    #[must_use]
    pub fn new(filter: PrefixFilter, dense_bound: usize) -> Self {
        Self {
            registry: FileRegistry::new(dense_bound),
            overflow: OverflowSet::new(),
            filter,
            cache: RwLock::new(None),
            stats: DispatchStats::default(),
            dense_bound,
        }
    }

    /// Dispatch one line event; returns whether it was recorded
    ///
    /// The four cases, fastest first: the file matches the cached slot
    /// (record straight into the cached store); it matches the cached
    /// excluded identity (drop); the filter newly excludes it (cache the
    /// exclusion, drop); otherwise resolve the store through the registry,
    /// refill the cache and record.
    pub fn dispatch_line(
        &self,
        file: &FileId,
        line: u32,
        absolute_file: Option<&FileId>,
    ) -> CubrirResult<bool> {
        {
            let cache = self
                .cache
                .read()
                .map_err(|_| CubrirError::LockPoisoned { what: "dispatch cache" })?;
            if let Some(entry) = cache.as_ref() {
                if entry.file.same_identity(file) {
                    self.stats.lines.fetch_add(1, Ordering::Relaxed);
                    self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
                    return self.record(&entry.store, file, line).map(|()| true);
                }
            }
        }

        if self.filter.matches_cached_exclusion(file) {
            self.stats.excluded.fetch_add(1, Ordering::Relaxed);
            self.stats.exclusion_cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(false);
        }

        if self.filter.is_excluded(file, absolute_file) {
            self.stats.excluded.fetch_add(1, Ordering::Relaxed);
            self.filter.cache_exclusion(file.clone());
            return Ok(false);
        }

        let store = self.registry.get_or_create(file)?;
        {
            let mut cache = self
                .cache
                .write()
                .map_err(|_| CubrirError::LockPoisoned { what: "dispatch cache" })?;
            *cache = Some(CacheEntry {
                file: file.clone(),
                store: Arc::clone(&store),
            });
        }
        self.stats.lines.fetch_add(1, Ordering::Relaxed);
        self.record(&store, file, line).map(|()| true)
    }

    /// Write one hit, dense or overflow depending on the line number
    #[inline]
    fn record(&self, store: &LineStore, file: &FileId, line: u32) -> CubrirResult<()> {
        if (line as usize) < self.dense_bound {
            store.record(line);
            Ok(())
        } else {
            self.overflow.insert(file, line)
        }
    }

    /// The registry backing this dispatcher
    #[must_use]
    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    /// The overflow set backing this dispatcher
    #[must_use]
    pub fn overflow(&self) -> &OverflowSet {
        &self.overflow
    }

    /// The scope filter
    #[must_use]
    pub fn filter(&self) -> &PrefixFilter {
        &self.filter
    }

    /// Current diagnostic counters
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Drop all recorded state and caches; the filter config is retained
    pub fn clear(&self) -> CubrirResult<()> {
        self.registry.clear()?;
        self.overflow.clear()?;
        {
            let mut cache = self
                .cache
                .write()
                .map_err(|_| CubrirError::LockPoisoned { what: "dispatch cache" })?;
            *cache = None;
        }
        self.filter.clear_cache();
        self.stats.reset();
        Ok(())
    }
}
