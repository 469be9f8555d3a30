//! Coverage Collector Facade
//!
//! Owns the dispatcher (and through it the registry, overflow set, and
//! filter), plus the enabled gate the runtime's callback is checked against.
//! One collector instance serves every thread of the instrumented program.

use super::{
    Dispatch, EventDispatcher, FileId, PrefixFilter, StatsSnapshot, TraceEvent, TraceSink,
    DEFAULT_DENSE_BOUND,
};
use crate::result::CubrirResult;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Sorted distinct executed lines per file
pub type CoverageSnapshot = BTreeMap<FileId, Vec<u32>>;

/// Collector configuration
///
/// `exclude_prefix` and `include_prefix` are mutually exclusive by contract.
/// Setting both is not rejected: exclude is evaluated first and
/// short-circuits, so the combined behavior is defined policy.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Skip files whose path starts with this prefix
    pub exclude_prefix: Option<String>,
    /// Track only files whose path starts with this prefix
    pub include_prefix: Option<String>,
    /// Line-number bound for the per-file dense array
    pub dense_bound: usize,
}

impl CollectorConfig {
    /// Create a builder for collector config
    #[must_use]
    pub fn builder() -> CollectorConfigBuilder {
        CollectorConfigBuilder::default()
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            exclude_prefix: None,
            include_prefix: None,
            dense_bound: DEFAULT_DENSE_BOUND,
        }
    }
}

/// Builder for collector configuration
#[derive(Debug, Default)]
pub struct CollectorConfigBuilder {
    exclude_prefix: Option<String>,
    include_prefix: Option<String>,
    dense_bound: usize,
}

impl CollectorConfigBuilder {
    /// Skip files whose path starts with `prefix`
    #[must_use]
    pub fn exclude_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.exclude_prefix = Some(prefix.into());
        self
    }

    /// Track only files whose path starts with `prefix`
    #[must_use]
    pub fn include_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.include_prefix = Some(prefix.into());
        self
    }

    /// Set the dense-array line bound
    #[must_use]
    pub fn dense_bound(mut self, bound: usize) -> Self {
        self.dense_bound = bound;
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> CollectorConfig {
        CollectorConfig {
            exclude_prefix: self.exclude_prefix,
            include_prefix: self.include_prefix,
            dense_bound: if self.dense_bound == 0 {
                DEFAULT_DENSE_BOUND
            } else {
                self.dense_bound
            },
        }
    }
}

/// Line-coverage collector
///
/// Thread-safe through shared references: the runtime calls
/// [`handle_event`](TraceSink::handle_event) from any number of threads
/// while snapshot/clear/enable/disable are available concurrently.
#[derive(Debug)]
pub struct Collector {
    config: CollectorConfig,
    dispatcher: EventDispatcher,
    enabled: AtomicBool,
}

impl Collector {
    /// Create a disabled collector with the given configuration
    #[must_use]
    pub fn new(config: CollectorConfig) -> Self {
        let filter = PrefixFilter::new(
            config.exclude_prefix.as_deref(),
            config.include_prefix.as_deref(),
        );
        let dispatcher = EventDispatcher::new(filter, config.dense_bound);
        Self {
            config,
            dispatcher,
            enabled: AtomicBool::new(false),
        }
    }

    /// Begin observing line events
    ///
    /// Idempotent: enabling an enabled collector has no further effect.
    pub fn enable(&self) {
        if !self.enabled.swap(true, Ordering::SeqCst) {
            debug!("coverage collection enabled");
        }
    }

    /// Stop observing line events
    ///
    /// Synchronous from the collector's point of view: any event handed in
    /// after this returns is a no-op.
    pub fn disable(&self) {
        if self.enabled.swap(false, Ordering::SeqCst) {
            debug!("coverage collection disabled");
        }
    }

    /// Whether the collector is currently observing events
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Drop all recorded coverage and caches, keeping the configuration
    pub fn clear(&self) -> CubrirResult<()> {
        debug!("clearing coverage data");
        self.dispatcher.clear()
    }

    /// Sorted distinct executed lines per file
    ///
    /// Dense hits and overflow lines are merged ascending. Keys are exactly
    /// the files that had at least one in-scope line recorded.
    pub fn snapshot(&self) -> CubrirResult<CoverageSnapshot> {
        let mut result = BTreeMap::new();
        for store in self.dispatcher.registry().stores()? {
            let mut lines = store.snapshot();
            // Overflow lines are all >= the dense bound, so appending keeps
            // the merged sequence sorted.
            lines.extend(self.dispatcher.overflow().lines_for(store.file())?);
            if !lines.is_empty() {
                result.insert(store.file().clone(), lines);
            }
        }
        Ok(result)
    }

    /// Diagnostic dispatch counters for this collector instance
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.dispatcher.stats()
    }

    /// The configuration this collector was built with
    #[must_use]
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }
}

impl TraceSink for Collector {
    fn handle_event(&self, event: &TraceEvent) -> Dispatch {
        match event {
            TraceEvent::Line {
                file,
                line,
                absolute_file,
            } => {
                if !self.enabled.load(Ordering::SeqCst) {
                    return Dispatch::Ignored;
                }
                // Events with no attributable file cannot be recorded.
                let Some(file) = file.as_ref() else {
                    return Dispatch::Ignored;
                };
                match self
                    .dispatcher
                    .dispatch_line(file, *line, absolute_file.as_ref())
                {
                    Ok(true) => Dispatch::Recorded,
                    Ok(false) => Dispatch::Ignored,
                    Err(err) => {
                        warn!(error = %err, file = %file, line, "dropping line event");
                        Dispatch::Ignored
                    }
                }
            }
            TraceEvent::Call | TraceEvent::Return | TraceEvent::Exception => Dispatch::Detach,
        }
    }
}
