//! Cubrir: Low-Overhead Line-Coverage Collection
//!
//! Cubrir (Spanish: "to cover") is the collection engine behind
//! test-coverage tooling: an instrumented runtime hands it one event per
//! executed line, and it answers with a per-file map of distinct executed
//! line numbers. Everything around that - report rendering, source
//! annotation, persistence, process orchestration - lives in the consuming
//! tooling; this crate owns only the hot path and the data it produces.
//!
//! # Example
//!
//! ```
//! use cubrir::{Collector, CollectorConfig, Dispatch, FileId, TraceEvent, TraceSink};
//!
//! let collector = Collector::new(
//!     CollectorConfig::builder().include_prefix("/app/src").build(),
//! );
//! collector.enable();
//!
//! let file = FileId::new("/app/src/main.py");
//! let event = TraceEvent::Line {
//!     file: Some(file.clone()),
//!     line: 3,
//!     absolute_file: None,
//! };
//! assert_eq!(collector.handle_event(&event), Dispatch::Recorded);
//!
//! collector.disable();
//! let snapshot = collector.snapshot().unwrap();
//! assert_eq!(snapshot[&file], vec![3]);
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod collector;
mod result;

pub use collector::{
    Collector, CollectorConfig, CollectorConfigBuilder, CoverageData, CoverageSnapshot, Dispatch,
    EventDispatcher, FileId, FileRegistry, LineStore, OverflowSet, PrefixFilter, StatsSnapshot,
    TraceEvent, TraceSink, Tracer, DEFAULT_DENSE_BOUND,
};
pub use result::{CubrirError, CubrirResult};
