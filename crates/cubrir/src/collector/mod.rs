//! Line-Coverage Collection Engine
//!
//! Observes the "line about to execute" stream from an instrumented runtime
//! and records, per source file, the distinct line numbers executed.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  CUBRIR COLLECTION PIPELINE                                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  runtime ──► TraceSink ──► EventDispatcher ──► LineStore (dense) │
//! │                               │    │               └► OverflowSet│
//! │                        PrefixFilter└► FileRegistry               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The dispatcher sits on the critical path of every executed line of the
//! host program, so the design is skewed toward the common case: a one-entry
//! file cache for straight-line runs within one file, a one-entry exclusion
//! cache for runs inside out-of-scope files, a lock-free dense array write
//! for the hit itself, and locks only on first-touch of a file or on line
//! numbers past the dense bound.

mod collector;
mod data;
mod dispatch;
mod event;
mod file_id;
mod filter;
mod line_store;
mod registry;
mod sections;

pub use collector::{Collector, CollectorConfig, CollectorConfigBuilder, CoverageSnapshot};
pub use data::CoverageData;
pub use dispatch::{EventDispatcher, StatsSnapshot};
pub use event::{Dispatch, TraceEvent, TraceSink};
pub use file_id::FileId;
pub use filter::PrefixFilter;
pub use line_store::{LineStore, OverflowSet, DEFAULT_DENSE_BOUND};
pub use registry::FileRegistry;
pub use sections::Tracer;
