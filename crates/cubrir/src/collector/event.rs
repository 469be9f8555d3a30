//! Trace Event Model
//!
//! The boundary between the instrumented runtime and this crate: the runtime
//! drives a [`TraceSink`] once per trace event and acts on the returned
//! [`Dispatch`] verdict. Only line events carry payload the collector cares
//! about; call/return/exception events exist so the runtime can hand the
//! full stream to one sink.

use super::FileId;

/// A single notification from the instrumented runtime
#[derive(Debug, Clone)]
pub enum TraceEvent {
    /// A line of a file is about to execute
    Line {
        /// Primary identity of the file, as recorded at compilation time.
        /// `None` when the runtime cannot attribute the event to any file,
        /// in which case it is dropped silently.
        file: Option<FileId>,
        /// Line number about to execute
        line: u32,
        /// Absolute identity of the file when the runtime has resolved one.
        /// Used only for exclude-prefix matching.
        absolute_file: Option<FileId>,
    },
    /// A function call was entered
    Call,
    /// A function returned
    Return,
    /// An exception was raised
    Exception,
}

/// What the sink did with an event, for the runtime to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The event was recorded
    Recorded,
    /// The event was dropped (out of scope, unattributable, or collection
    /// is disabled)
    Ignored,
    /// The runtime should stop tracing the current scope; no further events
    /// from it are wanted
    Detach,
}

/// Consumer of the runtime's trace-event stream
///
/// Implementations must tolerate concurrent calls: the runtime invokes the
/// sink from every thread of the instrumented program.
pub trait TraceSink {
    /// Observe one trace event and report how it was handled
    fn handle_event(&self, event: &TraceEvent) -> Dispatch;
}
