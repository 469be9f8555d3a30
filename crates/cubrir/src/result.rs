//! Result and error types for Cubrir.

use thiserror::Error;

/// Result type for Cubrir operations
pub type CubrirResult<T> = Result<T, CubrirError>;

/// Errors that can occur in Cubrir
///
/// Nothing here is fatal to the collector: every failure is scoped to a
/// single trace event, which is dropped while the collector stays usable.
#[derive(Debug, Error)]
pub enum CubrirError {
    /// A shared collection structure's lock was poisoned by a panicking thread
    #[error("coverage {what} lock poisoned by a panicking thread")]
    LockPoisoned {
        /// Which structure was being locked
        what: &'static str,
    },

    /// Serializing or deserializing coverage data failed
    #[error("coverage data serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
