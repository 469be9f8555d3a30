//! File Identity
//!
//! A `FileId` is the value that distinguishes one source file from another
//! for coverage purposes: canonically the file's path as the instrumented
//! runtime reports it. Runtimes that intern path strings hand out the same
//! allocation for every event from one file, so the dispatch hot path checks
//! pointer identity before falling back to a full string comparison.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Identity of a source file under coverage
///
/// Cheap to clone (a reference-counted string), hashable and ordered by
/// value. Pointer identity implies value equality, so the fast-path check
/// in [`same_identity`](Self::same_identity) and the `Eq` impl always agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(Arc<str>);

impl FileId {
    /// Create a file identity from a path string
    #[must_use]
    pub fn new(path: impl Into<Arc<str>>) -> Self {
        Self(path.into())
    }

    /// Get the path string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fast identity check: pointer equality first, value equality second
    ///
    /// This is the per-event comparison the dispatcher runs against its
    /// cached file, so the common interned-string case must not touch the
    /// string bytes at all.
    #[inline]
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl From<&str> for FileId {
    fn from(path: &str) -> Self {
        Self(Arc::from(path))
    }
}

impl From<String> for FileId {
    fn from(path: String) -> Self {
        Self(Arc::from(path))
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for FileId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FileId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let path = String::deserialize(deserializer)?;
        Ok(Self(Arc::from(path)))
    }
}
