//! Path-Prefix Scope Filter
//!
//! Decides whether events from a file are in scope for coverage. Two
//! configurations exist: an exclude prefix (files under it are skipped) and
//! an include prefix (only files under it are tracked). Callers set at most
//! one; if both are set anyway, exclude is checked first and short-circuits,
//! which makes the combined behavior fully defined rather than an error.
//!
//! Identity resolution is deliberately asymmetric: the exclude test prefers
//! the absolute identity the runtime supplies per event (falling back to the
//! event's primary identity when absent), while the include test only ever
//! looks at the primary identity. Downstream scoping behavior depends on
//! this asymmetry, so it is preserved rather than unified.

use super::FileId;
use std::sync::RwLock;

/// Prefix-based inclusion/exclusion filter with a one-entry exclusion cache
///
/// The cache remembers the single most recently excluded file so that long
/// runs of events from one out-of-scope file skip the prefix comparisons.
/// It is best-effort: a stale slot only costs a redundant re-check.
#[derive(Debug)]
pub struct PrefixFilter {
    exclude_prefix: Option<Box<str>>,
    include_prefix: Option<Box<str>>,
    last_excluded: RwLock<Option<FileId>>,
}

impl PrefixFilter {
    /// Create a filter from optional exclude/include prefixes
    #[must_use]
    pub fn new(exclude_prefix: Option<&str>, include_prefix: Option<&str>) -> Self {
        Self {
            exclude_prefix: exclude_prefix.map(Box::from),
            include_prefix: include_prefix.map(Box::from),
            last_excluded: RwLock::new(None),
        }
    }

    /// Whether events from `file` are out of scope
    ///
    /// `absolute_file` is the runtime-resolved absolute identity for this
    /// event, consulted by the exclude test only.
    #[must_use]
    pub fn is_excluded(&self, file: &FileId, absolute_file: Option<&FileId>) -> bool {
        if let Some(prefix) = &self.exclude_prefix {
            let resolved = absolute_file.unwrap_or(file);
            if resolved.as_str().starts_with(&**prefix) {
                return true;
            }
        }
        if let Some(prefix) = &self.include_prefix {
            // Primary identity only - no absolute-path substitution here.
            if !file.as_str().starts_with(&**prefix) {
                return true;
            }
        }
        false
    }

    /// Whether `file` matches the cached last-excluded identity
    #[inline]
    #[must_use]
    pub fn matches_cached_exclusion(&self, file: &FileId) -> bool {
        match self.last_excluded.read() {
            Ok(cached) => cached
                .as_ref()
                .is_some_and(|excluded| excluded.same_identity(file)),
            Err(_) => false,
        }
    }

    /// Remember `file` as the most recently excluded identity
    pub fn cache_exclusion(&self, file: FileId) {
        if let Ok(mut cached) = self.last_excluded.write() {
            *cached = Some(file);
        }
    }

    /// Forget the cached excluded identity
    pub fn clear_cache(&self) {
        if let Ok(mut cached) = self.last_excluded.write() {
            *cached = None;
        }
    }

    /// The configured exclude prefix, if any
    #[must_use]
    pub fn exclude_prefix(&self) -> Option<&str> {
        self.exclude_prefix.as_deref()
    }

    /// The configured include prefix, if any
    #[must_use]
    pub fn include_prefix(&self) -> Option<&str> {
        self.include_prefix.as_deref()
    }
}
