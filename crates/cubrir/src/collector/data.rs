//! Coverage Data Aggregation
//!
//! Accumulates and combines snapshots taken from tracers: a session-wide
//! map plus one map per named section. This is the shape report tooling
//! consumes - file paths to sorted line sets - and it serializes to JSON so
//! the surrounding tooling can carry it across its own boundaries.

use super::{CoverageSnapshot, FileId, Tracer};
use crate::result::CubrirResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

type FileLines = BTreeMap<FileId, BTreeSet<u32>>;

/// Merged coverage from one or more tracer sessions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageData {
    common: FileLines,
    sections: BTreeMap<String, FileLines>,
}

impl CoverageData {
    /// Create an empty aggregate
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate a tracer's current coverage
    pub fn from_tracer(tracer: &Tracer) -> CubrirResult<Self> {
        let mut data = Self::new();
        data.update(tracer)?;
        Ok(data)
    }

    /// Fold a tracer's common and per-section snapshots into this aggregate
    pub fn update(&mut self, tracer: &Tracer) -> CubrirResult<()> {
        Self::merge_snapshot(&mut self.common, &tracer.common().snapshot()?);
        for name in tracer.section_names() {
            if let Some(collector) = tracer.section(name) {
                let target = self.sections.entry(name.to_string()).or_default();
                Self::merge_snapshot(target, &collector.snapshot()?);
            }
        }
        Ok(())
    }

    fn merge_snapshot(target: &mut FileLines, snapshot: &CoverageSnapshot) {
        for (file, lines) in snapshot {
            target
                .entry(file.clone())
                .or_default()
                .extend(lines.iter().copied());
        }
    }

    /// Executed lines per file: the common coverage unioned with every
    /// section, or with one named section only
    #[must_use]
    pub fn gather_files(&self, section: Option<&str>) -> BTreeMap<FileId, Vec<u32>> {
        let mut merged = self.common.clone();
        match section {
            None => {
                for files in self.sections.values() {
                    Self::union_into(&mut merged, files);
                }
            }
            Some(name) => {
                if let Some(files) = self.sections.get(name) {
                    Self::union_into(&mut merged, files);
                }
            }
        }
        merged
            .into_iter()
            .map(|(file, lines)| (file, lines.into_iter().collect()))
            .collect()
    }

    fn union_into(target: &mut FileLines, source: &FileLines) {
        for (file, lines) in source {
            target
                .entry(file.clone())
                .or_default()
                .extend(lines.iter().copied());
        }
    }

    /// Per-section executed lines for one file
    ///
    /// Every known section appears in the result; sections in which the
    /// file never executed map to an empty set.
    #[must_use]
    pub fn gather_sections(&self, file: &FileId) -> BTreeMap<String, Vec<u32>> {
        self.sections
            .iter()
            .map(|(name, files)| {
                let lines = files
                    .get(file)
                    .map(|lines| lines.iter().copied().collect())
                    .unwrap_or_default();
                (name.clone(), lines)
            })
            .collect()
    }

    /// The session-wide (non-section) coverage
    #[must_use]
    pub fn common(&self) -> &BTreeMap<FileId, BTreeSet<u32>> {
        &self.common
    }

    /// Names of sections present in the aggregate
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> CubrirResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON produced by [`to_json`](Self::to_json)
    pub fn from_json(json: &str) -> CubrirResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
