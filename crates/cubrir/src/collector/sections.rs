//! Tracing Sessions and Named Sections
//!
//! A [`Tracer`] runs one collector for the whole session plus, on demand,
//! one collector per named section (a test, a phase, a request). Events
//! always flow to the currently active collector; re-entering a section by
//! name reuses that section's collector so its coverage accumulates across
//! visits.

use super::{Collector, CollectorConfig, Dispatch, TraceEvent, TraceSink};
use crate::result::CubrirResult;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Session-level coverage tracer with named sections
#[derive(Debug)]
pub struct Tracer {
    config: CollectorConfig,
    common: Arc<Collector>,
    current: Arc<Collector>,
    sections: HashMap<String, Arc<Collector>>,
    active_section: Option<String>,
    started: bool,
}

impl Tracer {
    /// Create a stopped tracer; every collector it spawns shares `config`
    #[must_use]
    pub fn new(config: CollectorConfig) -> Self {
        let common = Arc::new(Collector::new(config.clone()));
        Self {
            config,
            current: Arc::clone(&common),
            common,
            sections: HashMap::new(),
            active_section: None,
            started: false,
        }
    }

    /// Start recording into the active collector (idempotent)
    pub fn start(&mut self) {
        if !self.started {
            self.started = true;
            self.current.enable();
        }
    }

    /// Stop recording and close any open section (idempotent)
    pub fn stop(&mut self) {
        if self.started {
            self.started = false;
            self.current.disable();
            self.stop_section();
        }
    }

    /// Route subsequent events to the named section's collector
    ///
    /// Closes the open section first. A name seen before gets its previous
    /// collector back, so a section's lines accumulate across visits.
    pub fn start_section(&mut self, name: &str) {
        self.stop_section();
        debug!(section = name, "starting coverage section");
        let config = self.config.clone();
        let section = self
            .sections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Collector::new(config)));
        self.active_section = Some(name.to_string());
        self.current = Arc::clone(section);
        if self.started {
            self.common.disable();
            self.current.enable();
        }
    }

    /// Close the open section, if any, and fall back to the common collector
    pub fn stop_section(&mut self) {
        if let Some(name) = self.active_section.take() {
            debug!(section = %name, "stopping coverage section");
            self.current.disable();
            self.current = Arc::clone(&self.common);
            if self.started {
                self.common.enable();
            }
        }
    }

    /// Wipe recorded coverage from the common and all section collectors
    ///
    /// Section collectors stay registered under their names; configuration
    /// is untouched.
    pub fn clear(&mut self) -> CubrirResult<()> {
        self.common.clear()?;
        for section in self.sections.values() {
            section.clear()?;
        }
        Ok(())
    }

    /// Whether the tracer is recording
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Name of the open section, if any
    #[must_use]
    pub fn active_section(&self) -> Option<&str> {
        self.active_section.as_deref()
    }

    /// The session-wide collector
    #[must_use]
    pub fn common(&self) -> &Arc<Collector> {
        &self.common
    }

    /// A named section's collector, if that section was ever started
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Arc<Collector>> {
        self.sections.get(name)
    }

    /// Names of all sections seen so far
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}

impl TraceSink for Tracer {
    fn handle_event(&self, event: &TraceEvent) -> Dispatch {
        self.current.handle_event(event)
    }
}
