//! In-memory persistence backend.
//!
//! Keeps the last saved snapshot as JSON text so load goes through the same
//! decode path as file-backed storage.

use super::{decode_snapshot, encode_snapshot, EventPersistence, LoadOutcome, PersistResult};
use crate::model::event::CalendarEvent;

/// Process-local snapshot holder.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    document: Option<String>,
    save_count: usize,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a raw snapshot document, e.g. one read from elsewhere.
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Some(document.into()),
            save_count: 0,
        }
    }

    /// Starts from an encoded copy of `events`.
    pub fn with_events(events: &[CalendarEvent]) -> PersistResult<Self> {
        Ok(Self::with_document(encode_snapshot(events)?))
    }

    /// Last saved snapshot document.
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl EventPersistence for MemoryPersistence {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn load(&self) -> LoadOutcome {
        match self.document.as_deref() {
            Some(document) => decode_snapshot(document),
            None => LoadOutcome::Missing,
        }
    }

    fn save(&mut self, events: &[CalendarEvent]) -> PersistResult<()> {
        self.document = Some(encode_snapshot(events)?);
        self.save_count += 1;
        Ok(())
    }
}
