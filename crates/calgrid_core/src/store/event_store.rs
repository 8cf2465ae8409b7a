//! Validated CRUD over the in-memory event collection.
//!
//! # Responsibility
//! - Assign ids, validate writes and keep insertion order.
//! - Notify the persistence collaborator after each committed mutation.
//! - Classify the startup load so callers can tell "no data" from
//!   "discarded corrupt data".
//!
//! # Invariants
//! - `add` appends at the end; `update` replaces in place; `delete` keeps the
//!   relative order of the remaining events.
//! - Unknown ids are reported as `StoreError::NotFound`, including a second
//!   delete of the same id.

use crate::model::event::{CalendarEvent, EventId, EventPatch, NewEvent, ValidationError};
use crate::persist::{EventPersistence, LoadOutcome};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Command failures surfaced to store callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(ValidationError),
    NotFound(EventId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "event not found: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// How the startup load went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    /// A valid snapshot was restored.
    Restored { count: usize },
    /// Nothing was persisted yet.
    Empty,
    /// Persisted data was unusable and has been ignored.
    Discarded { reason: String },
}

/// Owner of the canonical event collection.
pub struct EventStore<P: EventPersistence> {
    events: Vec<CalendarEvent>,
    persistence: P,
    load_report: LoadReport,
}

impl<P: EventPersistence> EventStore<P> {
    /// Loads the persisted collection and takes ownership of `persistence`.
    ///
    /// Corrupt snapshots (unparseable, invalid records, duplicate ids) are
    /// dropped entirely and the store starts empty.
    pub fn open(persistence: P) -> Self {
        let backend = persistence.backend_name();
        let (events, load_report) = match persistence.load() {
            LoadOutcome::Loaded(events) => match check_snapshot(&events) {
                Ok(()) => {
                    let count = events.len();
                    (events, LoadReport::Restored { count })
                }
                Err(reason) => (Vec::new(), LoadReport::Discarded { reason }),
            },
            LoadOutcome::Missing => (Vec::new(), LoadReport::Empty),
            LoadOutcome::Corrupt(reason) => (Vec::new(), LoadReport::Discarded { reason }),
        };

        match &load_report {
            LoadReport::Restored { count } => info!(
                "event=store_open module=store status=ok backend={backend} source=snapshot count={count}"
            ),
            LoadReport::Empty => {
                info!("event=store_open module=store status=ok backend={backend} source=empty")
            }
            LoadReport::Discarded { reason } => warn!(
                "event=store_open module=store status=degraded backend={backend} source=discarded reason={reason}"
            ),
        }

        Self {
            events,
            persistence,
            load_report,
        }
    }

    /// Validates and appends a new event.
    ///
    /// A missing or blank candidate id gets a fresh one.
    pub fn add(&mut self, candidate: NewEvent) -> StoreResult<CalendarEvent> {
        let id = match candidate.id.as_ref().filter(|id| !id.is_blank()) {
            Some(id) => id.clone(),
            None => self.fresh_id(),
        };
        let event = candidate.into_event(id);

        if let Err(err) = self.check_insert(&event) {
            debug!(
                "event=event_add module=store status=rejected error_code={}",
                validation_code(&err)
            );
            return Err(err.into());
        }

        self.events.push(event.clone());
        info!(
            "event=event_add module=store status=ok event_id={} count={}",
            event.id,
            self.events.len()
        );
        self.write_through("add");
        Ok(event)
    }

    /// Merges `patch` onto the event addressed by `id`.
    ///
    /// The merged record is validated before commit; on failure the stored
    /// event is untouched.
    pub fn update(&mut self, id: &EventId, patch: &EventPatch) -> StoreResult<CalendarEvent> {
        let Some(index) = self.position(id) else {
            debug!("event=event_update module=store status=rejected error_code=not_found event_id={id}");
            return Err(StoreError::NotFound(id.clone()));
        };

        let merged = patch.apply_to(&self.events[index]);
        if let Err(err) = merged.validate() {
            debug!(
                "event=event_update module=store status=rejected error_code={} event_id={id}",
                validation_code(&err)
            );
            return Err(err.into());
        }

        self.events[index] = merged.clone();
        info!("event=event_update module=store status=ok event_id={id}");
        self.write_through("update");
        Ok(merged)
    }

    /// Removes the event addressed by `id`.
    pub fn delete(&mut self, id: &EventId) -> StoreResult<()> {
        let Some(index) = self.position(id) else {
            debug!("event=event_delete module=store status=rejected error_code=not_found event_id={id}");
            return Err(StoreError::NotFound(id.clone()));
        };

        self.events.remove(index);
        info!(
            "event=event_delete module=store status=ok event_id={id} count={}",
            self.events.len()
        );
        self.write_through("delete");
        Ok(())
    }

    /// Live collection in insertion order.
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn get(&self, id: &EventId) -> Option<&CalendarEvent> {
        self.events.iter().find(|event| &event.id == id)
    }

    pub fn contains(&self, id: &EventId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Releases the persistence collaborator, dropping the in-memory copy.
    pub fn into_persistence(self) -> P {
        self.persistence
    }

    fn position(&self, id: &EventId) -> Option<usize> {
        self.events.iter().position(|event| &event.id == id)
    }

    fn fresh_id(&self) -> EventId {
        loop {
            let id = EventId::generate();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    fn check_insert(&self, event: &CalendarEvent) -> Result<(), ValidationError> {
        event.validate()?;
        if self.contains(&event.id) {
            return Err(ValidationError::DuplicateId(event.id.clone()));
        }
        Ok(())
    }

    fn write_through(&mut self, operation: &'static str) {
        if let Err(err) = self.persistence.save(&self.events) {
            warn!(
                "event=store_persist module=store status=error operation={operation} backend={} error={err}",
                self.persistence.backend_name()
            );
        }
    }
}

fn check_snapshot(events: &[CalendarEvent]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(events.len());
    for event in events {
        event
            .validate()
            .map_err(|err| format!("invalid event `{}`: {err}", event.id))?;
        if !seen.insert(&event.id) {
            return Err(format!("duplicate event id `{}`", event.id));
        }
    }
    Ok(())
}

fn validation_code(err: &ValidationError) -> &'static str {
    match err {
        ValidationError::EmptyTitle => "empty_title",
        ValidationError::InvalidRange { .. } => "invalid_range",
        ValidationError::DuplicateId(_) => "duplicate_id",
        ValidationError::BlankId => "blank_id",
    }
}
