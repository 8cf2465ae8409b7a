//! Persistence collaborator contract and implementations.
//!
//! # Responsibility
//! - Define the load/save capability the event store writes through to.
//! - Provide in-memory, JSON-file and SQLite backends.
//!
//! # Invariants
//! - `save` always receives the full collection in store order.
//! - `load` never fails hard: unreadable data is reported as
//!   `LoadOutcome::Corrupt`, absent data as `LoadOutcome::Missing`.
//! - Backends never partially recover a corrupt snapshot.

use crate::db::DbError;
use crate::model::event::CalendarEvent;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod json_file;
pub mod memory;
pub mod sqlite;

pub use json_file::JsonFilePersistence;
pub use memory::MemoryPersistence;
pub use sqlite::SqlitePersistence;

pub type PersistResult<T> = Result<T, PersistError>;

/// Result of reading a persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A well-formed snapshot, possibly empty.
    Loaded(Vec<CalendarEvent>),
    /// Nothing has been saved yet.
    Missing,
    /// Data exists but cannot be trusted; carries a diagnostic reason.
    Corrupt(String),
}

/// Write-side failures reported by persistence backends.
#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
    Db(DbError),
    /// The backend cannot accept writes; carries the reason it was disabled.
    Unavailable(String),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "persistence io error: {err}"),
            Self::Serialize(err) => write!(f, "persistence serialization error: {err}"),
            Self::Db(err) => write!(f, "persistence database error: {err}"),
            Self::Unavailable(reason) => write!(f, "persistence unavailable: {reason}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<DbError> for PersistError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable storage for the event collection.
///
/// The core never performs I/O itself; it calls `save` after every committed
/// mutation and ignores (logs) failures.
pub trait EventPersistence {
    /// Stable backend name used in log lines.
    fn backend_name(&self) -> &'static str;
    fn load(&self) -> LoadOutcome;
    fn save(&mut self, events: &[CalendarEvent]) -> PersistResult<()>;
}

impl<P: EventPersistence + ?Sized> EventPersistence for Box<P> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn load(&self) -> LoadOutcome {
        (**self).load()
    }

    fn save(&mut self, events: &[CalendarEvent]) -> PersistResult<()> {
        (**self).save(events)
    }
}

/// Decodes a JSON snapshot document.
///
/// Blank documents count as `Missing`; any parse or validation failure
/// discards the whole document.
pub fn decode_snapshot(document: &str) -> LoadOutcome {
    if document.trim().is_empty() {
        return LoadOutcome::Missing;
    }
    match serde_json::from_str::<Vec<CalendarEvent>>(document) {
        Ok(events) => LoadOutcome::Loaded(events),
        Err(err) => LoadOutcome::Corrupt(format!("invalid event snapshot: {err}")),
    }
}

/// Encodes the collection as a pretty-printed JSON array.
pub fn encode_snapshot(events: &[CalendarEvent]) -> PersistResult<String> {
    Ok(serde_json::to_string_pretty(events)?)
}
