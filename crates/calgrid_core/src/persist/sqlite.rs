//! SQLite persistence backend.
//!
//! # Responsibility
//! - Store the collection as rows of `calendar_events`, one per event.
//! - Keep store order through the `position` column.
//!
//! # Invariants
//! - Each `save` replaces the whole snapshot inside one transaction.
//! - `snapshot_meta` is written by every save; its absence means nothing was
//!   saved yet, and a count mismatch marks the snapshot corrupt.
//! - Read paths reject invalid rows instead of masking them.
//! - A file that cannot be read as a calendar database is never written to.

use super::{EventPersistence, LoadOutcome, PersistError, PersistResult};
use crate::db::migrations::apply_migrations;
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::event::{CalendarEvent, EventId};
use crate::model::timestamp::{format_timestamp, parse_timestamp};
use chrono::Utc;
use log::{info, warn};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::time::Instant;

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    start_date,
    end_date,
    color,
    category
FROM calendar_events
ORDER BY position ASC";

const EVENT_INSERT_SQL: &str = "INSERT INTO calendar_events (
    id,
    position,
    title,
    description,
    start_date,
    end_date,
    color,
    category
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);";

enum Backing {
    Ready(Connection),
    /// The file exists but is not a calendar database this build can read.
    Unreadable(String),
}

/// SQLite-backed snapshot store.
pub struct SqlitePersistence {
    backing: Backing,
}

impl SqlitePersistence {
    /// Opens or creates a database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self {
            backing: Backing::Ready(open_db(path)?),
        })
    }

    /// Like `open`, but a file that is not a database, is corrupt, or has a
    /// newer schema yields a backend that loads as `Corrupt` and refuses
    /// saves. The file is left untouched.
    ///
    /// # Errors
    /// Only failures unrelated to the file contents (e.g. the parent
    /// directory cannot be created).
    pub fn open_or_unreadable(path: impl AsRef<Path>) -> DbResult<Self> {
        match open_db(path) {
            Ok(conn) => Ok(Self {
                backing: Backing::Ready(conn),
            }),
            Err(err) if err.is_unreadable_file() => {
                warn!(
                    "event=db_open module=persist backend=sqlite status=degraded error_code=unreadable_file error={err}"
                );
                Ok(Self {
                    backing: Backing::Unreadable(format!("unreadable calendar database: {err}")),
                })
            }
            Err(err) => Err(err),
        }
    }

    pub fn in_memory() -> DbResult<Self> {
        Ok(Self {
            backing: Backing::Ready(open_db_in_memory()?),
        })
    }

    /// Wraps an existing connection, applying pending migrations first.
    pub fn try_new(mut conn: Connection) -> DbResult<Self> {
        apply_migrations(&mut conn)?;
        Ok(Self {
            backing: Backing::Ready(conn),
        })
    }

    /// Live connection, or `None` when the file was unreadable.
    pub fn connection(&self) -> Option<&Connection> {
        match &self.backing {
            Backing::Ready(conn) => Some(conn),
            Backing::Unreadable(_) => None,
        }
    }

    fn read_snapshot(conn: &Connection) -> Result<Option<Vec<CalendarEvent>>, String> {
        let expected: Option<i64> = conn
            .query_row("SELECT event_count FROM snapshot_meta WHERE singleton = 1;", [], |row| {
                row.get(0)
            })
            .map(Some)
            .or_else(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })
            .map_err(|err| format!("failed to read snapshot_meta: {err}"))?;

        let Some(expected) = expected else {
            return Ok(None);
        };

        let mut stmt = conn
            .prepare(EVENT_SELECT_SQL)
            .map_err(|err| format!("failed to prepare event query: {err}"))?;
        let mut rows = stmt
            .query([])
            .map_err(|err| format!("failed to query events: {err}"))?;

        let mut events = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|err| format!("failed to read event row: {err}"))?
        {
            events.push(parse_event_row(row)?);
        }

        if i64::try_from(events.len()).ok() != Some(expected) {
            return Err(format!(
                "snapshot_meta expects {expected} events but {} rows exist",
                events.len()
            ));
        }

        Ok(Some(events))
    }
}

impl EventPersistence for SqlitePersistence {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn load(&self) -> LoadOutcome {
        let conn = match &self.backing {
            Backing::Ready(conn) => conn,
            Backing::Unreadable(reason) => return LoadOutcome::Corrupt(reason.clone()),
        };
        match Self::read_snapshot(conn) {
            Ok(Some(events)) => LoadOutcome::Loaded(events),
            Ok(None) => LoadOutcome::Missing,
            Err(reason) => LoadOutcome::Corrupt(reason),
        }
    }

    fn save(&mut self, events: &[CalendarEvent]) -> PersistResult<()> {
        let conn = match &mut self.backing {
            Backing::Ready(conn) => conn,
            Backing::Unreadable(reason) => return Err(PersistError::Unavailable(reason.clone())),
        };
        let started_at = Instant::now();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM calendar_events;", [])?;
        {
            let mut stmt = tx.prepare(EVENT_INSERT_SQL)?;
            for (position, event) in events.iter().enumerate() {
                stmt.execute(params![
                    event.id.as_str(),
                    i64::try_from(position).unwrap_or(i64::MAX),
                    event.title.as_str(),
                    event.description.as_deref(),
                    format_timestamp(&event.start_date),
                    format_timestamp(&event.end_date),
                    event.color.as_str(),
                    event.category.as_deref(),
                ])?;
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO snapshot_meta (singleton, saved_at, event_count)
             VALUES (1, ?1, ?2);",
            params![
                Utc::now().to_rfc3339(),
                i64::try_from(events.len()).unwrap_or(i64::MAX)
            ],
        )?;
        tx.commit()?;

        info!(
            "event=snapshot_save module=persist backend=sqlite status=ok count={} duration_ms={}",
            events.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn parse_event_row(row: &Row<'_>) -> Result<CalendarEvent, String> {
    let id: String = row
        .get("id")
        .map_err(|err| format!("invalid calendar_events.id: {err}"))?;

    let read_text = |column: &str| -> Result<String, String> {
        row.get::<_, String>(column)
            .map_err(|err| format!("invalid calendar_events.{column} for `{id}`: {err}"))
    };
    let read_optional = |column: &str| -> Result<Option<String>, String> {
        row.get::<_, Option<String>>(column)
            .map_err(|err| format!("invalid calendar_events.{column} for `{id}`: {err}"))
    };
    let read_timestamp = |column: &str| -> Result<_, String> {
        let raw = read_text(column)?;
        parse_timestamp(&raw).ok_or_else(|| {
            format!("invalid timestamp `{raw}` in calendar_events.{column} for `{id}`")
        })
    };

    let event = CalendarEvent {
        title: read_text("title")?,
        description: read_optional("description")?,
        start_date: read_timestamp("start_date")?,
        end_date: read_timestamp("end_date")?,
        color: read_text("color")?,
        category: read_optional("category")?,
        id: EventId::new(id.clone()),
    };
    event
        .validate()
        .map_err(|err| format!("invalid persisted event `{id}`: {err}"))?;
    Ok(event)
}
