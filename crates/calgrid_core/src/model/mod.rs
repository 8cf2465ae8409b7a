//! Calendar domain model.
//!
//! # Responsibility
//! - Define canonical event records and the request shapes that mutate them.
//! - Own the wire format of persisted timestamps.
//!
//! # Invariants
//! - Every stored event is identified by a stable `EventId`.
//! - `end_date > start_date` and a non-blank title hold for every event that
//!   passes `CalendarEvent::validate()`.

pub mod event;
pub mod timestamp;
