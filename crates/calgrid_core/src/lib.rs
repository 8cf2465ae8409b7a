//! Core calendar logic for calgrid.
//! This crate is the single source of truth for event invariants, grid
//! layout and editor selection state; it performs no UI work.

pub mod clock;
pub mod config;
pub mod db;
pub mod grid;
pub mod index;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{parse_week_start, CalendarConfig};
pub use grid::date_grid::{
    is_same_day, month_grid, month_label, next_period, period_range, previous_period,
    start_of_week, view_grid, week_grid, ViewMode, DEFAULT_WEEK_START, MONTH_GRID_DAYS,
    WEEK_GRID_DAYS,
};
pub use index::day_index::{events_in_range, events_on_date};
pub use logging::{default_log_level, init_logging, init_logging_with, logging_status, LogSettings};
pub use model::event::{
    CalendarEvent, ColorOption, EventDraft, EventId, EventPatch, NewEvent, ValidationError,
    DEFAULT_EVENT_COLOR, DEFAULT_EVENT_LENGTH_MINUTES, EVENT_COLOR_PALETTE,
};
pub use model::timestamp::{format_timestamp, parse_timestamp};
pub use persist::{
    EventPersistence, JsonFilePersistence, LoadOutcome, MemoryPersistence, PersistError,
    PersistResult, SqlitePersistence,
};
pub use service::calendar_controller::{CalendarController, CellView, CommandError, Selection};
pub use store::event_store::{EventStore, LoadReport, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
