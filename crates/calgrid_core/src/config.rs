//! View configuration shared by calendar front ends.
//!
//! # Invariants
//! - Every field has a default, so an empty config document is valid.

use crate::grid::date_grid::{ViewMode, DEFAULT_WEEK_START};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Calendar view settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// First column of every grid. Accepts `sun`, `Monday`, etc.
    pub week_start: Weekday,
    /// View shown when the calendar opens.
    pub initial_view: ViewMode,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            week_start: DEFAULT_WEEK_START,
            initial_view: ViewMode::Month,
        }
    }
}

/// Parses a weekday name or abbreviation, case-insensitive.
pub fn parse_week_start(value: &str) -> Option<Weekday> {
    value.trim().parse::<Weekday>().ok()
}
