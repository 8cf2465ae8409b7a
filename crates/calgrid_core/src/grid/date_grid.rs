//! Month/week grid generator and period navigation.
//!
//! # Responsibility
//! - Compute the visible days for a view mode and anchor date.
//! - Compute the anchor reached by next/previous navigation.
//!
//! # Invariants
//! - Every function here is total: any `NaiveDate` yields a full grid.
//!   Anchors within `EDGE_GUARD_DAYS` of chrono's date limits are clamped
//!   inward first.
//! - Grid days are `NaiveDate`, so time-of-day never leaks into grid math.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// Six full weeks; keeps month views the same height for every month.
pub const MONTH_GRID_DAYS: usize = 42;
pub const WEEK_GRID_DAYS: usize = 7;
pub const DEFAULT_WEEK_START: Weekday = Weekday::Sun;

const EDGE_GUARD_DAYS: u64 = 62;

/// Active calendar view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Month,
    Week,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Week => "week",
        }
    }

    /// Parses `month|week`, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "month" => Some(Self::Month),
            "week" => Some(Self::Week),
            _ => None,
        }
    }

    /// Number of days a grid in this mode holds.
    pub fn grid_len(self) -> usize {
        match self {
            Self::Month => MONTH_GRID_DAYS,
            Self::Week => WEEK_GRID_DAYS,
        }
    }
}

/// Returns 42 consecutive days starting on `week_start` on or before the
/// first of `anchor`'s month.
pub fn month_grid(anchor: NaiveDate, week_start: Weekday) -> Vec<NaiveDate> {
    let start = start_of_week(first_of_month(clamp_anchor(anchor)), week_start);
    consecutive_days(start, MONTH_GRID_DAYS)
}

/// Returns the 7 days of the week containing `anchor`.
pub fn week_grid(anchor: NaiveDate, week_start: Weekday) -> Vec<NaiveDate> {
    let start = start_of_week(clamp_anchor(anchor), week_start);
    consecutive_days(start, WEEK_GRID_DAYS)
}

/// Dispatches to `month_grid` or `week_grid`.
pub fn view_grid(anchor: NaiveDate, mode: ViewMode, week_start: Weekday) -> Vec<NaiveDate> {
    match mode {
        ViewMode::Month => month_grid(anchor, week_start),
        ViewMode::Week => week_grid(anchor, week_start),
    }
}

/// First and last day (inclusive) of the grid `view_grid` would return.
pub fn period_range(
    anchor: NaiveDate,
    mode: ViewMode,
    week_start: Weekday,
) -> (NaiveDate, NaiveDate) {
    let anchor = clamp_anchor(anchor);
    let first = match mode {
        ViewMode::Month => start_of_week(first_of_month(anchor), week_start),
        ViewMode::Week => start_of_week(anchor, week_start),
    };
    let span = (mode.grid_len() - 1) as u64;
    let last = first.checked_add_days(Days::new(span)).unwrap_or(first);
    (first, last)
}

/// Latest day on or before `date` that falls on `week_start`.
pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let offset = days_since_week_start(date.weekday(), week_start);
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Anchor reached by "next": first of next month, or one week later.
pub fn next_period(anchor: NaiveDate, mode: ViewMode) -> NaiveDate {
    let anchor = clamp_anchor(anchor);
    let moved = match mode {
        ViewMode::Month => first_of_month(anchor).checked_add_months(Months::new(1)),
        ViewMode::Week => anchor.checked_add_days(Days::new(WEEK_GRID_DAYS as u64)),
    };
    clamp_anchor(moved.unwrap_or(anchor))
}

/// Anchor reached by "previous": first of previous month, or one week earlier.
pub fn previous_period(anchor: NaiveDate, mode: ViewMode) -> NaiveDate {
    let anchor = clamp_anchor(anchor);
    let moved = match mode {
        ViewMode::Month => first_of_month(anchor).checked_sub_months(Months::new(1)),
        ViewMode::Week => anchor.checked_sub_days(Days::new(WEEK_GRID_DAYS as u64)),
    };
    clamp_anchor(moved.unwrap_or(anchor))
}

/// Header text for a period, e.g. `March 2024`.
pub fn month_label(anchor: NaiveDate) -> String {
    anchor.format("%B %Y").to_string()
}

/// Whether two timestamps fall on the same calendar day.
pub fn is_same_day(left: NaiveDateTime, right: NaiveDateTime) -> bool {
    left.date() == right.date()
}

/// Pulls `anchor` away from chrono's date limits so a full grid fits.
pub fn clamp_anchor(anchor: NaiveDate) -> NaiveDate {
    let lower = NaiveDate::MIN
        .checked_add_days(Days::new(EDGE_GUARD_DAYS))
        .unwrap_or(NaiveDate::MIN);
    let upper = NaiveDate::MAX
        .checked_sub_days(Days::new(EDGE_GUARD_DAYS))
        .unwrap_or(NaiveDate::MAX);
    anchor.clamp(lower, upper)
}

fn days_since_week_start(day: Weekday, week_start: Weekday) -> u64 {
    u64::from((day.num_days_from_sunday() + 7 - week_start.num_days_from_sunday()) % 7)
}

fn consecutive_days(start: NaiveDate, len: usize) -> Vec<NaiveDate> {
    start.iter_days().take(len).collect()
}
