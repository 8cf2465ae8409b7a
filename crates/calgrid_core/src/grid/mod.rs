//! Date grid generation for month and week views.
//!
//! # Responsibility
//! - Produce fixed-size, contiguous runs of calendar days for a view.
//! - Stay pure: no clock access, no event knowledge.
//!
//! # Invariants
//! - Month grids always hold `MONTH_GRID_DAYS` days (six full weeks).
//! - Week grids always hold `WEEK_GRID_DAYS` days.
//! - The first day of every grid falls on the configured week start.

pub mod date_grid;
