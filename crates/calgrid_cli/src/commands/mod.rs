pub mod events;
pub mod grid;

use anyhow::Result;
use calgrid_core::{parse_timestamp, CalendarController, EventPersistence, SystemClock};
use chrono::{NaiveDate, NaiveDateTime};
use clap::Args;

pub type Controller = CalendarController<Box<dyn EventPersistence>, SystemClock>;

/// Event fields shared by `add` and `update`.
#[derive(Args, Debug, Default)]
pub struct EventFields {
    /// Start date/time (e.g. "2024-03-10T09:00")
    #[arg(short, long)]
    pub start: Option<String>,

    /// End date/time (e.g. "2024-03-10T09:30")
    #[arg(short, long)]
    pub end: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Color tag, see `calgrid colors`
    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub category: Option<String>,
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid date '{}', expected YYYY-MM-DD", value))
}

pub fn parse_date_time(value: &str) -> Result<NaiveDateTime> {
    parse_timestamp(value)
        .ok_or_else(|| anyhow::anyhow!("invalid date/time '{}', expected YYYY-MM-DDTHH:MM", value))
}
