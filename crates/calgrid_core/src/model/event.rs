//! Calendar event domain model.
//!
//! # Responsibility
//! - Define the canonical event record owned by the event store.
//! - Define request shapes for create (`NewEvent`), partial update
//!   (`EventPatch`) and editor submissions (`EventDraft`).
//! - Provide day-precision helpers shared by the grid and index layers.
//!
//! # Invariants
//! - `id` is stable and never reused for another event.
//! - `end_date` is strictly later than `start_date`.
//! - `title` is non-empty after trimming.
//! - Deserialization runs the same validation as store writes.

use crate::model::timestamp;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Length given to a draft whose start leaves no room before the end of its day.
pub const DEFAULT_EVENT_LENGTH_MINUTES: i64 = 60;

/// Default display color: first entry of `EVENT_COLOR_PALETTE`.
pub const DEFAULT_EVENT_COLOR: &str = "#3b82f6";

/// One selectable color in the event editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorOption {
    pub label: &'static str,
    pub value: &'static str,
}

/// Fixed color palette offered by the event editor.
pub const EVENT_COLOR_PALETTE: [ColorOption; 5] = [
    ColorOption {
        label: "Blue",
        value: DEFAULT_EVENT_COLOR,
    },
    ColorOption {
        label: "Green",
        value: "#10b981",
    },
    ColorOption {
        label: "Orange",
        value: "#f59e0b",
    },
    ColorOption {
        label: "Red",
        value: "#ef4444",
    },
    ColorOption {
        label: "Purple",
        value: "#8b5cf6",
    },
];

/// Opaque event identifier.
///
/// Store-assigned ids are UUID v4 text, but any non-blank string loaded from
/// persistence is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether this id carries no usable value.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EventId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Validation failures for event writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty after trimming.
    EmptyTitle,
    /// `end` is not strictly after `start`.
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// Candidate id collides with a live event.
    DuplicateId(EventId),
    /// Persisted record carries an empty id.
    BlankId,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
            Self::InvalidRange { start, end } => write!(
                f,
                "end ({}) must be after start ({})",
                timestamp::format_timestamp(end),
                timestamp::format_timestamp(start)
            ),
            Self::DuplicateId(id) => write!(f, "event id already exists: {id}"),
            Self::BlankId => write!(f, "event id must not be blank"),
        }
    }
}

impl Error for ValidationError {}

/// Canonical event record.
///
/// Serialized with camelCase keys and ISO-8601 timestamp strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "CalendarEventRecord")]
pub struct CalendarEvent {
    /// Store-assigned identity, immutable after creation.
    pub id: EventId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(serialize_with = "timestamp::iso8601::serialize")]
    pub start_date: NaiveDateTime,
    /// Strictly later than `start_date`.
    #[serde(serialize_with = "timestamp::iso8601::serialize")]
    pub end_date: NaiveDateTime,
    /// Opaque display tag.
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl CalendarEvent {
    /// Checks record invariants without touching any collection state.
    ///
    /// Errors are reported in editor order: title first, then time range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_blank() {
            return Err(ValidationError::BlankId);
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.end_date <= self.start_date {
            return Err(ValidationError::InvalidRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Calendar day the event starts on.
    pub fn start_day(&self) -> NaiveDate {
        self.start_date.date()
    }

    /// Calendar day the event ends on.
    pub fn end_day(&self) -> NaiveDate {
        self.end_date.date()
    }

    /// Day-precision overlap: `start_day <= day <= end_day`.
    pub fn covers_day(&self, day: NaiveDate) -> bool {
        self.start_day() <= day && day <= self.end_day()
    }

    pub fn duration(&self) -> Duration {
        self.end_date - self.start_date
    }

    /// Trims text fields and fills the default color.
    pub(crate) fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.description = normalize_optional_text(self.description);
        self.category = normalize_optional_text(self.category);
        self.color = normalize_color(Some(self.color));
        self
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarEventRecord {
    id: EventId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(deserialize_with = "timestamp::iso8601::deserialize")]
    start_date: NaiveDateTime,
    #[serde(deserialize_with = "timestamp::iso8601::deserialize")]
    end_date: NaiveDateTime,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

impl TryFrom<CalendarEventRecord> for CalendarEvent {
    type Error = ValidationError;

    fn try_from(record: CalendarEventRecord) -> Result<Self, Self::Error> {
        let event = CalendarEvent {
            id: record.id,
            title: record.title,
            description: record.description,
            start_date: record.start_date,
            end_date: record.end_date,
            color: normalize_color(record.color),
            category: record.category,
        }
        .normalized();
        event.validate()?;
        Ok(event)
    }
}

/// Candidate for `EventStore::add`.
///
/// A missing or blank `id` asks the store to assign a fresh one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub id: Option<EventId>,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    /// `None` falls back to `DEFAULT_EVENT_COLOR`.
    pub color: Option<String>,
    pub category: Option<String>,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            start_date,
            end_date,
            color: None,
            category: None,
        }
    }

    /// Builds the record the store would commit under `id`.
    pub(crate) fn into_event(self, id: EventId) -> CalendarEvent {
        CalendarEvent {
            id,
            title: self.title,
            description: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            color: normalize_color(self.color),
            category: self.category,
        }
        .normalized()
    }
}

/// Field-by-field partial update.
///
/// `None` leaves an attribute unchanged. For clearable attributes,
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub color: Option<String>,
    pub category: Option<Option<String>>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Returns a merged copy of `event`; `id` is never patched.
    pub fn apply_to(&self, event: &CalendarEvent) -> CalendarEvent {
        let mut merged = event.clone();
        if let Some(title) = &self.title {
            merged.title = title.clone();
        }
        if let Some(description) = &self.description {
            merged.description = description.clone();
        }
        if let Some(start_date) = self.start_date {
            merged.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            merged.end_date = end_date;
        }
        if let Some(color) = &self.color {
            merged.color = color.clone();
        }
        if let Some(category) = &self.category {
            merged.category = category.clone();
        }
        merged.normalized()
    }
}

/// Editor dialog submission.
///
/// Times are optional: a draft saved while creating on a date is bound to
/// that date, and a draft saved while editing keeps the stored times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub color: Option<String>,
    pub category: Option<String>,
}

impl EventDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets explicit start and end times.
    pub fn with_times(mut self, start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        self.start_date = Some(start_date);
        self.end_date = Some(end_date);
        self
    }

    /// Prefills the editor for an existing event.
    pub fn from_event(event: &CalendarEvent) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            start_date: Some(event.start_date),
            end_date: Some(event.end_date),
            color: Some(event.color.clone()),
            category: event.category.clone(),
        }
    }

    /// Binds missing times to `date` and produces a create candidate.
    ///
    /// - Missing start: `date` at 00:00:00.
    /// - Missing end: 23:59:59 on the start's day, or `DEFAULT_EVENT_LENGTH_MINUTES`
    ///   after the start when the start is already that late.
    pub fn bind_to_date(self, date: NaiveDate) -> NewEvent {
        let start_date = self
            .start_date
            .unwrap_or_else(|| date.and_time(NaiveTime::default()));
        let end_date = self.end_date.unwrap_or_else(|| default_end(start_date));
        NewEvent {
            id: None,
            title: self.title,
            description: self.description,
            start_date,
            end_date,
            color: self.color,
            category: self.category,
        }
    }

    /// Converts an edit submission into a patch.
    ///
    /// Text fields replace stored values (a blank description clears it);
    /// times and color change only when the draft carries them.
    pub fn into_patch(self) -> EventPatch {
        EventPatch {
            title: Some(self.title),
            description: Some(self.description),
            start_date: self.start_date,
            end_date: self.end_date,
            color: self.color,
            category: Some(self.category),
        }
    }
}

fn last_second_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default()
}

fn default_end(start_date: NaiveDateTime) -> NaiveDateTime {
    let end_of_day = start_date.date().and_time(last_second_of_day());
    if end_of_day > start_date {
        return end_of_day;
    }
    start_date
        .checked_add_signed(Duration::minutes(DEFAULT_EVENT_LENGTH_MINUTES))
        .unwrap_or(end_of_day)
}

fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn normalize_color(value: Option<String>) -> String {
    normalize_optional_text(value).unwrap_or_else(|| DEFAULT_EVENT_COLOR.to_string())
}
