//! Selection and view state machine over the event store.
//!
//! # Responsibility
//! - Track the anchor date, the active view mode and the modal selection.
//! - Route editor commands (save, delete, cancel) to the event store.
//! - Build per-cell views for the current grid.
//!
//! # Invariants
//! - Exactly one `Selection` is active; opening a new one discards the old.
//! - A failed command leaves the selection and the store unchanged.
//! - Navigation changes only the anchor, never the selection.

use crate::clock::Clock;
use crate::config::CalendarConfig;
use crate::grid::date_grid::{
    self, month_label, next_period, period_range, previous_period, view_grid, ViewMode,
};
use crate::index::day_index::{events_in_range, events_on_date};
use crate::model::event::{CalendarEvent, EventDraft, EventId, DEFAULT_EVENT_COLOR};
use crate::persist::EventPersistence;
use crate::store::event_store::{EventStore, StoreError};
use chrono::{Datelike, NaiveDate, Weekday};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Modal editor state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Closed,
    /// Creating a new event on this day.
    CreatingOn(NaiveDate),
    /// Editing an existing event.
    Editing(EventId),
}

impl Selection {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn creating_on(&self) -> Option<NaiveDate> {
        match self {
            Self::CreatingOn(date) => Some(*date),
            _ => None,
        }
    }

    pub fn editing(&self) -> Option<&EventId> {
        match self {
            Self::Editing(id) => Some(id),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::CreatingOn(_) => "creating_on",
            Self::Editing(_) => "editing",
        }
    }
}

/// Failures of controller commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Store(StoreError),
    /// `save_draft` while no selection is open.
    NoActiveSelection,
    /// `delete_selected` while not editing an event.
    NoEventSelected,
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::NoActiveSelection => write!(f, "no date or event is selected"),
            Self::NoEventSelected => write!(f, "no event is selected"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for CommandError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// One rendered grid cell; computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView<'a> {
    pub date: NaiveDate,
    pub is_today: bool,
    /// The editor is creating an event on this day.
    pub is_selected: bool,
    /// `false` for leading/trailing days of a month grid.
    pub in_current_period: bool,
    pub events: Vec<&'a CalendarEvent>,
}

/// UI-facing calendar state machine.
pub struct CalendarController<P: EventPersistence, C: Clock> {
    store: EventStore<P>,
    clock: C,
    config: CalendarConfig,
    anchor: NaiveDate,
    view_mode: ViewMode,
    selection: Selection,
}

impl<P: EventPersistence, C: Clock> CalendarController<P, C> {
    /// Starts on today's date in the configured initial view.
    pub fn new(store: EventStore<P>, clock: C, config: CalendarConfig) -> Self {
        let anchor = clock.today();
        Self {
            store,
            clock,
            config,
            anchor,
            view_mode: config.initial_view,
            selection: Selection::Closed,
        }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn week_start(&self) -> Weekday {
        self.config.week_start
    }

    pub fn store(&self) -> &EventStore<P> {
        &self.store
    }

    pub fn into_store(self) -> EventStore<P> {
        self.store
    }

    /// Cells of the current view, each with its day's events.
    pub fn current_grid(&self) -> Vec<CellView<'_>> {
        let today = self.clock.today();
        let selected_day = self.selection.creating_on();
        let events = self.store.events();

        view_grid(self.anchor, self.view_mode, self.config.week_start)
            .into_iter()
            .map(|date| CellView {
                date,
                is_today: date == today,
                is_selected: selected_day == Some(date),
                in_current_period: self.in_current_period(date),
                events: events_on_date(events, date),
            })
            .collect()
    }

    /// Events covering `date`, in store order.
    pub fn events_for_cell(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        events_on_date(self.store.events(), date)
    }

    /// First and last day of the current grid.
    pub fn visible_range(&self) -> (NaiveDate, NaiveDate) {
        period_range(self.anchor, self.view_mode, self.config.week_start)
    }

    /// Events touching any day of the current grid.
    pub fn visible_events(&self) -> Vec<&CalendarEvent> {
        let (first, last) = self.visible_range();
        events_in_range(self.store.events(), first, last)
    }

    /// Header text, e.g. `March 2024`.
    pub fn period_label(&self) -> String {
        month_label(self.anchor)
    }

    /// Event behind an `Editing` selection.
    pub fn selected_event(&self) -> Option<&CalendarEvent> {
        self.selection.editing().and_then(|id| self.store.get(id))
    }

    /// Initial editor contents for the open selection.
    pub fn draft_for_selection(&self) -> Option<EventDraft> {
        match &self.selection {
            Selection::Closed => None,
            Selection::CreatingOn(_) => Some(EventDraft {
                color: Some(DEFAULT_EVENT_COLOR.to_string()),
                ..EventDraft::default()
            }),
            Selection::Editing(id) => self.store.get(id).map(EventDraft::from_event),
        }
    }

    /// Opens the editor to create an event on `date`.
    pub fn select_date(&mut self, date: NaiveDate) {
        self.transition(Selection::CreatingOn(date));
    }

    /// Opens the editor on an existing event, discarding any pending creation.
    pub fn select_event(&mut self, id: &EventId) -> Result<(), CommandError> {
        if !self.store.contains(id) {
            return Err(StoreError::NotFound(id.clone()).into());
        }
        self.transition(Selection::Editing(id.clone()));
        Ok(())
    }

    /// Saves the editor contents and closes the selection.
    ///
    /// - `CreatingOn(date)`: adds an event, binding missing times to `date`.
    /// - `Editing(id)`: updates that event from the draft.
    pub fn save_draft(&mut self, draft: EventDraft) -> Result<CalendarEvent, CommandError> {
        let saved = match &self.selection {
            Selection::Closed => return Err(CommandError::NoActiveSelection),
            Selection::CreatingOn(date) => self.store.add(draft.bind_to_date(*date))?,
            Selection::Editing(id) => {
                let id = id.clone();
                self.store.update(&id, &draft.into_patch())?
            }
        };
        self.transition(Selection::Closed);
        Ok(saved)
    }

    /// Deletes the event being edited and closes the selection.
    pub fn delete_selected(&mut self) -> Result<EventId, CommandError> {
        let Some(id) = self.selection.editing().cloned() else {
            return Err(CommandError::NoEventSelected);
        };
        self.store.delete(&id)?;
        self.transition(Selection::Closed);
        Ok(id)
    }

    /// Closes the editor without touching the store.
    pub fn cancel_selection(&mut self) {
        self.transition(Selection::Closed);
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn set_anchor(&mut self, anchor: NaiveDate) {
        self.anchor = date_grid::clamp_anchor(anchor);
    }

    pub fn go_to_next(&mut self) {
        self.anchor = next_period(self.anchor, self.view_mode);
    }

    pub fn go_to_previous(&mut self) {
        self.anchor = previous_period(self.anchor, self.view_mode);
    }

    pub fn go_to_today(&mut self) {
        self.set_anchor(self.clock.today());
    }

    fn in_current_period(&self, date: NaiveDate) -> bool {
        match self.view_mode {
            ViewMode::Month => {
                date.year() == self.anchor.year() && date.month() == self.anchor.month()
            }
            ViewMode::Week => true,
        }
    }

    fn transition(&mut self, next: Selection) {
        debug!(
            "event=selection_change module=controller from={} to={}",
            self.selection.kind(),
            next.kind()
        );
        self.selection = next;
    }
}
