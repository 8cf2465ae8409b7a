use calgrid_core::{
    CalendarConfig, CalendarController, CommandError, EventDraft, EventId, EventStore,
    FixedClock, MemoryPersistence, NewEvent, Selection, StoreError, ValidationError, ViewMode,
    DEFAULT_EVENT_COLOR,
};
use chrono::{NaiveDate, NaiveDateTime, Weekday};

type Controller = CalendarController<MemoryPersistence, FixedClock>;

#[test]
fn starts_closed_on_today_in_configured_view() {
    let config = CalendarConfig {
        week_start: Weekday::Mon,
        initial_view: ViewMode::Week,
    };
    let controller = CalendarController::new(
        EventStore::open(MemoryPersistence::new()),
        FixedClock(date(2024, 3, 13)),
        config,
    );

    assert_eq!(controller.selection(), &Selection::Closed);
    assert_eq!(controller.anchor(), date(2024, 3, 13));
    assert_eq!(controller.view_mode(), ViewMode::Week);
    assert_eq!(controller.week_start(), Weekday::Mon);
    assert_eq!(controller.visible_range(), (date(2024, 3, 11), date(2024, 3, 17)));
}

#[test]
fn select_date_then_save_creates_event_and_closes() {
    let mut controller = controller();
    controller.select_date(date(2024, 3, 10));
    assert_eq!(controller.selection(), &Selection::CreatingOn(date(2024, 3, 10)));

    let draft = EventDraft::new("Standup").with_times(at(2024, 3, 10, 9, 0), at(2024, 3, 10, 9, 30));
    let created = controller.save_draft(draft).unwrap();

    assert_eq!(controller.selection(), &Selection::Closed);
    assert_eq!(controller.store().len(), 1);
    assert_eq!(controller.events_for_cell(date(2024, 3, 10)), vec![&created]);
}

#[test]
fn creating_without_times_binds_to_selected_day() {
    let mut controller = controller();
    controller.select_date(date(2024, 3, 20));

    let created = controller.save_draft(EventDraft::new("All day")).unwrap();

    assert_eq!(created.start_date, at(2024, 3, 20, 0, 0));
    assert_eq!(created.end_date, date(2024, 3, 20).and_hms_opt(23, 59, 59).unwrap());
}

#[test]
fn creating_with_late_start_only_still_saves() {
    let mut controller = controller();
    controller.select_date(date(2024, 3, 10));

    let mut draft = EventDraft::new("Midnight deploy");
    draft.start_date = Some(date(2024, 3, 10).and_hms_opt(23, 59, 59).unwrap());
    let created = controller.save_draft(draft).unwrap();

    assert!(created.end_date > created.start_date);
    assert_eq!(controller.selection(), &Selection::Closed);
    assert_eq!(controller.events_for_cell(date(2024, 3, 11)), vec![&created]);
}

#[test]
fn failed_save_keeps_selection_open() {
    let mut controller = controller();
    controller.select_date(date(2024, 3, 10));

    let err = controller.save_draft(EventDraft::new("  ")).unwrap_err();

    assert_eq!(
        err,
        CommandError::Store(StoreError::Validation(ValidationError::EmptyTitle))
    );
    assert_eq!(controller.selection(), &Selection::CreatingOn(date(2024, 3, 10)));
    assert!(controller.store().is_empty());
}

#[test]
fn save_without_selection_is_rejected() {
    let mut controller = controller();

    let err = controller.save_draft(EventDraft::new("Orphan")).unwrap_err();

    assert_eq!(err, CommandError::NoActiveSelection);
    assert!(controller.store().is_empty());
}

#[test]
fn editing_updates_event_and_closes() {
    let (mut controller, id) = controller_with_standup();
    controller.select_event(&id).unwrap();
    assert_eq!(controller.selection(), &Selection::Editing(id.clone()));

    let mut draft = controller.draft_for_selection().unwrap();
    draft.title = "Standup (remote)".to_string();
    draft.color = Some("#10b981".to_string());
    let updated = controller.save_draft(draft).unwrap();

    assert_eq!(updated.id, id);
    assert_eq!(updated.title, "Standup (remote)");
    assert_eq!(updated.color, "#10b981");
    assert_eq!(updated.start_date, at(2024, 3, 10, 9, 0));
    assert_eq!(controller.selection(), &Selection::Closed);
}

#[test]
fn failed_edit_keeps_selection_and_event() {
    let (mut controller, id) = controller_with_standup();
    let before = controller.store().get(&id).cloned().unwrap();
    controller.select_event(&id).unwrap();

    let mut draft = controller.draft_for_selection().unwrap();
    draft.end_date = Some(at(2024, 3, 10, 8, 0));
    let err = controller.save_draft(draft).unwrap_err();

    assert!(matches!(
        err,
        CommandError::Store(StoreError::Validation(ValidationError::InvalidRange { .. }))
    ));
    assert_eq!(controller.selection(), &Selection::Editing(id.clone()));
    assert_eq!(controller.store().get(&id), Some(&before));
}

#[test]
fn selecting_unknown_event_is_rejected() {
    let mut controller = controller();
    controller.select_date(date(2024, 3, 10));

    let missing = EventId::from("missing");
    let err = controller.select_event(&missing).unwrap_err();

    assert_eq!(err, CommandError::Store(StoreError::NotFound(missing)));
    assert_eq!(controller.selection(), &Selection::CreatingOn(date(2024, 3, 10)));
}

#[test]
fn selecting_event_replaces_pending_creation() {
    let (mut controller, id) = controller_with_standup();
    controller.select_date(date(2024, 3, 12));

    controller.select_event(&id).unwrap();

    assert_eq!(controller.selection(), &Selection::Editing(id));
}

#[test]
fn selecting_date_replaces_editing() {
    let (mut controller, id) = controller_with_standup();
    controller.select_event(&id).unwrap();

    controller.select_date(date(2024, 3, 12));

    assert_eq!(controller.selection(), &Selection::CreatingOn(date(2024, 3, 12)));
}

#[test]
fn delete_selected_removes_event_and_closes() {
    let (mut controller, id) = controller_with_standup();
    controller.select_event(&id).unwrap();

    let deleted = controller.delete_selected().unwrap();

    assert_eq!(deleted, id);
    assert_eq!(controller.selection(), &Selection::Closed);
    assert!(controller.store().is_empty());
    assert!(controller.events_for_cell(date(2024, 3, 10)).is_empty());
}

#[test]
fn delete_requires_editing_selection() {
    let (mut controller, _) = controller_with_standup();
    assert_eq!(controller.delete_selected(), Err(CommandError::NoEventSelected));

    controller.select_date(date(2024, 3, 10));
    assert_eq!(controller.delete_selected(), Err(CommandError::NoEventSelected));
    assert_eq!(controller.selection(), &Selection::CreatingOn(date(2024, 3, 10)));
    assert_eq!(controller.store().len(), 1);
}

#[test]
fn cancel_closes_without_touching_store() {
    let (mut controller, id) = controller_with_standup();
    controller.select_event(&id).unwrap();

    controller.cancel_selection();

    assert_eq!(controller.selection(), &Selection::Closed);
    assert_eq!(controller.store().len(), 1);
    assert_eq!(controller.store().persistence().save_count(), 1);

    controller.cancel_selection();
    assert_eq!(controller.selection(), &Selection::Closed);
}

#[test]
fn draft_for_selection_matches_selection_kind() {
    let (mut controller, id) = controller_with_standup();
    assert_eq!(controller.draft_for_selection(), None);

    controller.select_date(date(2024, 3, 12));
    let blank = controller.draft_for_selection().unwrap();
    assert!(blank.title.is_empty());
    assert_eq!(blank.color.as_deref(), Some(DEFAULT_EVENT_COLOR));
    assert_eq!(blank.start_date, None);

    controller.select_event(&id).unwrap();
    let filled = controller.draft_for_selection().unwrap();
    assert_eq!(filled.title, "Standup");
    assert_eq!(filled.start_date, Some(at(2024, 3, 10, 9, 0)));
    assert_eq!(controller.selected_event().map(|event| &event.id), Some(&id));
}

#[test]
fn month_grid_cells_carry_flags_and_events() {
    let (mut controller, id) = controller_with_standup();
    controller.select_date(date(2024, 3, 20));

    let cells = controller.current_grid();

    assert_eq!(cells.len(), 42);
    assert_eq!(cells[0].date, date(2024, 2, 25));
    assert!(!cells[0].in_current_period);
    assert!(!cells[41].in_current_period);

    let today: Vec<NaiveDate> = cells.iter().filter(|c| c.is_today).map(|c| c.date).collect();
    assert_eq!(today, vec![date(2024, 3, 13)]);

    let selected: Vec<NaiveDate> = cells
        .iter()
        .filter(|c| c.is_selected)
        .map(|c| c.date)
        .collect();
    assert_eq!(selected, vec![date(2024, 3, 20)]);

    let standup_cell = cells.iter().find(|c| c.date == date(2024, 3, 10)).unwrap();
    assert!(standup_cell.in_current_period);
    assert_eq!(standup_cell.events.len(), 1);
    assert_eq!(standup_cell.events[0].id, id);
    assert_eq!(
        cells.iter().filter(|c| !c.events.is_empty()).count(),
        1
    );
}

#[test]
fn editing_selection_does_not_mark_cells_selected() {
    let (mut controller, id) = controller_with_standup();
    controller.select_event(&id).unwrap();

    assert!(controller.current_grid().iter().all(|cell| !cell.is_selected));
}

#[test]
fn week_view_has_seven_cells_all_in_period() {
    let mut controller = controller();
    controller.set_view_mode(ViewMode::Week);

    let cells = controller.current_grid();

    assert_eq!(cells.len(), 7);
    assert_eq!(cells[0].date, date(2024, 3, 10));
    assert!(cells.iter().all(|cell| cell.in_current_period));
}

#[test]
fn navigation_moves_anchor_but_keeps_selection() {
    let mut controller = controller();
    controller.select_date(date(2024, 3, 20));

    controller.go_to_next();
    assert_eq!(controller.anchor(), date(2024, 4, 1));
    assert_eq!(controller.period_label(), "April 2024");

    controller.go_to_previous();
    controller.go_to_previous();
    assert_eq!(controller.anchor(), date(2024, 2, 1));

    controller.set_view_mode(ViewMode::Week);
    controller.go_to_next();
    assert_eq!(controller.anchor(), date(2024, 2, 8));

    controller.go_to_today();
    assert_eq!(controller.anchor(), date(2024, 3, 13));
    assert_eq!(controller.selection(), &Selection::CreatingOn(date(2024, 3, 20)));
}

#[test]
fn visible_events_cover_the_whole_grid() {
    let mut store = EventStore::open(MemoryPersistence::new());
    store
        .add(NewEvent::new("Before", at(2024, 2, 20, 9, 0), at(2024, 2, 20, 10, 0)))
        .unwrap();
    let leading = store
        .add(NewEvent::new("Leading", at(2024, 2, 26, 9, 0), at(2024, 2, 26, 10, 0)))
        .unwrap();
    let inside = store
        .add(NewEvent::new("Inside", at(2024, 3, 15, 9, 0), at(2024, 3, 15, 10, 0)))
        .unwrap();
    let controller =
        CalendarController::new(store, FixedClock(date(2024, 3, 13)), CalendarConfig::default());

    let visible: Vec<&EventId> = controller
        .visible_events()
        .into_iter()
        .map(|event| &event.id)
        .collect();

    assert_eq!(visible, vec![&leading.id, &inside.id]);
}

#[test]
fn set_anchor_clamps_to_navigable_range() {
    let mut controller = controller();

    controller.set_anchor(NaiveDate::MAX);
    assert!(controller.anchor() < NaiveDate::MAX);
    assert_eq!(controller.current_grid().len(), 42);

    controller.go_to_next();
    assert_eq!(controller.current_grid().len(), 42);
}

fn controller() -> Controller {
    CalendarController::new(
        EventStore::open(MemoryPersistence::new()),
        FixedClock(date(2024, 3, 13)),
        CalendarConfig::default(),
    )
}

fn controller_with_standup() -> (Controller, EventId) {
    let mut store = EventStore::open(MemoryPersistence::new());
    let created = store
        .add(NewEvent::new("Standup", at(2024, 3, 10, 9, 0), at(2024, 3, 10, 9, 30)))
        .unwrap();
    let controller =
        CalendarController::new(store, FixedClock(date(2024, 3, 13)), CalendarConfig::default());
    (controller, created.id)
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(hour, minute, 0).unwrap()
}
