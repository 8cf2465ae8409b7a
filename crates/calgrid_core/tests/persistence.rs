use calgrid_core::{
    CalendarEvent, EventId, EventPersistence, EventStore, JsonFilePersistence, LoadOutcome,
    LoadReport, MemoryPersistence, NewEvent, PersistError, SqlitePersistence,
};
use rusqlite::Connection;
use chrono::{NaiveDate, NaiveDateTime};

#[test]
fn memory_backend_round_trips_snapshot() {
    let mut store = EventStore::open(MemoryPersistence::new());
    let saved = fill(&mut store);

    let reopened = EventStore::open(store.into_persistence());

    assert_eq!(reopened.load_report(), &LoadReport::Restored { count: saved.len() });
    assert_eq!(reopened.events(), saved.as_slice());
}

#[test]
fn json_file_backend_round_trips_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("events.json");

    let mut store = EventStore::open(JsonFilePersistence::new(&path));
    assert_eq!(store.load_report(), &LoadReport::Empty);
    let saved = fill(&mut store);
    drop(store);

    assert!(path.exists());
    assert!(!dir.path().join("nested").join("events.json.tmp").exists());

    let reopened = EventStore::open(JsonFilePersistence::new(&path));
    assert_eq!(reopened.events(), saved.as_slice());
}

#[test]
fn json_file_keeps_sub_second_precision() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.json");

    let start = date(2024, 3, 10).and_hms_milli_opt(9, 0, 0, 250).unwrap();
    let end = date(2024, 3, 10).and_hms_milli_opt(9, 30, 0, 999).unwrap();
    let mut store = EventStore::open(JsonFilePersistence::new(&path));
    let created = store.add(NewEvent::new("Precise", start, end)).unwrap();

    let document = std::fs::read_to_string(&path).unwrap();
    assert!(document.contains("2024-03-10T09:00:00.250"), "{document}");

    let reopened = EventStore::open(JsonFilePersistence::new(&path));
    assert_eq!(reopened.get(&created.id), Some(&created));
}

#[test]
fn json_file_with_garbage_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.json");
    std::fs::write(&path, "[{\"id\": 1").unwrap();

    let store = EventStore::open(JsonFilePersistence::new(&path));

    assert!(store.is_empty());
    assert!(matches!(store.load_report(), LoadReport::Discarded { .. }));
}

#[test]
fn json_file_accepts_externally_written_utc_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.json");
    std::fs::write(
        &path,
        r##"[{
            "id": "1",
            "title": "Team Standup",
            "description": "Daily team sync",
            "startDate": "2024-03-10T09:00:00.000Z",
            "endDate": "2024-03-10T09:30:00.000Z",
            "color": "#3b82f6",
            "category": "work"
        }]"##,
    )
    .unwrap();

    let store = EventStore::open(JsonFilePersistence::new(&path));

    assert_eq!(store.load_report(), &LoadReport::Restored { count: 1 });
    let event = store.get(&EventId::from("1")).unwrap();
    assert_eq!(event.start_date, at(2024, 3, 10, 9, 0));
    assert_eq!(event.category.as_deref(), Some("work"));
}

#[test]
fn sqlite_file_backend_round_trips_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calgrid.db");

    let mut store = EventStore::open(SqlitePersistence::open(&path).unwrap());
    assert_eq!(store.load_report(), &LoadReport::Empty);
    let saved = fill(&mut store);
    drop(store);

    let reopened = EventStore::open(SqlitePersistence::open(&path).unwrap());
    assert_eq!(reopened.load_report(), &LoadReport::Restored { count: saved.len() });
    assert_eq!(reopened.events(), saved.as_slice());
}

#[test]
fn sqlite_keeps_order_after_delete() {
    let mut store = EventStore::open(SqlitePersistence::in_memory().unwrap());
    let saved = fill(&mut store);
    store.delete(&saved[0].id).unwrap();

    let persistence = store.into_persistence();
    match persistence.load() {
        LoadOutcome::Loaded(events) => assert_eq!(events, saved[1..].to_vec()),
        other => panic!("unexpected load outcome: {other:?}"),
    }
}

#[test]
fn sqlite_saved_empty_collection_is_not_missing() {
    let mut persistence = SqlitePersistence::in_memory().unwrap();
    assert_eq!(persistence.load(), LoadOutcome::Missing);

    persistence.save(&[]).unwrap();

    assert_eq!(persistence.load(), LoadOutcome::Loaded(Vec::new()));
}

#[test]
fn sqlite_invalid_row_marks_snapshot_corrupt() {
    let mut store = EventStore::open(SqlitePersistence::in_memory().unwrap());
    let saved = fill(&mut store);
    let persistence = store.into_persistence();

    persistence
        .connection()
        .unwrap()
        .execute(
            "UPDATE calendar_events SET start_date = 'not a date' WHERE id = ?1;",
            [saved[1].id.as_str()],
        )
        .unwrap();

    let reopened = EventStore::open(persistence);
    assert!(reopened.is_empty());
    assert!(matches!(
        reopened.load_report(),
        LoadReport::Discarded { reason } if reason.contains("invalid timestamp")
    ));
}

#[test]
fn sqlite_missing_rows_mark_snapshot_corrupt() {
    let mut store = EventStore::open(SqlitePersistence::in_memory().unwrap());
    fill(&mut store);
    let persistence = store.into_persistence();

    persistence
        .connection()
        .unwrap()
        .execute("DELETE FROM calendar_events WHERE position = 0;", [])
        .unwrap();

    match persistence.load() {
        LoadOutcome::Corrupt(reason) => assert!(reason.contains("expects 3"), "{reason}"),
        other => panic!("unexpected load outcome: {other:?}"),
    }
}

#[test]
fn sqlite_file_with_garbage_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.db");
    let garbage = vec![0x5a_u8; 60];
    std::fs::write(&path, &garbage).unwrap();

    let mut store = EventStore::open(SqlitePersistence::open_or_unreadable(&path).unwrap());

    assert!(store.is_empty());
    assert!(matches!(
        store.load_report(),
        LoadReport::Discarded { reason } if reason.contains("unreadable calendar database")
    ));

    // Edits still land in memory; the file is never overwritten.
    store
        .add(NewEvent::new("Standup", at(2024, 3, 10, 9, 0), at(2024, 3, 10, 9, 30)))
        .unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(std::fs::read(&path).unwrap(), garbage);
}

#[test]
fn sqlite_file_with_newer_schema_is_discarded_and_refuses_saves() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let mut persistence = SqlitePersistence::open_or_unreadable(&path).unwrap();

    assert!(persistence.connection().is_none());
    match persistence.load() {
        LoadOutcome::Corrupt(reason) => assert!(reason.contains("999"), "{reason}"),
        other => panic!("unexpected load outcome: {other:?}"),
    }
    assert!(matches!(
        persistence.save(&[]),
        Err(PersistError::Unavailable(_))
    ));

    let conn = Connection::open(&path).unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, 999);
}

#[test]
fn sqlite_strict_open_still_rejects_garbage_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.db");
    std::fs::write(&path, vec![0x5a_u8; 60]).unwrap();

    let err = match SqlitePersistence::open(&path) {
        Ok(_) => panic!("garbage file opened as a database"),
        Err(err) => err,
    };

    assert!(err.is_unreadable_file(), "{err}");
}

#[test]
fn boxed_backend_is_usable_as_persistence() {
    let backend: Box<dyn EventPersistence> = Box::new(MemoryPersistence::new());
    let mut store = EventStore::open(backend);
    fill(&mut store);

    assert_eq!(store.persistence().backend_name(), "memory");
    assert_eq!(store.len(), 3);
}

fn fill<P: EventPersistence>(store: &mut EventStore<P>) -> Vec<CalendarEvent> {
    let mut overnight = NewEvent::new("Deploy", at(2024, 3, 10, 22, 0), at(2024, 3, 11, 1, 0));
    overnight.description = Some("release train".to_string());
    overnight.category = Some("ops".to_string());
    overnight.color = Some("#ef4444".to_string());

    vec![
        store
            .add(NewEvent::new("Standup", at(2024, 3, 10, 9, 0), at(2024, 3, 10, 9, 30)))
            .unwrap(),
        store.add(overnight).unwrap(),
        store
            .add(NewEvent::new("Lunch", at(2024, 3, 11, 12, 0), at(2024, 3, 11, 13, 0)))
            .unwrap(),
    ]
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(hour, minute, 0).unwrap()
}
