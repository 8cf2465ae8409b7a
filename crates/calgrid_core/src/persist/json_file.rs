//! JSON file persistence backend.
//!
//! # Responsibility
//! - Store the whole collection as one JSON array document on disk.
//!
//! # Invariants
//! - Writes go to a sibling temp file first and are renamed into place, so a
//!   crash mid-write never leaves a truncated snapshot.
//! - A missing file is `Missing`; an unreadable or unparseable file is
//!   `Corrupt`.

use super::{decode_snapshot, encode_snapshot, EventPersistence, LoadOutcome, PersistResult};
use crate::model::event::CalendarEvent;
use log::{debug, error, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

const TEMP_SUFFIX: &str = "tmp";

/// Single-file JSON snapshot store.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|value| value.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(TEMP_SUFFIX);
        self.path.with_file_name(name)
    }
}

impl EventPersistence for JsonFilePersistence {
    fn backend_name(&self) -> &'static str {
        "json_file"
    }

    fn load(&self) -> LoadOutcome {
        match std::fs::read_to_string(&self.path) {
            Ok(document) => decode_snapshot(&document),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("event=snapshot_load module=persist backend=json_file status=missing");
                LoadOutcome::Missing
            }
            Err(err) => LoadOutcome::Corrupt(format!(
                "failed to read `{}`: {err}",
                self.path.display()
            )),
        }
    }

    fn save(&mut self, events: &[CalendarEvent]) -> PersistResult<()> {
        let started_at = Instant::now();
        let document = encode_snapshot(events)?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        let written = std::fs::write(&temp_path, document)
            .and_then(|()| std::fs::rename(&temp_path, &self.path));
        if let Err(err) = written {
            error!(
                "event=snapshot_save module=persist backend=json_file status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            let _ = std::fs::remove_file(&temp_path);
            return Err(err.into());
        }

        info!(
            "event=snapshot_save module=persist backend=json_file status=ok count={} duration_ms={}",
            events.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}
