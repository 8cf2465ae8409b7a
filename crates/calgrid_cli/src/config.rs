use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calgrid_core::CalendarConfig;
use serde::Deserialize;

const DEFAULT_DATA_FILE: &str = "calgrid.json";

/// Optional TOML settings file, e.g.
///
/// ```toml
/// week_start = "Mon"
/// initial_view = "week"
/// data = "~/calendar/events.db"
/// log_level = "info"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    #[serde(flatten)]
    pub calendar: CalendarConfig,
    pub data: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config `{}`", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config `{}`", path.display()))
    }

    pub fn data_file(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.data.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
    }
}
