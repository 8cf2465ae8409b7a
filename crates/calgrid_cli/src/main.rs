mod commands;
mod config;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calgrid_core::{
    default_log_level, init_logging_with, parse_week_start, CalendarController, EventPersistence,
    EventStore, JsonFilePersistence, LoadReport, LogSettings, SqlitePersistence, SystemClock,
    ViewMode,
};
use clap::{Parser, Subcommand};
use log::info;

use crate::commands::{Controller, EventFields};
use crate::config::FileConfig;

#[derive(Parser)]
#[command(name = "calgrid")]
#[command(about = "Month and week calendar grids over a local event file")]
struct Cli {
    /// Event data file (`.json`, or `.db`/`.sqlite` for SQLite)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write rolling logs to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// First day of the week (e.g. "sun", "Monday")
    #[arg(long, global = true)]
    week_start: Option<String>,

    /// Grid view: "month" or "week"
    #[arg(long, global = true)]
    view: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the calendar grid around a date
    Grid {
        /// Anchor date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        /// Move forward this many periods
        #[arg(long, default_value_t = 0)]
        next: u32,

        /// Move back this many periods
        #[arg(long, default_value_t = 0)]
        prev: u32,
    },
    /// List events covering one day
    Day {
        /// Date (YYYY-MM-DD)
        date: String,
    },
    /// Create an event
    Add {
        title: String,

        /// Day to create the event on when no start is given (YYYY-MM-DD)
        #[arg(long)]
        on: Option<String>,

        #[command(flatten)]
        fields: EventFields,
    },
    /// Edit an existing event
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        fields: EventFields,
    },
    /// Delete an event
    Delete { id: String },
    /// List events in store order
    List {
        /// Only events touching this date or later (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Only events touching this date or earlier (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Show the color palette
    Colors,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    if let Some(log_dir) = &cli.log_dir {
        let level = file_config
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        let settings = LogSettings {
            echo_warnings: true,
            ..LogSettings::new(level, absolute(log_dir)?)
        };
        init_logging_with(&settings).map_err(|err| anyhow::anyhow!(err))?;
    }

    let mut calendar = file_config.calendar;
    if let Some(value) = &cli.week_start {
        calendar.week_start = parse_week_start(value)
            .ok_or_else(|| anyhow::anyhow!("unknown weekday '{}'", value))?;
    }
    if let Some(value) = &cli.view {
        calendar.initial_view = ViewMode::parse(value)
            .ok_or_else(|| anyhow::anyhow!("unknown view '{}', expected month or week", value))?;
    }

    let data_file = file_config.data_file(cli.data.clone());
    let store = EventStore::open(open_persistence(&data_file)?);
    if let LoadReport::Discarded { reason } = store.load_report() {
        eprintln!(
            "warning: ignoring unreadable data in {}: {}",
            data_file.display(),
            reason
        );
    }
    info!(
        "event=cli_start module=cli status=ok view={} week_start={}",
        calendar.initial_view.as_str(),
        calendar.week_start
    );

    let mut controller: Controller = CalendarController::new(store, SystemClock, calendar);

    match cli.command {
        Commands::Grid { date, next, prev } => {
            commands::grid::run(&mut controller, date.as_deref(), next, prev)
        }
        Commands::Day { date } => commands::grid::day(&controller, &date),
        Commands::Add { title, on, fields } => {
            commands::events::add(&mut controller, title, on.as_deref(), fields)
        }
        Commands::Update { id, title, fields } => {
            commands::events::update(&mut controller, &id, title, fields)
        }
        Commands::Delete { id } => commands::events::delete(&mut controller, &id),
        Commands::List { from, to } => {
            commands::events::list(&controller, from.as_deref(), to.as_deref())
        }
        Commands::Colors => {
            commands::events::colors();
            Ok(())
        }
    }
}

fn open_persistence(path: &Path) -> Result<Box<dyn EventPersistence>> {
    let is_sqlite = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("db" | "sqlite")
    );
    if is_sqlite {
        let persistence = SqlitePersistence::open_or_unreadable(path)
            .with_context(|| format!("failed to open database `{}`", path.display()))?;
        Ok(Box::new(persistence))
    } else {
        Ok(Box::new(JsonFilePersistence::new(path)))
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(cwd.join(path))
}
