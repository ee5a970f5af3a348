mod app;
mod cli;
mod clipboard;
mod color;
mod db;
mod event;
mod palette;
mod store;
mod tui;
mod ui;

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::{App, ViewModel};
use crate::clipboard::SystemClipboard;
use crate::color::RandomColors;
use crate::db::SqliteStore;
use crate::palette::Session;
use crate::store::{KeyValueStore, MemoryStore};

fn main() -> Result<()> {
    let cli_opts = cli::Cli::parse();
    let db_path = cli_opts.db.unwrap_or_else(db::default_db_path);

    if let Some(command) = cli_opts.command {
        init_tracing(None)?;
        let conn = db::init(&db_path)
            .with_context(|| format!("opening database {}", db_path.display()))?;
        return cli::run(command, &SqliteStore::new(conn));
    }

    let log_path = cli_opts.log.unwrap_or_else(db::default_log_path);
    init_tracing(Some(&log_path))?;

    let (store, persistent): (Box<dyn KeyValueStore>, bool) = match db::init(&db_path) {
        Ok(conn) => {
            info!(path = %db_path.display(), "database opened");
            (Box::new(SqliteStore::new(conn)), true)
        }
        Err(err) => {
            warn!(path = %db_path.display(), error = %err, "database unavailable, using memory");
            (Box::new(MemoryStore::new()), false)
        }
    };
    let session = Session::open(store, ViewModel::default(), Box::new(RandomColors));
    let mut app = App::new(session, Box::new(SystemClipboard));
    if !persistent {
        app.status = Some(format!(
            "Could not open {}, changes last until exit",
            db_path.display()
        ));
    }

    let mut terminal = tui::init()?;
    let result = event::run(&mut app, &mut terminal);

    tui::restore()?;

    result
}

/// Logs to `log_file` at `info` (TUI) or to stderr at `warn` (CLI). `RUST_LOG` overrides both.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let default_level = if log_file.is_some() { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let initialised = match log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    initialised.map_err(|err| anyhow::anyhow!("initialising logging: {err}"))
}
