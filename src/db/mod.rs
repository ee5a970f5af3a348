/// Database module: SQLite key-value store and migrations.
mod kv;
mod migrations;

use std::path::{Path, PathBuf};

use anyhow::Result;
use rusqlite::Connection;

pub use kv::SqliteStore;

/// Environment variable overriding the database location.
pub const DB_PATH_ENV: &str = "PALETTR_DB";

/// Opens (or creates) the SQLite database and runs migrations.
pub fn init(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Returns the default database path: `$PALETTR_DB`, else a file inside the
/// user's data directory. Falls back to `./palettr.db` when no data dir is found.
pub fn default_db_path() -> PathBuf {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    data_dir()
        .map(|dir| dir.join("palettr.db"))
        .unwrap_or_else(|| PathBuf::from("palettr.db"))
}

/// Returns the default log file path next to the database.
pub fn default_log_path() -> PathBuf {
    data_dir()
        .map(|dir| dir.join("palettr.log"))
        .unwrap_or_else(|| PathBuf::from("palettr.log"))
}

fn data_dir() -> Option<PathBuf> {
    let dir = dirs::data_local_dir()?.join("palettr");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}
