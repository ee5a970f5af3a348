/// Key-value blob queries backing the palette lists.
use chrono::{DateTime, Local};
use rusqlite::{Connection, OptionalExtension};

use crate::store::{KeyValueStore, StoreError};

/// SQLite-backed [`KeyValueStore`]. One row per key; writes upsert.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// When the blob under `key` was last written.
    pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Local>>, StoreError> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT updated_at FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(raw.and_then(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .ok()
                .map(|dt| dt.with_timezone(&Local))
        }))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorValue;
    use crate::db;
    use crate::store::{ListKind, ListStore};
    use tempfile::tempdir;

    #[test]
    fn get_on_empty_table_is_none() {
        let dir = tempdir().unwrap();
        let conn = db::init(&dir.path().join("palettr.db")).unwrap();
        let store = SqliteStore::new(conn);
        assert!(store.get("saved_colors").unwrap().is_none());
        assert!(store.updated_at("saved_colors").unwrap().is_none());
    }

    #[test]
    fn set_overwrites_previous_blob() {
        let dir = tempdir().unwrap();
        let conn = db::init(&dir.path().join("palettr.db")).unwrap();
        let store = SqliteStore::new(conn);
        store.set("k", "[]").unwrap();
        store.set("k", r##"["#FFFFFF"]"##).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some(r##"["#FFFFFF"]"##));
        assert!(store.updated_at("k").unwrap().is_some());
    }

    #[test]
    fn lists_survive_reopening_the_database() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("palettr.db");
        let saved = vec![ColorValue::from_rgb(0xFF0000), ColorValue::from_rgb(0x00FF00)];
        {
            let lists = ListStore::new(SqliteStore::new(db::init(&path).unwrap()));
            lists.save_list(ListKind::Saved, &saved).unwrap();
        }
        let lists = ListStore::new(SqliteStore::new(db::init(&path).unwrap()));
        assert_eq!(lists.load_list(ListKind::Saved), saved);
        assert!(lists.load_list(ListKind::DeletedHistory).is_empty());
    }
}
