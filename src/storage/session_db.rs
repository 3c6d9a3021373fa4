use rusqlite::{Connection, OptionalExtension, Result as SqlResult, params};
use std::path::Path;
use std::sync::Mutex;

use crate::auth::TokenStore;
use crate::error::ClientResult;

/// Persists the session token in a single-row sqlite table.
pub struct SqliteTokenStore {
    conn: Mutex<Connection>,
}

impl SqliteTokenStore {
    /// Open (or create) the session database at `path`
    pub fn with_path<P: AsRef<Path>>(path: P) -> SqlResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Session database that disappears with the process
    pub fn in_memory() -> SqlResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> SqlResult<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS session (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                token TEXT NOT NULL,
                stored_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> SqlResult<T>) -> SqlResult<T> {
        let conn = self
            .conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&conn)
    }
}

impl TokenStore for SqliteTokenStore {
    fn load(&self) -> Option<String> {
        let result = self.with_conn(|conn| {
            conn.query_row("SELECT token FROM session WHERE id = 1", [], |row| row.get(0))
                .optional()
        });
        match result {
            Ok(token) => token,
            Err(err) => {
                log::warn!("Failed to read session token: {err}");
                None
            }
        }
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO session (id, token, stored_at)
                 VALUES (1, ?1, strftime('%s', 'now'))",
                params![token],
            )
        })?;
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        self.with_conn(|conn| conn.execute("DELETE FROM session", []))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_through_sqlite() {
        let store = SqliteTokenStore::in_memory().unwrap();
        assert_eq!(store.load(), None);

        store.save("first").unwrap();
        store.save("second").unwrap();
        assert_eq!(store.load().as_deref(), Some("second"));

        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn token_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.db");

        SqliteTokenStore::with_path(&path).unwrap().save("kept").unwrap();

        let reopened = SqliteTokenStore::with_path(&path).unwrap();
        assert_eq!(reopened.load().as_deref(), Some("kept"));
    }
}
