//! The single write connection. All mutations serialize through it.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use conflux_core::errors::ConfluxResult;

use super::pragmas::apply_pragmas;
use crate::{to_storage_err, to_unavailable};

/// Mutex-guarded writer. SQLite allows one writer at a time; funneling every
/// mutation through this connection keeps "database is locked" errors out of
/// the hot path.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open the writer for the given database file.
    pub fn open(path: &Path) -> ConfluxResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory writer (for testing).
    pub fn open_in_memory() -> ConfluxResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a closure with the write connection.
    pub fn with_conn_sync<F, T>(&self, f: F) -> ConfluxResult<T>
    where
        F: FnOnce(&Connection) -> ConfluxResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_unavailable(format!("write connection lock poisoned: {e}")))?;
        f(&guard)
    }
}
