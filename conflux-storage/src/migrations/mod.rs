//! Versioned schema migrations, tracked via `PRAGMA user_version`.

pub mod v001_topology_tables;
pub mod v002_reconciliation_tables;

use rusqlite::Connection;

use conflux_core::errors::{ConfluxResult, StorageError};

use crate::to_storage_err;

/// Current schema version. Bump when adding a migration.
pub const SCHEMA_VERSION: u32 = 2;

/// Run all outstanding migrations on a connection. Idempotent: a database
/// already at [`SCHEMA_VERSION`] is untouched.
pub fn run_migrations(conn: &Connection) -> ConfluxResult<()> {
    let current = schema_version(conn)?;

    for version in (current + 1)..=SCHEMA_VERSION {
        apply(conn, version).map_err(|e| StorageError::MigrationFailed {
            version,
            reason: e.to_string(),
        })?;
        set_schema_version(conn, version)?;
        tracing::info!(version, "applied schema migration");
    }

    Ok(())
}

fn apply(conn: &Connection, version: u32) -> ConfluxResult<()> {
    match version {
        1 => v001_topology_tables::migrate(conn),
        2 => v002_reconciliation_tables::migrate(conn),
        other => Err(StorageError::MigrationFailed {
            version: other,
            reason: "no such migration".into(),
        }
        .into()),
    }
}

/// Read the schema version of a database.
pub fn schema_version(conn: &Connection) -> ConfluxResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

fn set_schema_version(conn: &Connection, version: u32) -> ConfluxResult<()> {
    conn.pragma_update(None, "user_version", version)
        .map_err(|e| to_storage_err(e.to_string()))
}
