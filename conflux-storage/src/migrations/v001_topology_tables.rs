//! v001: The entities table — one row per node or connection.

use rusqlite::Connection;

use conflux_core::errors::ConfluxResult;

use crate::to_storage_err;

/// Create the entities table.
pub fn migrate(conn: &Connection) -> ConfluxResult<()> {
    tracing::info!("v001: creating topology entity table");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS entities (
            id                TEXT NOT NULL,
            kind              TEXT NOT NULL CHECK (kind IN ('node', 'connection')),
            fields            TEXT NOT NULL DEFAULT '{}',
            confidence_score  REAL NOT NULL DEFAULT 0.5,
            primary_source_id TEXT,
            first_seen        TEXT NOT NULL,
            last_reconciled   TEXT,
            updated_at        TEXT NOT NULL,
            PRIMARY KEY (kind, id)
        );

        CREATE INDEX IF NOT EXISTS idx_entities_primary_source
            ON entities(primary_source_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(())
}
