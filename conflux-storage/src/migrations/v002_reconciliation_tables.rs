//! v002: Reconciliation tables — conflicts, lineage, and source priorities.

use rusqlite::Connection;

use conflux_core::errors::ConfluxResult;

use crate::to_storage_err;

/// Create the conflict, lineage, and priority tables.
pub fn migrate(conn: &Connection) -> ConfluxResult<()> {
    tracing::info!("v002: creating reconciliation tables");

    conn.execute_batch(
        "
        -- Field-level disagreements, surfaced to operators while pending.
        CREATE TABLE IF NOT EXISTS data_conflicts (
            id                  TEXT PRIMARY KEY,
            entity_kind         TEXT NOT NULL CHECK (entity_kind IN ('node', 'connection')),
            entity_id           TEXT NOT NULL,
            field_name          TEXT NOT NULL,
            conflict_type       TEXT NOT NULL DEFAULT 'value_mismatch',
            existing_value      TEXT NOT NULL,
            incoming_value      TEXT NOT NULL,
            resolution_strategy TEXT,
            status              TEXT NOT NULL DEFAULT 'pending'
                                CHECK (status IN ('pending', 'resolved', 'ignored')),
            resolved_value      TEXT,
            resolved_by         TEXT,
            detected_at         TEXT NOT NULL,
            resolved_at         TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_conflicts_entity
            ON data_conflicts(entity_kind, entity_id);
        CREATE INDEX IF NOT EXISTS idx_conflicts_status
            ON data_conflicts(status);

        -- Append-only provenance. Never updated, never deduplicated.
        CREATE TABLE IF NOT EXISTS data_lineage (
            id               TEXT PRIMARY KEY,
            entity_kind      TEXT NOT NULL CHECK (entity_kind IN ('node', 'connection')),
            entity_id        TEXT NOT NULL,
            source_id        TEXT NOT NULL,
            field_name       TEXT NOT NULL,
            field_value      TEXT NOT NULL,
            confidence_score REAL NOT NULL,
            recorded_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_lineage_entity_field
            ON data_lineage(entity_kind, entity_id, field_name, recorded_at);
        CREATE INDEX IF NOT EXISTS idx_lineage_source
            ON data_lineage(source_id);

        -- Administrator-configured source trust.
        CREATE TABLE IF NOT EXISTS source_priorities (
            source_id             TEXT PRIMARY KEY,
            priority_level        INTEGER NOT NULL,
            confidence_multiplier REAL NOT NULL DEFAULT 1.0,
            field_priorities      TEXT NOT NULL DEFAULT '{}',
            updated_at            TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(())
}
