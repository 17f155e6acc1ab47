//! Source priority reads and administrator upserts.

use rusqlite::{params, Connection, Row};

use conflux_core::errors::ConfluxResult;
use conflux_core::models::SourcePriority;

use super::parse_ts;
use crate::to_storage_err;

/// Insert or update one source's priority entry.
pub fn upsert_priority(conn: &Connection, priority: &SourcePriority) -> ConfluxResult<()> {
    let overrides_json = serde_json::to_string(&priority.field_priorities)
        .map_err(|e| to_storage_err(e.to_string()))?;

    conn.execute(
        "INSERT INTO source_priorities (
            source_id, priority_level, confidence_multiplier, field_priorities, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT (source_id) DO UPDATE SET
            priority_level = excluded.priority_level,
            confidence_multiplier = excluded.confidence_multiplier,
            field_priorities = excluded.field_priorities,
            updated_at = excluded.updated_at",
        params![
            priority.source_id,
            priority.priority_level,
            priority.confidence_multiplier,
            overrides_json,
            priority.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(())
}

/// All configured source priorities. An empty table is a valid state: every
/// source is then priority-neutral.
pub fn list_priorities(conn: &Connection) -> ConfluxResult<Vec<SourcePriority>> {
    let mut stmt = conn
        .prepare(
            "SELECT source_id, priority_level, confidence_multiplier,
                    field_priorities, updated_at
             FROM source_priorities ORDER BY source_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], priority_from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

fn priority_from_row(row: &Row<'_>) -> rusqlite::Result<SourcePriority> {
    let overrides_json: String = row.get(3)?;
    let updated_at: String = row.get(4)?;

    Ok(SourcePriority {
        source_id: row.get(0)?,
        priority_level: row.get(1)?,
        confidence_multiplier: row.get(2)?,
        field_priorities: serde_json::from_str(&overrides_json).unwrap_or_default(),
        updated_at: parse_ts(&updated_at),
    })
}
