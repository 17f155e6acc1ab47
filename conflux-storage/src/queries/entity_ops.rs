//! Entity row reads and upserts.

use rusqlite::{params, Connection, OptionalExtension, Row};

use conflux_core::confidence::Confidence;
use conflux_core::errors::ConfluxResult;
use conflux_core::models::{EntityKind, NetworkEntity};

use super::parse_ts;
use crate::to_storage_err;

/// Insert or replace the authoritative record for one entity.
pub fn upsert_entity(conn: &Connection, entity: &NetworkEntity) -> ConfluxResult<()> {
    let fields_json = serde_json::to_string(&entity.fields)?;

    conn.execute(
        "INSERT INTO entities (
            id, kind, fields, confidence_score, primary_source_id,
            first_seen, last_reconciled, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ON CONFLICT (kind, id) DO UPDATE SET
            fields = excluded.fields,
            confidence_score = excluded.confidence_score,
            primary_source_id = excluded.primary_source_id,
            last_reconciled = excluded.last_reconciled,
            updated_at = excluded.updated_at",
        params![
            entity.id,
            entity.kind.as_str(),
            fields_json,
            entity.confidence_score.value(),
            entity.primary_source_id,
            entity.first_seen.to_rfc3339(),
            entity.last_reconciled.map(|t| t.to_rfc3339()),
            entity.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(())
}

/// Fetch one entity by kind and id.
pub fn get_entity(
    conn: &Connection,
    kind: EntityKind,
    id: &str,
) -> ConfluxResult<Option<NetworkEntity>> {
    conn.query_row(
        "SELECT id, kind, fields, confidence_score, primary_source_id,
                first_seen, last_reconciled, updated_at
         FROM entities WHERE kind = ?1 AND id = ?2",
        params![kind.as_str(), id],
        entity_from_row,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

fn entity_from_row(row: &Row<'_>) -> rusqlite::Result<NetworkEntity> {
    let kind_str: String = row.get(1)?;
    let fields_json: String = row.get(2)?;
    let confidence: f64 = row.get(3)?;
    let first_seen: String = row.get(5)?;
    let last_reconciled: Option<String> = row.get(6)?;
    let updated_at: String = row.get(7)?;

    Ok(NetworkEntity {
        id: row.get(0)?,
        kind: EntityKind::parse(&kind_str).unwrap_or(EntityKind::Node),
        fields: serde_json::from_str(&fields_json).unwrap_or_default(),
        confidence_score: Confidence::new(confidence),
        primary_source_id: row.get(4)?,
        first_seen: parse_ts(&first_seen),
        last_reconciled: last_reconciled.as_deref().map(parse_ts),
        updated_at: parse_ts(&updated_at),
    })
}
