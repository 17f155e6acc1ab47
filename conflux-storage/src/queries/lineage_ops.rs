//! Lineage appends and history reads.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde_json::Value;
use uuid::Uuid;

use conflux_core::confidence::Confidence;
use conflux_core::errors::ConfluxResult;
use conflux_core::models::{DataLineage, EntityKind, EntityRef};

use super::parse_ts;
use crate::to_storage_err;

/// Append lineage rows. Idempotent on id so persist retries are safe; rows
/// are otherwise never touched again.
pub fn insert_lineage(conn: &Connection, records: &[DataLineage]) -> ConfluxResult<usize> {
    let mut inserted = 0;
    for record in records {
        let value_json = serde_json::to_string(&record.field_value)?;
        inserted += conn
            .execute(
                "INSERT OR IGNORE INTO data_lineage (
                    id, entity_kind, entity_id, source_id, field_name,
                    field_value, confidence_score, recorded_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.id.to_string(),
                    record.entity.kind.as_str(),
                    record.entity.id,
                    record.source_id,
                    record.field_name,
                    value_json,
                    record.confidence.value(),
                    record.recorded_at.to_rfc3339(),
                ],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(inserted)
}

/// Recent claims for one field of one entity, newest first.
pub fn field_lineage(
    conn: &Connection,
    entity: &EntityRef,
    field_name: &str,
    limit: usize,
) -> ConfluxResult<Vec<DataLineage>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, entity_kind, entity_id, source_id, field_name,
                    field_value, confidence_score, recorded_at
             FROM data_lineage
             WHERE entity_kind = ?1 AND entity_id = ?2 AND field_name = ?3
             ORDER BY recorded_at DESC
             LIMIT ?4",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(
            params![entity.kind.as_str(), entity.id, field_name, limit as i64],
            lineage_from_row,
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Distinct sources that have ever supplied data for an entity.
pub fn entity_sources(conn: &Connection, entity: &EntityRef) -> ConfluxResult<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT DISTINCT source_id FROM data_lineage
             WHERE entity_kind = ?1 AND entity_id = ?2
             ORDER BY source_id",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![entity.kind.as_str(), entity.id], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Retention maintenance: delete lineage older than the cutoff. Belongs to
/// an external maintenance job; the engine's hot path never calls this.
pub fn prune_before(conn: &Connection, cutoff: DateTime<Utc>) -> ConfluxResult<usize> {
    conn.execute(
        "DELETE FROM data_lineage WHERE recorded_at < ?1",
        params![cutoff.to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

fn lineage_from_row(row: &Row<'_>) -> rusqlite::Result<DataLineage> {
    let id_str: String = row.get(0)?;
    let kind_str: String = row.get(1)?;
    let value_json: String = row.get(5)?;
    let confidence: f64 = row.get(6)?;
    let recorded_at: String = row.get(7)?;

    Ok(DataLineage {
        id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::nil()),
        entity: EntityRef {
            kind: EntityKind::parse(&kind_str).unwrap_or(EntityKind::Node),
            id: row.get(2)?,
        },
        source_id: row.get(3)?,
        field_name: row.get(4)?,
        field_value: serde_json::from_str(&value_json).unwrap_or(Value::Null),
        confidence: Confidence::new(confidence),
        recorded_at: parse_ts(&recorded_at),
    })
}
