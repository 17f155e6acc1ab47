//! Conflict row inserts, the pending-conflict operator surface, and the
//! manual resolution write path.

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use serde_json::Value;
use uuid::Uuid;

use conflux_core::config::StrategyKind;
use conflux_core::errors::{ConfluxResult, ReconcileError};
use conflux_core::models::{ConflictStatus, ConflictType, DataConflict, EntityKind, EntityRef};

use super::parse_ts;
use crate::to_storage_err;

/// Insert conflict rows. Idempotent on id, so a persist retry after a
/// partial failure does not duplicate rows.
pub fn insert_conflicts(conn: &Connection, conflicts: &[DataConflict]) -> ConfluxResult<usize> {
    let mut inserted = 0;
    for conflict in conflicts {
        inserted += conn
            .execute(
                "INSERT OR IGNORE INTO data_conflicts (
                    id, entity_kind, entity_id, field_name, conflict_type,
                    existing_value, incoming_value, resolution_strategy,
                    status, resolved_value, resolved_by, detected_at, resolved_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    conflict.id.to_string(),
                    conflict.entity.kind.as_str(),
                    conflict.entity.id,
                    conflict.field_name,
                    conflict.conflict_type.as_str(),
                    value_json(&conflict.existing_value)?,
                    value_json(&conflict.incoming_value)?,
                    conflict.resolution_strategy.map(|s| s.as_str()),
                    conflict.status.as_str(),
                    conflict
                        .resolved_value
                        .as_ref()
                        .map(value_json)
                        .transpose()?,
                    conflict.resolved_by,
                    conflict.detected_at.to_rfc3339(),
                    conflict.resolved_at.map(|t| t.to_rfc3339()),
                ],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(inserted)
}

/// Conflicts still awaiting resolution for one entity, oldest first.
pub fn pending_conflicts(conn: &Connection, entity: &EntityRef) -> ConfluxResult<Vec<DataConflict>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, entity_kind, entity_id, field_name, conflict_type,
                    existing_value, incoming_value, resolution_strategy,
                    status, resolved_value, resolved_by, detected_at, resolved_at
             FROM data_conflicts
             WHERE entity_kind = ?1 AND entity_id = ?2 AND status = 'pending'
             ORDER BY detected_at ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![entity.kind.as_str(), entity.id], conflict_from_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Operator-driven resolution: a direct update of one conflict row.
pub fn resolve_conflict(
    conn: &Connection,
    conflict_id: Uuid,
    resolved_value: &Value,
    strategy: Option<StrategyKind>,
    resolved_by: &str,
) -> ConfluxResult<()> {
    let updated = conn
        .execute(
            "UPDATE data_conflicts
             SET status = 'resolved', resolved_value = ?2,
                 resolution_strategy = COALESCE(?3, resolution_strategy),
                 resolved_by = ?4, resolved_at = ?5
             WHERE id = ?1",
            params![
                conflict_id.to_string(),
                value_json(resolved_value)?,
                strategy.map(|s| s.as_str()),
                resolved_by,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    if updated == 0 {
        return Err(conflux_core::errors::ConfluxError::Reconcile(
            ReconcileError::ConflictNotFound {
                id: conflict_id.to_string(),
            },
        ));
    }
    Ok(())
}

fn conflict_from_row(row: &Row<'_>) -> rusqlite::Result<DataConflict> {
    let id_str: String = row.get(0)?;
    let kind_str: String = row.get(1)?;
    let type_str: String = row.get(4)?;
    let existing_json: String = row.get(5)?;
    let incoming_json: String = row.get(6)?;
    let strategy_str: Option<String> = row.get(7)?;
    let status_str: String = row.get(8)?;
    let resolved_json: Option<String> = row.get(9)?;
    let detected_at: String = row.get(11)?;
    let resolved_at: Option<String> = row.get(12)?;

    Ok(DataConflict {
        id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::nil()),
        entity: EntityRef {
            kind: EntityKind::parse(&kind_str).unwrap_or(EntityKind::Node),
            id: row.get(2)?,
        },
        field_name: row.get(3)?,
        conflict_type: ConflictType::parse(&type_str).unwrap_or(ConflictType::ValueMismatch),
        existing_value: serde_json::from_str(&existing_json).unwrap_or(Value::Null),
        incoming_value: serde_json::from_str(&incoming_json).unwrap_or(Value::Null),
        resolution_strategy: strategy_str.as_deref().and_then(StrategyKind::parse),
        status: ConflictStatus::parse(&status_str).unwrap_or(ConflictStatus::Pending),
        resolved_value: resolved_json
            .as_deref()
            .map(|s| serde_json::from_str(s).unwrap_or(Value::Null)),
        resolved_by: row.get(10)?,
        detected_at: parse_ts(&detected_at),
        resolved_at: resolved_at.as_deref().map(parse_ts),
    })
}

fn value_json(value: &Value) -> ConfluxResult<String> {
    Ok(serde_json::to_string(value)?)
}
