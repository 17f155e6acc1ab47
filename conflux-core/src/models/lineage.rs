use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::entity::EntityRef;
use crate::confidence::Confidence;

/// Provenance record: what one source claimed for one field, and with what
/// confidence, at reconciliation time.
///
/// Lineage is append-only. Rows are never updated or deduplicated; repeated
/// reconciliations accumulate history, which is what the consensus strategy
/// and audit trails consume. Lineage answers "what did source X claim", not
/// "what did we decide" — `field_value` is always the literal incoming
/// value, never the resolved one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataLineage {
    pub id: Uuid,
    pub entity: EntityRef,
    pub source_id: String,
    pub field_name: String,
    pub field_value: Value,
    pub confidence: Confidence,
    pub recorded_at: DateTime<Utc>,
}

impl DataLineage {
    pub fn new(
        entity: EntityRef,
        source_id: impl Into<String>,
        field_name: impl Into<String>,
        field_value: Value,
        confidence: Confidence,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity,
            source_id: source_id.into(),
            field_name: field_name.into(),
            field_value,
            confidence,
            recorded_at,
        }
    }
}
