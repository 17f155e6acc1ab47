use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::entity::{EntityKind, EntityRef};

/// One source's partial view of one entity, normalized to a flat field map
/// by the owning collector. Ephemeral — consumed by a single `reconcile`
/// call and never persisted as such.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub entity_id: String,
    pub kind: EntityKind,
    /// Field values as this source currently sees them.
    pub fields: Map<String, Value>,
    /// The submitting discovery source.
    pub source_id: String,
    pub observed_at: DateTime<Utc>,
}

impl Observation {
    pub fn new(
        entity_id: impl Into<String>,
        kind: EntityKind,
        fields: Map<String, Value>,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            kind,
            fields,
            source_id: source_id.into(),
            observed_at: Utc::now(),
        }
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef {
            kind: self.kind,
            id: self.entity_id.clone(),
        }
    }
}
