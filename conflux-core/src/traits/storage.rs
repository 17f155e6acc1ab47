use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::config::StrategyKind;
use crate::errors::ConfluxResult;
use crate::models::{
    DataConflict, DataLineage, EntityKind, EntityRef, NetworkEntity, ReconciliationResult,
    SourcePriority,
};

/// The engine's only I/O seam. Reads before resolution, writes in persist,
/// plus the operator's manual-resolution path.
pub trait IReconciliationStorage: Send + Sync {
    // --- Reads ---
    fn get_entity(&self, kind: EntityKind, id: &str) -> ConfluxResult<Option<NetworkEntity>>;
    fn list_source_priorities(&self) -> ConfluxResult<Vec<SourcePriority>>;
    /// Recent claims for one field of one entity, newest first.
    fn field_lineage(
        &self,
        entity: &EntityRef,
        field_name: &str,
        limit: usize,
    ) -> ConfluxResult<Vec<DataLineage>>;
    /// Distinct sources that have ever supplied data for the entity.
    fn entity_sources(&self, entity: &EntityRef) -> ConfluxResult<Vec<String>>;

    // --- Writes ---
    fn upsert_entity(&self, entity: &NetworkEntity) -> ConfluxResult<()>;
    fn upsert_source_priority(&self, priority: &SourcePriority) -> ConfluxResult<()>;
    fn insert_conflicts(&self, conflicts: &[DataConflict]) -> ConfluxResult<usize>;
    fn insert_lineage(&self, records: &[DataLineage]) -> ConfluxResult<usize>;
    /// The atomic persist: conflict rows, lineage rows, and the entity
    /// update land in one transaction, or fail as
    /// [`StorageError::PartialPersistence`](crate::errors::StorageError)
    /// naming the step that broke.
    fn apply_reconciliation(
        &self,
        entity_id: &str,
        kind: EntityKind,
        result: &ReconciliationResult,
        applied_at: DateTime<Utc>,
    ) -> ConfluxResult<()>;

    // --- Operator surface ---
    fn pending_conflicts(&self, entity: &EntityRef) -> ConfluxResult<Vec<DataConflict>>;
    /// Manual resolution by an operator. A direct row update, outside the
    /// engine's own resolve step.
    fn resolve_conflict(
        &self,
        conflict_id: Uuid,
        resolved_value: &Value,
        strategy: Option<StrategyKind>,
        resolved_by: &str,
    ) -> ConfluxResult<()>;
}
