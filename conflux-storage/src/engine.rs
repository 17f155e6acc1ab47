//! StorageEngine — owns the ConnectionPool, implements
//! IReconciliationStorage, and scopes the atomic reconciliation persist.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde_json::Value;
use uuid::Uuid;

use conflux_core::config::StrategyKind;
use conflux_core::errors::{ConfluxResult, PersistStep, StorageError};
use conflux_core::models::{
    DataConflict, DataLineage, EntityKind, EntityRef, NetworkEntity, ReconciliationResult,
    SourcePriority,
};
use conflux_core::traits::IReconciliationStorage;

use crate::migrations;
use crate::pool::{pragmas, ConnectionPool};
use crate::queries::{conflict_ops, entity_ops, lineage_ops, priority_ops};
use crate::to_unavailable;

/// The main storage engine. Owns the connection pool and implements the
/// engine's storage seam.
pub struct StorageEngine {
    pool: ConnectionPool,
    /// When true, use the read pool for read operations (file-backed mode).
    /// When false, route all reads through the writer (in-memory mode,
    /// because in-memory read pool connections are isolated databases).
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path) -> ConfluxResult<Self> {
        let pool = ConnectionPool::open(path, crate::pool::ReadPool::default_size())?;
        let wal_active = pool.writer.with_conn_sync(pragmas::verify_wal_mode)?;
        if !wal_active {
            // Filesystems without WAL support fall back to the default
            // journal; reads then block on the writer.
            tracing::warn!(path = %path.display(), "WAL mode not active");
        }
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine (for testing). Routes all reads
    /// through the writer since in-memory read pool connections are isolated
    /// databases that can't see the writer's changes.
    pub fn open_in_memory() -> ConfluxResult<Self> {
        let pool = ConnectionPool::open_in_memory(1)?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Run migrations on the writer.
    fn initialize(&self) -> ConfluxResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| migrations::run_migrations(conn))
    }

    /// Get a reference to the connection pool (for advanced operations).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Execute a read-only query on the best available connection.
    fn with_reader<F, T>(&self, f: F) -> ConfluxResult<T>
    where
        F: FnOnce(&Connection) -> ConfluxResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }
}

impl IReconciliationStorage for StorageEngine {
    fn get_entity(&self, kind: EntityKind, id: &str) -> ConfluxResult<Option<NetworkEntity>> {
        self.with_reader(|conn| entity_ops::get_entity(conn, kind, id))
    }

    fn list_source_priorities(&self) -> ConfluxResult<Vec<SourcePriority>> {
        self.with_reader(priority_ops::list_priorities)
    }

    fn field_lineage(
        &self,
        entity: &EntityRef,
        field_name: &str,
        limit: usize,
    ) -> ConfluxResult<Vec<DataLineage>> {
        self.with_reader(|conn| lineage_ops::field_lineage(conn, entity, field_name, limit))
    }

    fn entity_sources(&self, entity: &EntityRef) -> ConfluxResult<Vec<String>> {
        self.with_reader(|conn| lineage_ops::entity_sources(conn, entity))
    }

    fn upsert_entity(&self, entity: &NetworkEntity) -> ConfluxResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| entity_ops::upsert_entity(conn, entity))
    }

    fn upsert_source_priority(&self, priority: &SourcePriority) -> ConfluxResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| priority_ops::upsert_priority(conn, priority))
    }

    fn insert_conflicts(&self, conflicts: &[DataConflict]) -> ConfluxResult<usize> {
        self.pool
            .writer
            .with_conn_sync(|conn| conflict_ops::insert_conflicts(conn, conflicts))
    }

    fn insert_lineage(&self, records: &[DataLineage]) -> ConfluxResult<usize> {
        self.pool
            .writer
            .with_conn_sync(|conn| lineage_ops::insert_lineage(conn, records))
    }

    fn apply_reconciliation(
        &self,
        entity_id: &str,
        kind: EntityKind,
        result: &ReconciliationResult,
        applied_at: DateTime<Utc>,
    ) -> ConfluxResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            apply_reconciliation_tx(conn, entity_id, kind, result, applied_at)
        })
    }

    fn pending_conflicts(&self, entity: &EntityRef) -> ConfluxResult<Vec<DataConflict>> {
        self.with_reader(|conn| conflict_ops::pending_conflicts(conn, entity))
    }

    fn resolve_conflict(
        &self,
        conflict_id: Uuid,
        resolved_value: &Value,
        strategy: Option<StrategyKind>,
        resolved_by: &str,
    ) -> ConfluxResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            conflict_ops::resolve_conflict(conn, conflict_id, resolved_value, strategy, resolved_by)
        })
    }
}

/// The three persist writes inside one transaction: conflict rows, lineage
/// rows, entity upsert. A failed step rolls everything back and reports
/// which steps had completed, so the caller can retry the whole persist
/// (every write is idempotent on its key).
fn apply_reconciliation_tx(
    conn: &Connection,
    entity_id: &str,
    kind: EntityKind,
    result: &ReconciliationResult,
    applied_at: DateTime<Utc>,
) -> ConfluxResult<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_unavailable(format!("persist begin: {e}")))?;

    let mut completed = Vec::new();

    if let Err(e) = conflict_ops::insert_conflicts(&tx, &result.conflicts) {
        let _ = tx.rollback();
        return Err(partial(completed, PersistStep::Conflicts, e));
    }
    completed.push(PersistStep::Conflicts);

    if let Err(e) = lineage_ops::insert_lineage(&tx, &result.lineage) {
        let _ = tx.rollback();
        return Err(partial(completed, PersistStep::Lineage, e));
    }
    completed.push(PersistStep::Lineage);

    let entity = reconciled_entity(&tx, entity_id, kind, result, applied_at);
    let entity = match entity {
        Ok(entity) => entity,
        Err(e) => {
            let _ = tx.rollback();
            return Err(partial(completed, PersistStep::Entity, e));
        }
    };
    if let Err(e) = entity_ops::upsert_entity(&tx, &entity) {
        let _ = tx.rollback();
        return Err(partial(completed, PersistStep::Entity, e));
    }

    tx.commit()
        .map_err(|e| to_unavailable(format!("persist commit: {e}")))?;

    tracing::debug!(
        entity_id,
        kind = %kind,
        conflicts = result.conflicts.len(),
        lineage = result.lineage.len(),
        "reconciliation persisted"
    );
    Ok(())
}

/// Build the updated entity row: merged fields, new confidence, new primary
/// source, reconciliation timestamp. Preserves `first_seen` when the entity
/// already exists.
fn reconciled_entity(
    conn: &Connection,
    entity_id: &str,
    kind: EntityKind,
    result: &ReconciliationResult,
    applied_at: DateTime<Utc>,
) -> ConfluxResult<NetworkEntity> {
    let mut entity = entity_ops::get_entity(conn, kind, entity_id)?
        .unwrap_or_else(|| NetworkEntity::new(entity_id, kind));

    entity.fields = result.reconciled_data.clone();
    entity.confidence_score = result.confidence_score;
    entity.primary_source_id = Some(result.primary_source_id.clone());
    entity.last_reconciled = Some(applied_at);
    entity.updated_at = applied_at;
    Ok(entity)
}

fn partial(
    completed: Vec<PersistStep>,
    failed: PersistStep,
    cause: conflux_core::errors::ConfluxError,
) -> conflux_core::errors::ConfluxError {
    StorageError::PartialPersistence {
        completed,
        failed,
        reason: cause.to_string(),
    }
    .into()
}
