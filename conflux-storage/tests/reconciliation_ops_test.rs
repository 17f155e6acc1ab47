//! Conflict/lineage queries and the atomic reconciliation persist.

use chrono::{Duration, Utc};
use serde_json::json;

use conflux_core::confidence::Confidence;
use conflux_core::config::StrategyKind;
use conflux_core::errors::{ConfluxError, PersistStep, StorageError};
use conflux_core::models::{
    ConflictStatus, DataConflict, DataLineage, EntityKind, EntityRef, ReconciliationResult,
};
use conflux_core::traits::IReconciliationStorage;
use conflux_storage::queries::lineage_ops;
use conflux_storage::StorageEngine;

fn engine() -> StorageEngine {
    StorageEngine::open_in_memory().expect("open in-memory storage")
}

fn status_conflict(entity: &EntityRef) -> DataConflict {
    DataConflict::value_mismatch(
        entity.clone(),
        "status",
        json!("healthy"),
        json!("critical"),
        Utc::now(),
    )
}

fn claim(entity: &EntityRef, source: &str, field: &str, value: serde_json::Value) -> DataLineage {
    DataLineage::new(
        entity.clone(),
        source,
        field,
        value,
        Confidence::neutral(),
        Utc::now(),
    )
}

#[test]
fn pending_conflicts_surface_until_resolved() {
    let eng = engine();
    let entity = EntityRef::node("web-01");
    let conflict = status_conflict(&entity);
    eng.insert_conflicts(std::slice::from_ref(&conflict))
        .expect("insert");

    let pending = eng.pending_conflicts(&entity).expect("pending");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].field_name, "status");
    assert_eq!(pending[0].status, ConflictStatus::Pending);

    // Operator resolves it directly on the row.
    eng.resolve_conflict(
        conflict.id,
        &json!("critical"),
        Some(StrategyKind::PriorityBased),
        "alice@ops",
    )
    .expect("manual resolve");

    assert!(eng.pending_conflicts(&entity).expect("pending").is_empty());
}

#[test]
fn resolving_a_missing_conflict_is_an_error() {
    let eng = engine();
    let err = eng
        .resolve_conflict(uuid::Uuid::new_v4(), &json!("x"), None, "alice@ops")
        .expect_err("no such conflict");
    assert!(err.to_string().contains("not found"));
}

#[test]
fn conflict_inserts_are_idempotent_on_id() {
    let eng = engine();
    let entity = EntityRef::node("web-01");
    let conflict = status_conflict(&entity);

    assert_eq!(
        eng.insert_conflicts(std::slice::from_ref(&conflict))
            .expect("first insert"),
        1
    );
    assert_eq!(
        eng.insert_conflicts(std::slice::from_ref(&conflict))
            .expect("retry insert"),
        0
    );
    assert_eq!(eng.pending_conflicts(&entity).expect("pending").len(), 1);
}

#[test]
fn field_lineage_returns_newest_first_and_honors_limit() {
    let eng = engine();
    let entity = EntityRef::node("web-01");

    let mut older = claim(&entity, "nmap-1", "status", json!("healthy"));
    older.recorded_at = Utc::now() - Duration::hours(1);
    let newer = claim(&entity, "cmdb", "status", json!("critical"));
    let other_field = claim(&entity, "cmdb", "ip", json!("10.0.0.5"));

    eng.insert_lineage(&[older, newer, other_field])
        .expect("insert lineage");

    let history = eng.field_lineage(&entity, "status", 10).expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].source_id, "cmdb");
    assert_eq!(history[1].source_id, "nmap-1");

    let limited = eng.field_lineage(&entity, "status", 1).expect("limited");
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].field_value, json!("critical"));
}

#[test]
fn entity_sources_are_distinct() {
    let eng = engine();
    let entity = EntityRef::node("web-01");
    eng.insert_lineage(&[
        claim(&entity, "nmap-1", "status", json!("healthy")),
        claim(&entity, "nmap-1", "ip", json!("10.0.0.5")),
        claim(&entity, "cmdb", "status", json!("healthy")),
    ])
    .expect("insert lineage");

    let sources = eng.entity_sources(&entity).expect("sources");
    assert_eq!(sources, vec!["cmdb".to_string(), "nmap-1".to_string()]);
}

#[test]
fn apply_reconciliation_writes_all_three_in_one_call() {
    let eng = engine();
    let entity = EntityRef::node("web-01");
    let conflict = status_conflict(&entity);

    let result = ReconciliationResult {
        reconciled_data: test_fixtures::fields(&[
            ("status", json!("critical")),
            ("ip", json!("10.0.0.5")),
        ]),
        conflicts: vec![conflict],
        lineage: vec![
            claim(&entity, "nmap-1", "status", json!("critical")),
            claim(&entity, "nmap-1", "ip", json!("10.0.0.5")),
        ],
        confidence_score: Confidence::new(0.88),
        primary_source_id: "nmap-1".into(),
    };

    eng.apply_reconciliation("web-01", EntityKind::Node, &result, Utc::now())
        .expect("persist");

    let stored = eng
        .get_entity(EntityKind::Node, "web-01")
        .expect("query")
        .expect("entity created by persist");
    assert_eq!(stored.fields.get("status"), Some(&json!("critical")));
    assert_eq!(stored.primary_source_id.as_deref(), Some("nmap-1"));
    assert!((stored.confidence_score.value() - 0.88).abs() < 1e-9);
    assert!(stored.last_reconciled.is_some());

    assert_eq!(eng.pending_conflicts(&entity).expect("pending").len(), 1);
    assert_eq!(eng.field_lineage(&entity, "status", 10).expect("history").len(), 1);
}

#[test]
fn apply_reconciliation_retry_does_not_duplicate_rows() {
    let eng = engine();
    let entity = EntityRef::node("web-01");
    let result = ReconciliationResult {
        reconciled_data: test_fixtures::fields(&[("status", json!("critical"))]),
        conflicts: vec![status_conflict(&entity)],
        lineage: vec![claim(&entity, "nmap-1", "status", json!("critical"))],
        confidence_score: Confidence::neutral(),
        primary_source_id: "nmap-1".into(),
    };

    eng.apply_reconciliation("web-01", EntityKind::Node, &result, Utc::now())
        .expect("first persist");
    eng.apply_reconciliation("web-01", EntityKind::Node, &result, Utc::now())
        .expect("retried persist");

    assert_eq!(eng.pending_conflicts(&entity).expect("pending").len(), 1);
    assert_eq!(eng.field_lineage(&entity, "status", 10).expect("history").len(), 1);
}

#[test]
fn failed_persist_rolls_back_and_names_completed_steps() {
    let eng = engine();
    let entity = EntityRef::node("web-01");
    let result = ReconciliationResult {
        reconciled_data: test_fixtures::fields(&[("status", json!("critical"))]),
        conflicts: vec![status_conflict(&entity)],
        lineage: vec![claim(&entity, "nmap-1", "status", json!("critical"))],
        confidence_score: Confidence::neutral(),
        primary_source_id: "nmap-1".into(),
    };

    // Sabotage the second persist step: the lineage insert has no table to
    // land in.
    eng.pool()
        .writer
        .with_conn_sync(|conn| {
            conn.execute_batch("DROP TABLE data_lineage").map_err(|e| {
                StorageError::Sqlite {
                    message: e.to_string(),
                }
                .into()
            })
        })
        .expect("drop lineage table");

    let err = eng
        .apply_reconciliation("web-01", EntityKind::Node, &result, Utc::now())
        .expect_err("lineage step cannot succeed");
    assert!(err.is_transient(), "a full retry must be allowed");
    match err {
        ConfluxError::Storage(StorageError::PartialPersistence {
            completed, failed, ..
        }) => {
            assert_eq!(completed, vec![PersistStep::Conflicts]);
            assert_eq!(failed, PersistStep::Lineage);
        }
        other => panic!("expected partial persistence, got {other}"),
    }

    // The rollback undid the conflict step and never reached the entity.
    assert!(eng.pending_conflicts(&entity).expect("pending").is_empty());
    assert!(eng
        .get_entity(EntityKind::Node, "web-01")
        .expect("query")
        .is_none());
}

#[test]
fn prune_before_removes_only_old_lineage() {
    let eng = engine();
    let entity = EntityRef::node("web-01");

    let mut old = claim(&entity, "nmap-1", "status", json!("healthy"));
    old.recorded_at = Utc::now() - Duration::days(120);
    let fresh = claim(&entity, "nmap-1", "status", json!("critical"));
    eng.insert_lineage(&[old, fresh]).expect("insert");

    let pruned = eng
        .pool()
        .writer
        .with_conn_sync(|conn| lineage_ops::prune_before(conn, Utc::now() - Duration::days(90)))
        .expect("prune");
    assert_eq!(pruned, 1);

    let history = eng.field_lineage(&entity, "status", 10).expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].field_value, json!("critical"));
}
