//! Property tests for the detector, scorer, and lineage invariants.

use std::collections::HashMap;

use chrono::Utc;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

use conflux_core::models::{ConflictType, EntityRef, Observation};
use conflux_reconcile::detector::detect_conflicts;
use conflux_reconcile::lineage;
use conflux_reconcile::registry::PriorityRegistry;
use conflux_reconcile::scorer::score_source;
use test_fixtures::priority;

fn value_map(entries: &HashMap<String, i64>) -> Map<String, Value> {
    entries
        .iter()
        .map(|(k, v)| (k.clone(), json!(v)))
        .collect()
}

proptest! {
    /// Disjoint key sets never produce conflicts.
    #[test]
    fn prop_no_false_conflicts(
        existing in proptest::collection::hash_map("[a-m]{1,6}", any::<i64>(), 0..8),
        incoming in proptest::collection::hash_map("[n-z]{1,6}", any::<i64>(), 0..8),
    ) {
        let conflicts = detect_conflicts(
            &EntityRef::node("p"),
            &value_map(&existing),
            &value_map(&incoming),
            Utc::now(),
        );
        prop_assert!(conflicts.is_empty());
    }

    /// Exactly one conflict per shared key with differing values.
    #[test]
    fn prop_exactly_one_conflict_per_disagreement(
        shared in proptest::collection::hash_map("[a-z]{1,6}", (any::<i64>(), any::<i64>()), 0..10),
    ) {
        let existing: Map<String, Value> =
            shared.iter().map(|(k, (old, _))| (k.clone(), json!(old))).collect();
        let incoming: Map<String, Value> =
            shared.iter().map(|(k, (_, new))| (k.clone(), json!(new))).collect();
        let expected = shared.values().filter(|(old, new)| old != new).count();

        let conflicts = detect_conflicts(&EntityRef::node("p"), &existing, &incoming, Utc::now());
        prop_assert_eq!(conflicts.len(), expected);
        for c in &conflicts {
            prop_assert_eq!(c.conflict_type, ConflictType::ValueMismatch);
        }
    }

    /// Detection is deterministic: the same inputs yield the same conflict
    /// fields both times.
    #[test]
    fn prop_detection_is_deterministic(
        existing in proptest::collection::hash_map("[a-z]{1,6}", any::<i64>(), 0..8),
        incoming in proptest::collection::hash_map("[a-z]{1,6}", any::<i64>(), 0..8),
    ) {
        let existing = value_map(&existing);
        let incoming = value_map(&incoming);
        let entity = EntityRef::node("p");

        let first: Vec<_> = detect_conflicts(&entity, &existing, &incoming, Utc::now())
            .into_iter()
            .map(|c| (c.field_name, c.existing_value, c.incoming_value))
            .collect();
        let second: Vec<_> = detect_conflicts(&entity, &existing, &incoming, Utc::now())
            .into_iter()
            .map(|c| (c.field_name, c.existing_value, c.incoming_value))
            .collect();
        prop_assert_eq!(first, second);
    }

    /// Confidence stays in [0, 1] for any level/multiplier combination.
    #[test]
    fn prop_confidence_bounds(
        level in -100i64..100,
        multiplier in -10.0f64..10.0,
    ) {
        let registry = PriorityRegistry::from_entries([priority("s", level, multiplier)]);
        let score = score_source(&registry, "s").value();
        prop_assert!((0.0..=1.0).contains(&score));
    }

    /// Unknown sources always score exactly neutral.
    #[test]
    fn prop_unknown_source_is_neutral(source_id in "[a-z0-9-]{1,16}") {
        let registry = PriorityRegistry::default();
        prop_assert_eq!(score_source(&registry, &source_id).value(), 0.5);
    }

    /// One lineage row per incoming key, carrying the literal value.
    #[test]
    fn prop_lineage_completeness(
        incoming in proptest::collection::hash_map("[a-z]{1,6}", any::<i64>(), 0..10),
    ) {
        let obs = Observation::new(
            "p",
            conflux_core::models::EntityKind::Node,
            value_map(&incoming),
            "src",
        );
        let records = lineage::record(&obs, conflux_core::confidence::Confidence::neutral());
        prop_assert_eq!(records.len(), incoming.len());
        for record in &records {
            prop_assert_eq!(&record.field_value, &json!(incoming[&record.field_name]));
        }
    }
}
