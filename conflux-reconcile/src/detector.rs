//! Field-level conflict detection.
//!
//! Pure comparison of the stored field map against an incoming one. No I/O;
//! persistence of the produced records happens in the persist step.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use conflux_core::models::{DataConflict, EntityRef};

/// Compare an incoming field map against the stored one and emit one
/// `value_mismatch` conflict per field whose values differ.
///
/// - Fields present only in `incoming` are not conflicts; the orchestrator
///   merges them directly.
/// - Fields present only in `existing` are left untouched.
/// - Values are compared by `serde_json::Value` equality. Arrays compare
///   element-by-element in order, so semantically-equal but reordered
///   arrays are reported as conflicts. Known coarseness, not a deep merge.
pub fn detect_conflicts(
    entity: &EntityRef,
    existing: &Map<String, Value>,
    incoming: &Map<String, Value>,
    detected_at: DateTime<Utc>,
) -> Vec<DataConflict> {
    let mut conflicts = Vec::new();

    for (field, new_value) in incoming {
        match existing.get(field) {
            Some(old_value) if old_value != new_value => {
                conflicts.push(DataConflict::value_mismatch(
                    entity.clone(),
                    field.clone(),
                    old_value.clone(),
                    new_value.clone(),
                    detected_at,
                ));
            }
            _ => {}
        }
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use conflux_core::models::ConflictType;
    use serde_json::json;

    fn detect(existing: &[(&str, Value)], incoming: &[(&str, Value)]) -> Vec<DataConflict> {
        let existing = test_fixtures::fields(existing);
        let incoming = test_fixtures::fields(incoming);
        detect_conflicts(&EntityRef::node("n1"), &existing, &incoming, Utc::now())
    }

    #[test]
    fn disjoint_maps_produce_no_conflicts() {
        let conflicts = detect(
            &[("hostname", json!("web-01"))],
            &[("ip", json!("10.0.0.5")), ("status", json!("healthy"))],
        );
        assert!(conflicts.is_empty());
    }

    #[test]
    fn equal_values_produce_no_conflicts() {
        let conflicts = detect(&[("status", json!("healthy"))], &[("status", json!("healthy"))]);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn one_conflict_per_differing_shared_field() {
        let conflicts = detect(
            &[
                ("status", json!("healthy")),
                ("os", json!("linux")),
                ("ip", json!("10.0.0.5")),
            ],
            &[
                ("status", json!("critical")),
                ("os", json!("freebsd")),
                ("ip", json!("10.0.0.5")),
                ("rack", json!("b4")),
            ],
        );
        assert_eq!(conflicts.len(), 2);
        for c in &conflicts {
            assert_eq!(c.conflict_type, ConflictType::ValueMismatch);
            assert_eq!(c.status, conflux_core::models::ConflictStatus::Pending);
        }
    }

    #[test]
    fn conflict_carries_both_values() {
        let conflicts = detect(&[("status", json!("healthy"))], &[("status", json!("critical"))]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].existing_value, json!("healthy"));
        assert_eq!(conflicts[0].incoming_value, json!("critical"));
        assert_eq!(conflicts[0].field_name, "status");
    }

    #[test]
    fn reordered_arrays_are_reported_as_conflicts() {
        let conflicts = detect(
            &[("open_ports", json!([22, 80, 443]))],
            &[("open_ports", json!([443, 80, 22]))],
        );
        assert_eq!(conflicts.len(), 1);
    }

    #[test]
    fn null_is_a_value_not_an_absence() {
        // A stored null still counts as a defined value, so a non-null
        // incoming value is a mismatch.
        let conflicts = detect(&[("owner", Value::Null)], &[("owner", json!("ops"))]);
        assert_eq!(conflicts.len(), 1);
    }
}
