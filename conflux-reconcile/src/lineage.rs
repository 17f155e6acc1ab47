//! Lineage recording: one provenance row per incoming field.

use conflux_core::confidence::Confidence;
use conflux_core::models::{DataLineage, Observation};

/// Build one lineage record per key in the observation, conflicting or not.
///
/// Each record stores the literal incoming value, not the resolved one —
/// lineage answers "what did source X claim", not "what did we decide".
/// Pure; the append to storage happens in the persist step.
pub fn record(observation: &Observation, confidence: Confidence) -> Vec<DataLineage> {
    let entity = observation.entity_ref();
    observation
        .fields
        .iter()
        .map(|(field, value)| {
            DataLineage::new(
                entity.clone(),
                observation.source_id.clone(),
                field.clone(),
                value.clone(),
                confidence,
                observation.observed_at,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_fixtures::node_observation;

    #[test]
    fn one_record_per_incoming_field() {
        let obs = node_observation(
            "web-01",
            "nmap-1",
            &[("status", json!("critical")), ("ip", json!("10.0.0.5"))],
        );
        let records = record(&obs, Confidence::new(0.7));
        assert_eq!(records.len(), 2);

        let mut fields: Vec<_> = records.iter().map(|r| r.field_name.as_str()).collect();
        fields.sort_unstable();
        assert_eq!(fields, ["ip", "status"]);
    }

    #[test]
    fn records_carry_the_literal_incoming_value() {
        let obs = node_observation("web-01", "nmap-1", &[("status", json!("critical"))]);
        let records = record(&obs, Confidence::neutral());
        assert_eq!(records[0].field_value, json!("critical"));
        assert_eq!(records[0].source_id, "nmap-1");
        assert_eq!(records[0].confidence.value(), 0.5);
        assert_eq!(records[0].recorded_at, obs.observed_at);
    }

    #[test]
    fn empty_observation_yields_no_records() {
        let obs = node_observation("web-01", "nmap-1", &[]);
        assert!(record(&obs, Confidence::neutral()).is_empty());
    }
}
