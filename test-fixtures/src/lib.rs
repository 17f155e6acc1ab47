//! Shared builders for reconciliation tests across crates.
//!
//! Keeps integration tests free of model-construction noise: a node with a
//! couple of fields, an observation from a named source, a registry entry.

use chrono::Utc;
use serde_json::{json, Map, Value};

use conflux_core::models::{EntityKind, NetworkEntity, Observation, SourcePriority};

/// Build a field map from (name, value) pairs.
pub fn fields(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// A node entity with the given fields already stored.
pub fn node_with_fields(id: &str, pairs: &[(&str, Value)]) -> NetworkEntity {
    let mut entity = NetworkEntity::new(id, EntityKind::Node);
    entity.fields = fields(pairs);
    entity
}

/// An observation of a node from the given source.
pub fn node_observation(entity_id: &str, source_id: &str, pairs: &[(&str, Value)]) -> Observation {
    Observation::new(entity_id, EntityKind::Node, fields(pairs), source_id)
}

/// A registry entry with no per-field overrides.
pub fn priority(source_id: &str, level: i64, multiplier: f64) -> SourcePriority {
    SourcePriority::new(source_id, level, multiplier)
}

/// A registry entry with one per-field override.
pub fn priority_with_override(
    source_id: &str,
    level: i64,
    multiplier: f64,
    field: &str,
    field_level: i64,
) -> SourcePriority {
    let mut p = SourcePriority::new(source_id, level, multiplier);
    p.field_priorities.insert(field.to_string(), field_level);
    p.updated_at = Utc::now();
    p
}

/// The canonical two-field scenario used across engine tests: a stored
/// `status`, an incoming `status` + `ip` from `nmap-1`.
pub fn status_ip_scenario() -> (NetworkEntity, Observation) {
    let entity = node_with_fields("web-01", &[("status", json!("healthy"))]);
    let obs = node_observation(
        "web-01",
        "nmap-1",
        &[("status", json!("critical")), ("ip", json!("10.0.0.5"))],
    );
    (entity, obs)
}
