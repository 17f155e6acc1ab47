//! `consensus_based`: the plurality value among recent claims wins.

use std::collections::HashMap;

use serde_json::Value;

use super::ResolutionContext;

/// Tally the recent lineage window for the field, counting the incoming
/// value as one additional vote, and return the plurality value — provided
/// it reaches the configured quorum. No quorum, or an empty history, falls
/// back to the incoming value. Tied pluralities prefer the incoming value
/// when it is one of the leaders, else the existing value when it is, else
/// whichever leader tallied first.
pub fn resolve(ctx: &ResolutionContext<'_>) -> Value {
    // Key votes by serialized value: Value is not Hash, and serialization
    // gives structural equality the same way detection compares fields.
    let mut votes: HashMap<String, (Value, usize)> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    let mut tally = |value: &Value| {
        let key = value.to_string();
        match votes.get_mut(&key) {
            Some((_, count)) => *count += 1,
            None => {
                votes.insert(key.clone(), (value.clone(), 1));
                order.push(key);
            }
        }
    };

    tally(ctx.incoming_value());
    for record in ctx.field_history {
        tally(&record.field_value);
    }

    let leader_count = votes.values().map(|(_, count)| *count).max().unwrap_or(0);
    if leader_count < ctx.consensus_quorum {
        return ctx.incoming_value().clone();
    }

    let incoming_key = ctx.incoming_value().to_string();
    if votes.get(&incoming_key).map(|(_, c)| *c) == Some(leader_count) {
        return ctx.incoming_value().clone();
    }
    let existing_key = ctx.existing_value().to_string();
    if votes.get(&existing_key).map(|(_, c)| *c) == Some(leader_count) {
        return ctx.existing_value().clone();
    }

    // First value to reach the leading tally.
    order
        .iter()
        .filter_map(|key| votes.get(key))
        .find(|(_, count)| *count == leader_count)
        .map(|(value, _)| value.clone())
        .unwrap_or_else(|| ctx.incoming_value().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PriorityRegistry;
    use crate::strategies::test_support::status_conflict;
    use chrono::Utc;
    use conflux_core::confidence::Confidence;
    use conflux_core::models::{DataLineage, EntityRef};
    use serde_json::json;

    fn claim(value: Value) -> DataLineage {
        DataLineage::new(
            EntityRef::node("web-01"),
            "some-source",
            "status",
            value,
            Confidence::neutral(),
            Utc::now(),
        )
    }

    fn resolve_with(history: &[DataLineage], quorum: usize) -> Value {
        let conflict = status_conflict();
        let registry = PriorityRegistry::default();
        let ctx = ResolutionContext {
            conflict: &conflict,
            registry: &registry,
            existing_source: Some("cmdb"),
            existing_observed_at: None,
            incoming_source: "nmap-1",
            incoming_observed_at: Utc::now(),
            field_history: history,
            consensus_quorum: quorum,
        };
        resolve(&ctx)
    }

    #[test]
    fn plurality_of_recent_claims_wins() {
        // Conflict is healthy (stored) vs critical (incoming); history backs
        // healthy twice, so healthy reaches quorum and outvotes critical.
        let history = [claim(json!("healthy")), claim(json!("healthy"))];
        assert_eq!(resolve_with(&history, 2), json!("healthy"));
    }

    #[test]
    fn no_quorum_falls_back_to_incoming() {
        let history = [claim(json!("healthy"))];
        // healthy and critical each have one vote... healthy has 1 + 0,
        // critical 1 (incoming). Quorum of 3 is unreachable.
        assert_eq!(resolve_with(&history, 3), json!("critical"));
    }

    #[test]
    fn empty_history_falls_back_to_incoming() {
        assert_eq!(resolve_with(&[], 2), json!("critical"));
    }

    #[test]
    fn incoming_vote_counts_toward_its_own_quorum() {
        // One historical "critical" claim plus the incoming one reaches a
        // quorum of 2.
        let history = [claim(json!("critical")), claim(json!("healthy"))];
        assert_eq!(resolve_with(&history, 2), json!("critical"));
    }

    #[test]
    fn tied_plurality_prefers_incoming() {
        let history = [
            claim(json!("healthy")),
            claim(json!("healthy")),
            claim(json!("critical")),
        ];
        // healthy: 2, critical: 1 + 1 (incoming) = 2. Tie → incoming.
        assert_eq!(resolve_with(&history, 2), json!("critical"));
    }

    #[test]
    fn third_value_can_win_the_plurality() {
        let history = [
            claim(json!("degraded")),
            claim(json!("degraded")),
            claim(json!("degraded")),
            claim(json!("healthy")),
        ];
        assert_eq!(resolve_with(&history, 2), json!("degraded"));
    }
}
