//! `timestamp_based`: the more recent observation wins.

use serde_json::Value;

use super::ResolutionContext;

/// Compare observation recency. The stored value's recency comes from the
/// latest lineage row for the field (else the entity's last reconciliation);
/// the incoming side uses the observation timestamp. When the stored side
/// has no recency at all, or the two are equal, the incoming value wins.
pub fn resolve(ctx: &ResolutionContext<'_>) -> Value {
    match ctx.existing_observed_at {
        Some(existing_at) if existing_at > ctx.incoming_observed_at => {
            ctx.existing_value().clone()
        }
        _ => ctx.incoming_value().clone(),
    }
}
