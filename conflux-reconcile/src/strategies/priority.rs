//! `priority_based`: the source with the higher configured priority wins.

use serde_json::Value;

use super::ResolutionContext;

/// Compare the existing value's source against the incoming source by
/// effective priority (per-field override when present, else the source
/// level). Unknown sources are neutral. Ties, and an unknown existing
/// source, go to the incoming value — the newer claim wins when the
/// registry cannot separate the two.
pub fn resolve(ctx: &ResolutionContext<'_>) -> Value {
    let field = ctx.field_name();
    let incoming_priority = ctx.registry.priority_for(ctx.incoming_source, field);

    let existing_priority = match ctx.existing_source {
        Some(source) => ctx.registry.priority_for(source, field),
        None => return ctx.incoming_value().clone(),
    };

    if existing_priority > incoming_priority {
        ctx.existing_value().clone()
    } else {
        ctx.incoming_value().clone()
    }
}
