//! `confidence_based`: the source with the higher computed confidence wins.

use serde_json::Value;

use crate::scorer::score_source;

use super::ResolutionContext;

/// Compare the computed confidence of the existing value's source against
/// the incoming source. Both sides score neutral (0.5) when unregistered,
/// so with an empty registry this degrades to incoming-wins. Ties go to the
/// incoming value.
pub fn resolve(ctx: &ResolutionContext<'_>) -> Value {
    let incoming_score = score_source(ctx.registry, ctx.incoming_source);

    let existing_score = match ctx.existing_source {
        Some(source) => score_source(ctx.registry, source),
        None => return ctx.incoming_value().clone(),
    };

    if existing_score.value() > incoming_score.value() {
        ctx.existing_value().clone()
    } else {
        ctx.incoming_value().clone()
    }
}
