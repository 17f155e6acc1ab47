//! Resolution strategies: one pure function per [`StrategyKind`], dispatched
//! through a single match so adding a strategy is a compile-time-checked
//! change.
//!
//! Strategy selection is lenient by design: field-level overrides are
//! operator-authored names, so an unrecognized name falls back to the
//! configured default instead of failing the pipeline. That fallback lives
//! in `ReconcileConfig::strategy_for`; by the time a [`StrategyKind`]
//! reaches [`resolve`], it is always a known variant.

pub mod confidence;
pub mod consensus;
pub mod priority;
pub mod timestamp;

use chrono::{DateTime, Utc};
use serde_json::Value;

use conflux_core::config::StrategyKind;
use conflux_core::models::{DataConflict, DataLineage};

use crate::registry::PriorityRegistry;

/// Everything a strategy may consult when choosing between the existing and
/// incoming value. Assembled by the orchestrator; strategies stay pure.
pub struct ResolutionContext<'a> {
    pub conflict: &'a DataConflict,
    pub registry: &'a PriorityRegistry,
    /// The source that supplied the currently stored value, when known
    /// (latest lineage row for the field, else the entity's primary source).
    pub existing_source: Option<&'a str>,
    /// When the stored value was last observed, when known.
    pub existing_observed_at: Option<DateTime<Utc>>,
    pub incoming_source: &'a str,
    pub incoming_observed_at: DateTime<Utc>,
    /// Recent lineage for the conflicted field, newest first, bounded by the
    /// configured consensus window.
    pub field_history: &'a [DataLineage],
    /// Minimum agreeing claims for a plurality to win consensus.
    pub consensus_quorum: usize,
}

impl ResolutionContext<'_> {
    pub fn field_name(&self) -> &str {
        &self.conflict.field_name
    }

    pub fn existing_value(&self) -> &Value {
        &self.conflict.existing_value
    }

    pub fn incoming_value(&self) -> &Value {
        &self.conflict.incoming_value
    }
}

/// Resolve one conflict with the given strategy. Never fails: every
/// strategy totals over its inputs and degrades toward the incoming value.
pub fn resolve(ctx: &ResolutionContext<'_>, kind: StrategyKind) -> Value {
    match kind {
        StrategyKind::PriorityBased => priority::resolve(ctx),
        StrategyKind::TimestampBased => timestamp::resolve(ctx),
        StrategyKind::ConfidenceBased => confidence::resolve(ctx),
        StrategyKind::ConsensusBased => consensus::resolve(ctx),
    }
}
