use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::UNKNOWN_SOURCE_PRIORITY;

/// Administrator-configured trust settings for one discovery source.
///
/// `priority_level` is expected in a small positive range (design target
/// 1–10); `confidence_multiplier` is expected near 1.0 but may exceed it.
/// Created and updated by an administrator, consumed read-only by the
/// engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcePriority {
    pub source_id: String,
    /// Higher wins.
    pub priority_level: i64,
    pub confidence_multiplier: f64,
    /// Per-field overrides of `priority_level`.
    #[serde(default)]
    pub field_priorities: HashMap<String, i64>,
    pub updated_at: DateTime<Utc>,
}

impl SourcePriority {
    pub fn new(source_id: impl Into<String>, priority_level: i64, confidence_multiplier: f64) -> Self {
        Self {
            source_id: source_id.into(),
            priority_level,
            confidence_multiplier,
            field_priorities: HashMap::new(),
            updated_at: Utc::now(),
        }
    }

    /// Effective priority for a field: the per-field override when present,
    /// else the source-wide level.
    pub fn priority_for(&self, field_name: &str) -> i64 {
        self.field_priorities
            .get(field_name)
            .copied()
            .unwrap_or(self.priority_level)
    }
}

/// Effective priority of a possibly-unregistered source.
pub fn priority_or_neutral(entry: Option<&SourcePriority>, field_name: &str) -> i64 {
    entry
        .map(|p| p.priority_for(field_name))
        .unwrap_or(UNKNOWN_SOURCE_PRIORITY)
}
