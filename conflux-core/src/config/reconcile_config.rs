//! Process-wide reconciliation policy.
//!
//! # Examples
//!
//! ```
//! use conflux_core::config::{ReconcileConfig, StrategyKind};
//!
//! let config = ReconcileConfig::default();
//! assert_eq!(config.default_strategy, StrategyKind::PriorityBased);
//! assert!((config.auto_resolve_threshold - 0.8).abs() < f64::EPSILON);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::strategy::StrategyKind;
use crate::constants::{
    DEFAULT_AUTO_RESOLVE_THRESHOLD, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_CONSENSUS_QUORUM,
    DEFAULT_CONSENSUS_WINDOW,
};

/// Policy applied by every reconcile call. Loaded once at engine
/// construction and immutable for the engine's lifetime; tests rebuild the
/// engine with a fresh config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Strategy used when a field has no override.
    pub default_strategy: StrategyKind,
    /// Per-field strategy names. Kept as raw strings because they are
    /// operator-authored; unknown names fall back to `default_strategy` at
    /// resolve time instead of failing config deserialization.
    pub field_strategies: HashMap<String, String>,
    /// Minimum confidence for a merge to be considered trustworthy.
    pub confidence_threshold: f64,
    /// Confidence at or above which a conflict is resolved without an
    /// operator in the loop.
    pub auto_resolve_threshold: f64,
    /// How many recent lineage rows the consensus strategy consults.
    pub consensus_window: usize,
    /// Minimum number of agreeing rows for a plurality to win.
    pub consensus_quorum: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            default_strategy: StrategyKind::PriorityBased,
            field_strategies: HashMap::new(),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            auto_resolve_threshold: DEFAULT_AUTO_RESOLVE_THRESHOLD,
            consensus_window: DEFAULT_CONSENSUS_WINDOW,
            consensus_quorum: DEFAULT_CONSENSUS_QUORUM,
        }
    }
}

impl ReconcileConfig {
    /// Parse from a TOML document, filling omitted keys with defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// The strategy to apply for one field: the per-field override when it
    /// names a known strategy, else the default.
    pub fn strategy_for(&self, field_name: &str) -> StrategyKind {
        self.field_strategies
            .get(field_name)
            .and_then(|name| StrategyKind::parse(name))
            .unwrap_or(self.default_strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_round_trip_with_field_overrides() {
        let config = ReconcileConfig::from_toml_str(
            r#"
            default_strategy = "confidence_based"
            confidence_threshold = 0.6

            [field_strategies]
            status = "timestamp_based"
            hostname = "priority_based"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.default_strategy, StrategyKind::ConfidenceBased);
        assert_eq!(config.strategy_for("status"), StrategyKind::TimestampBased);
        assert_eq!(config.strategy_for("hostname"), StrategyKind::PriorityBased);
        // Unlisted field uses the default.
        assert_eq!(config.strategy_for("ip"), StrategyKind::ConfidenceBased);
        // Omitted keys keep their defaults.
        assert!((config.auto_resolve_threshold - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_field_strategy_falls_back_to_default() {
        let mut config = ReconcileConfig::default();
        config
            .field_strategies
            .insert("status".into(), "majority_vote".into());
        assert_eq!(config.strategy_for("status"), config.default_strategy);
    }
}
