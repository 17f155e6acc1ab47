use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of resolution strategies.
///
/// Field-level strategy names are operator-authored data, so lookup goes
/// through [`StrategyKind::parse`], which returns `None` for unknown names
/// instead of failing — the policy layer falls back to the configured
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// The source with the higher configured priority wins.
    PriorityBased,
    /// The more recent observation wins.
    TimestampBased,
    /// The source with the higher computed confidence wins.
    ConfidenceBased,
    /// The plurality value among recent lineage wins.
    ConsensusBased,
}

impl StrategyKind {
    /// Stable string form used in config files and storage rows.
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::PriorityBased => "priority_based",
            StrategyKind::TimestampBased => "timestamp_based",
            StrategyKind::ConfidenceBased => "confidence_based",
            StrategyKind::ConsensusBased => "consensus_based",
        }
    }

    /// Lenient parse of an operator-authored name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "priority_based" => Some(StrategyKind::PriorityBased),
            "timestamp_based" => Some(StrategyKind::TimestampBased),
            "confidence_based" => Some(StrategyKind::ConfidenceBased),
            "consensus_based" => Some(StrategyKind::ConsensusBased),
            _ => None,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_all_variants() {
        for kind in [
            StrategyKind::PriorityBased,
            StrategyKind::TimestampBased,
            StrategyKind::ConfidenceBased,
            StrategyKind::ConsensusBased,
        ] {
            assert_eq!(StrategyKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(StrategyKind::parse("majority_vote"), None);
        assert_eq!(StrategyKind::parse(""), None);
    }
}
