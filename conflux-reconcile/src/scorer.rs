//! Source confidence scoring.
//!
//! Formula: `min(1.0, priority_level / 10 × confidence_multiplier)`, with
//! 0.5 for sources that have no registry entry. The cap exists because the
//! multiplier is expected near 1.0 but may exceed it.

use conflux_core::confidence::Confidence;
use conflux_core::constants::PRIORITY_SCALE;

use crate::registry::PriorityRegistry;

/// Score the trustworthiness of one source from its registry entry.
///
/// Pure function, no side effects. Missing entries score exactly neutral
/// (0.5); a negative product clamps to 0.
///
/// # Examples
///
/// ```
/// use conflux_reconcile::registry::PriorityRegistry;
/// use conflux_reconcile::scorer::score_source;
/// use conflux_core::models::SourcePriority;
///
/// let registry =
///     PriorityRegistry::from_entries([SourcePriority::new("nmap-1", 8, 1.1)]);
/// // 8 / 10 × 1.1 = 0.88
/// assert!((score_source(&registry, "nmap-1").value() - 0.88).abs() < 1e-9);
/// assert_eq!(score_source(&registry, "unknown").value(), 0.5);
/// ```
pub fn score_source(registry: &PriorityRegistry, source_id: &str) -> Confidence {
    match registry.get(source_id) {
        Some(entry) => {
            let raw = entry.priority_level as f64 / PRIORITY_SCALE * entry.confidence_multiplier;
            Confidence::new(raw.min(1.0))
        }
        None => Confidence::neutral(),
    }
}
