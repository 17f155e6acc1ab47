//! Shared numeric constants for reconciliation.

/// Divisor that maps a source's priority level onto the [0, 1] confidence
/// scale before the multiplier is applied.
pub const PRIORITY_SCALE: f64 = 10.0;

/// Design ceiling for administrator-assigned priority levels.
pub const MAX_PRIORITY_LEVEL: i64 = 10;

/// Priority assigned to sources with no registry entry.
pub const UNKNOWN_SOURCE_PRIORITY: i64 = 0;

/// Default minimum confidence for a merge to be considered trustworthy.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Default confidence at or above which conflicts are auto-resolved.
pub const DEFAULT_AUTO_RESOLVE_THRESHOLD: f64 = 0.8;

/// Default number of recent lineage rows consulted by the consensus strategy.
pub const DEFAULT_CONSENSUS_WINDOW: usize = 10;

/// Default minimum number of agreeing lineage rows for a plurality to win.
pub const DEFAULT_CONSENSUS_QUORUM: usize = 2;

/// Actor recorded on conflicts the engine resolves automatically.
pub const AUTO_RESOLVED_BY: &str = "system";
