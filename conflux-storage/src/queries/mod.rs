//! Plain query functions over `&Connection`. Transaction scoping belongs to
//! the callers in `engine.rs`.

pub mod conflict_ops;
pub mod entity_ops;
pub mod lineage_ops;
pub mod priority_ops;

use chrono::{DateTime, Utc};

/// Parse a stored RFC 3339 timestamp, tolerating damage by falling back to
/// now rather than failing the whole row.
pub(crate) fn parse_ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
