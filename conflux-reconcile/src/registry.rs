//! In-memory snapshot of the source priority registry.

use std::collections::HashMap;

use conflux_core::constants::UNKNOWN_SOURCE_PRIORITY;
use conflux_core::errors::ConfluxResult;
use conflux_core::models::SourcePriority;
use conflux_core::traits::IReconciliationStorage;

/// Read-only view of administrator-configured source priorities, loaded once
/// per reconcile call. An empty registry is a valid state: every source is
/// then priority-neutral and reconciliation proceeds normally.
#[derive(Debug, Default, Clone)]
pub struct PriorityRegistry {
    entries: HashMap<String, SourcePriority>,
}

impl PriorityRegistry {
    /// Snapshot the registry from storage.
    pub fn load(storage: &dyn IReconciliationStorage) -> ConfluxResult<Self> {
        let entries = storage
            .list_source_priorities()?
            .into_iter()
            .map(|p| (p.source_id.clone(), p))
            .collect();
        Ok(Self { entries })
    }

    /// Build a registry from entries directly (tests, embedded callers).
    pub fn from_entries(entries: impl IntoIterator<Item = SourcePriority>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|p| (p.source_id.clone(), p))
                .collect(),
        }
    }

    pub fn get(&self, source_id: &str) -> Option<&SourcePriority> {
        self.entries.get(source_id)
    }

    /// Effective priority of a source for one field: the per-field override
    /// when present, else the source-wide level, else neutral for sources
    /// with no entry.
    pub fn priority_for(&self, source_id: &str, field_name: &str) -> i64 {
        self.entries
            .get(source_id)
            .map(|p| p.priority_for(field_name))
            .unwrap_or(UNKNOWN_SOURCE_PRIORITY)
    }

    /// Source-wide priority level, neutral for unknown sources.
    pub fn level(&self, source_id: &str) -> i64 {
        self.entries
            .get(source_id)
            .map(|p| p.priority_level)
            .unwrap_or(UNKNOWN_SOURCE_PRIORITY)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_fixtures::{priority, priority_with_override};

    #[test]
    fn unknown_source_is_priority_neutral() {
        let registry = PriorityRegistry::default();
        assert_eq!(registry.priority_for("nmap-1", "status"), 0);
        assert_eq!(registry.level("nmap-1"), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn field_override_beats_source_level() {
        let registry = PriorityRegistry::from_entries([priority_with_override(
            "aws-inventory",
            5,
            1.0,
            "status",
            9,
        )]);
        assert_eq!(registry.priority_for("aws-inventory", "status"), 9);
        assert_eq!(registry.priority_for("aws-inventory", "hostname"), 5);
    }

    #[test]
    fn from_entries_keys_by_source_id() {
        let registry =
            PriorityRegistry::from_entries([priority("a", 3, 1.0), priority("b", 7, 0.9)]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("b").map(|p| p.priority_level), Some(7));
    }
}
