use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::conflict::DataConflict;
use super::lineage::DataLineage;
use crate::confidence::Confidence;

/// The outcome of one `reconcile` call. Pure data — nothing has been
/// persisted yet when this is returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// The merged field map: existing fields, overwritten per conflict
    /// resolution, plus incoming fields that had no stored counterpart.
    pub reconciled_data: Map<String, Value>,
    pub conflicts: Vec<DataConflict>,
    pub lineage: Vec<DataLineage>,
    /// Trust in the merged state, derived from the submitting source.
    pub confidence_score: Confidence,
    /// The source that should be treated as authoritative going forward.
    pub primary_source_id: String,
}

impl ReconciliationResult {
    /// Whether any conflict is still awaiting resolution.
    pub fn has_pending_conflicts(&self) -> bool {
        self.conflicts
            .iter()
            .any(|c| c.status == super::conflict::ConflictStatus::Pending)
    }
}
