use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::entity::EntityRef;
use crate::config::StrategyKind;

/// Classification of a detected field disagreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// The stored and incoming values differ. The only type detection
    /// currently emits.
    ValueMismatch,
    /// Reserved: the two sides disagree on the field's shape.
    SchemaConflict,
    /// Reserved: observations arrived out of order.
    TimestampConflict,
    /// Reserved: two sources of equal priority disagree.
    SourcePriorityConflict,
}

impl ConflictType {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictType::ValueMismatch => "value_mismatch",
            ConflictType::SchemaConflict => "schema_conflict",
            ConflictType::TimestampConflict => "timestamp_conflict",
            ConflictType::SourcePriorityConflict => "source_priority_conflict",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "value_mismatch" => Some(ConflictType::ValueMismatch),
            "schema_conflict" => Some(ConflictType::SchemaConflict),
            "timestamp_conflict" => Some(ConflictType::TimestampConflict),
            "source_priority_conflict" => Some(ConflictType::SourcePriorityConflict),
            _ => None,
        }
    }
}

/// Lifecycle of a conflict row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStatus {
    /// Awaiting auto- or operator resolution.
    Pending,
    /// A resolved value has been chosen.
    Resolved,
    /// An operator dismissed the conflict.
    Ignored,
}

impl ConflictStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictStatus::Pending => "pending",
            ConflictStatus::Resolved => "resolved",
            ConflictStatus::Ignored => "ignored",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ConflictStatus::Pending),
            "resolved" => Some(ConflictStatus::Resolved),
            "ignored" => Some(ConflictStatus::Ignored),
            _ => None,
        }
    }
}

/// One field-level disagreement between the stored record and an incoming
/// observation.
///
/// Exactly one conflict is created per reconcile call per field where the
/// existing value is present and differs from the incoming value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConflict {
    pub id: Uuid,
    pub entity: EntityRef,
    pub field_name: String,
    pub conflict_type: ConflictType,
    pub existing_value: Value,
    pub incoming_value: Value,
    /// The strategy that chose (or will choose) the resolved value.
    pub resolution_strategy: Option<StrategyKind>,
    pub status: ConflictStatus,
    pub resolved_value: Option<Value>,
    /// `"system"` for auto-resolution, otherwise the operator's identifier.
    pub resolved_by: Option<String>,
    pub detected_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl DataConflict {
    /// A fresh pending mismatch between `existing` and `incoming`.
    pub fn value_mismatch(
        entity: EntityRef,
        field_name: impl Into<String>,
        existing: Value,
        incoming: Value,
        detected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity,
            field_name: field_name.into(),
            conflict_type: ConflictType::ValueMismatch,
            existing_value: existing,
            incoming_value: incoming,
            resolution_strategy: None,
            status: ConflictStatus::Pending,
            resolved_value: None,
            resolved_by: None,
            detected_at,
            resolved_at: None,
        }
    }

    /// Mark this conflict resolved with the given value and actor.
    pub fn mark_resolved(
        &mut self,
        value: Value,
        strategy: StrategyKind,
        resolved_by: impl Into<String>,
        resolved_at: DateTime<Utc>,
    ) {
        self.resolution_strategy = Some(strategy);
        self.status = ConflictStatus::Resolved;
        self.resolved_value = Some(value);
        self.resolved_by = Some(resolved_by.into());
        self.resolved_at = Some(resolved_at);
    }
}
