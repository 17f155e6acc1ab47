use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::confidence::Confidence;

/// Whether an entity is a node in the topology graph or an edge between two
/// nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A device, service, application, or cloud resource.
    Node,
    /// An observed connection between two nodes.
    Connection,
}

impl EntityKind {
    /// Stable string form used in storage rows.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Node => "node",
            EntityKind::Connection => "connection",
        }
    }

    /// Parse the stable string form. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "node" => Some(EntityKind::Node),
            "connection" => Some(EntityKind::Connection),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed reference to either a node or a connection. Conflict and lineage
/// rows point at exactly one of the two, never both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityRef {
    pub fn node(id: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Node,
            id: id.into(),
        }
    }

    pub fn connection(id: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Connection,
            id: id.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// The authoritative record for one node or connection.
///
/// Holds an open-ended map of named fields (hostname, ip address, status, …)
/// merged from every source that has observed the entity. Mutated only by
/// the persist step of a reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkEntity {
    pub id: String,
    pub kind: EntityKind,
    /// Merged field values, keyed by field name.
    pub fields: Map<String, Value>,
    /// Trust in the current merged state.
    pub confidence_score: Confidence,
    /// The source currently treated as authoritative for this entity.
    pub primary_source_id: Option<String>,
    pub first_seen: DateTime<Utc>,
    /// Set by the persist step; `None` until the first reconciliation lands.
    pub last_reconciled: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl NetworkEntity {
    /// A fresh entity with no fields, as created on first sight.
    pub fn new(id: impl Into<String>, kind: EntityKind) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            kind,
            fields: Map::new(),
            confidence_score: Confidence::neutral(),
            primary_source_id: None,
            first_seen: now,
            last_reconciled: None,
            updated_at: now,
        }
    }

    pub fn entity_ref(&self) -> EntityRef {
        EntityRef {
            kind: self.kind,
            id: self.id.clone(),
        }
    }
}
