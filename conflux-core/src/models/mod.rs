//! Data model for the reconciliation engine.

pub mod conflict;
pub mod entity;
pub mod lineage;
pub mod observation;
pub mod priority;
pub mod result;

pub use conflict::{ConflictStatus, ConflictType, DataConflict};
pub use entity::{EntityKind, EntityRef, NetworkEntity};
pub use lineage::DataLineage;
pub use observation::Observation;
pub use priority::{priority_or_neutral, SourcePriority};
pub use result::ReconciliationResult;
