//! # conflux-core
//!
//! Foundation crate for the Conflux topology reconciliation system.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod confidence;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use confidence::Confidence;
pub use config::{ReconcileConfig, StrategyKind};
pub use errors::{ConfluxError, ConfluxResult};
pub use models::{
    DataConflict, DataLineage, EntityKind, EntityRef, NetworkEntity, Observation,
    ReconciliationResult, SourcePriority,
};
