//! # conflux-reconcile
//!
//! The data reconciliation engine: merges a source's observation into the
//! authoritative record for an entity, detects field-level disagreements,
//! resolves them per configurable strategy, scores the result, and records
//! full provenance.
//!
//! ## Modules
//!
//! - [`detector`] — Pure field-map diffing into conflict records
//! - [`strategies`] — The four resolution strategies and their dispatch
//! - [`scorer`] — Source confidence scoring from the priority registry
//! - [`lineage`] — Provenance record construction
//! - [`registry`] — Snapshot of administrator-configured source priorities
//! - [`engine`] — The orchestrator: `reconcile` / `persist`

pub mod detector;
pub mod engine;
pub mod lineage;
pub mod registry;
pub mod scorer;
pub mod strategies;

pub use engine::ReconcileEngine;
pub use registry::PriorityRegistry;
