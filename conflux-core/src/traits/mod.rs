//! Trait seams between the engine and its collaborators.

mod storage;

pub use storage::IReconciliationStorage;
