use serde::{Deserialize, Serialize};

/// The three sub-writes of an atomic persist, in write order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistStep {
    Conflicts,
    Lineage,
    Entity,
}

impl PersistStep {
    pub fn as_str(self) -> &'static str {
        match self {
            PersistStep::Conflicts => "conflicts",
            PersistStep::Lineage => "lineage",
            PersistStep::Entity => "entity",
        }
    }
}

/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Transient: the caller is expected to retry. The engine never retries
    /// internally because it has no knowledge of the caller's transaction
    /// boundaries.
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },

    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    /// A persist left some sub-writes applied and others not. Carries which
    /// steps completed so the caller can decide to retry the whole persist;
    /// all writes are upsert-style, so a full retry is safe.
    #[error("partial persistence: {failed:?} failed after {completed:?}: {reason}")]
    PartialPersistence {
        completed: Vec<PersistStep>,
        failed: PersistStep,
        reason: String,
    },
}
