//! Error taxonomy: one enum per concern, composed into [`ConfluxError`].

mod reconcile_error;
mod storage_error;

pub use reconcile_error::ReconcileError;
pub use storage_error::{PersistStep, StorageError};

/// Umbrella error for every fallible operation in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum ConfluxError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ConfluxResult<T> = Result<T, ConfluxError>;

impl ConfluxError {
    /// Whether the caller should treat this failure as retryable.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ConfluxError::Storage(StorageError::Unavailable { .. })
                | ConfluxError::Storage(StorageError::PartialPersistence { .. })
        )
    }
}
