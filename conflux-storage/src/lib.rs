//! # conflux-storage
//!
//! SQLite persistence for topology entities, conflict rows, lineage rows,
//! and source priorities. Single write connection, pooled readers, versioned
//! migrations, and the atomic reconciliation persist.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use conflux_core::errors::{ConfluxError, StorageError};

/// Map a low-level SQLite failure message into the storage error taxonomy.
pub(crate) fn to_storage_err(message: impl Into<String>) -> ConfluxError {
    StorageError::Sqlite {
        message: message.into(),
    }
    .into()
}

/// Classify failures that callers should retry (locked/busy database).
pub(crate) fn to_unavailable(message: impl Into<String>) -> ConfluxError {
    StorageError::Unavailable {
        message: message.into(),
    }
    .into()
}
