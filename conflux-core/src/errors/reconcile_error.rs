/// Errors from the reconciliation engine proper.
///
/// Deliberately small: an unknown strategy name and a missing priority entry
/// are not errors (they degrade to the default strategy and neutral
/// confidence respectively), so nearly every failure a caller sees is a
/// storage failure wearing this type.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("entity {id} is a {stored}, observation says {observed}")]
    EntityKindMismatch {
        id: String,
        stored: String,
        observed: String,
    },

    #[error("conflict {id} not found")]
    ConflictNotFound { id: String },
}
