//! Failure signals coming from the storage layer

use sqlx::error::ErrorKind;

/// What a storage error means to the error boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceSignal {
    /// The queried row or entity does not exist
    Missing,
    /// A constraint rejected the write
    Integrity,
}

/// Interpret a `sqlx` error, `None` when it is neither missing nor integrity
pub fn classify(error: &sqlx::Error) -> Option<PersistenceSignal> {
    match error {
        sqlx::Error::RowNotFound => Some(PersistenceSignal::Missing),
        sqlx::Error::Database(db) if is_integrity_kind(&db.kind()) => {
            Some(PersistenceSignal::Integrity)
        }
        _ => None,
    }
}

/// Constraint kinds reported as a conflict with the current resource state
pub fn is_integrity_kind(kind: &ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation
    )
}
