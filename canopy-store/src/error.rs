use thiserror::Error;

/// Failures surfaced by the repository layer. The first three carry the
/// entity label that goes into the client-facing message; everything else
/// is internal and must not be echoed to clients.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    /// One or more requested association ids have no matching reference
    /// row. Raised before any link row is written.
    #[error("One or more {0} IDs are invalid")]
    InvalidReferenceIds(&'static str),

    /// Unique-name violation on a reference entity.
    #[error("{0} already exists")]
    DuplicateName(&'static str),

    /// A value failed to convert between its stored and domain form.
    #[error("data conversion failed: {0}")]
    Conversion(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
