use ballast_types::ObjectId;

/// Errors from object database operations.
///
/// Unlike side-store failures, database failures are fatal to the conversion
/// attempt for the entry that triggered them: callers propagate them instead
/// of degrading.
#[derive(Debug, thiserror::Error)]
pub enum OdbError {
    /// The requested blob was not found.
    #[error("blob not found: {0}")]
    NotFound(ObjectId),

    /// Attempted to insert a blob that would map to the null handle.
    #[error("cannot store blob with null handle")]
    NullObjectId,

    /// I/O error from the underlying database backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for object database operations.
pub type OdbResult<T> = Result<T, OdbError>;
