use ballast_odb::OdbError;
use ballast_store::StoreError;

/// Errors from the rewrite core.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    /// The configured filename pattern is not a valid glob.
    #[error("invalid filename pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// A pointer document could not be parsed.
    #[error("malformed pointer document: {0}")]
    MalformedPointer(String),

    /// The object database failed; fatal for the entry being converted.
    #[error("object database error: {0}")]
    Odb(#[from] OdbError),

    /// The side store could not be opened.
    ///
    /// Placement failures during conversion never surface here; they degrade
    /// to leaving the entry unconverted.
    #[error("side store error: {0}")]
    Store(#[from] StoreError),
}

/// Result alias for rewrite operations.
pub type RewriteResult<T> = Result<T, RewriteError>;
