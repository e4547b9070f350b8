use ballast_types::Digest;

/// Errors from side-store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(Digest),

    /// Placement failed and no usable object exists at the digest path.
    #[error("placement failed for {digest}: {source}")]
    Placement {
        digest: Digest,
        source: std::io::Error,
    },

    /// An object already at the digest path has the wrong size.
    #[error("size mismatch for {digest}: expected {expected}, found {found}")]
    SizeMismatch {
        digest: Digest,
        expected: u64,
        found: u64,
    },

    /// Stored bytes no longer hash to their path digest (data corruption).
    #[error("digest mismatch: path says {expected}, content hashes to {computed}")]
    DigestMismatch { expected: Digest, computed: Digest },

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for side-store operations.
pub type StoreResult<T> = Result<T, StoreError>;
