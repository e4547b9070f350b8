use std::io::Read;

use ballast_types::ObjectId;

use crate::error::OdbResult;

/// Streaming reader over one blob's content.
///
/// Carries the blob's declared size alongside the byte stream so that
/// consumers (the side store in particular) can record the expected length
/// without buffering the content.
pub struct BlobReader<'a> {
    inner: Box<dyn Read + Send + 'a>,
    size: u64,
}

impl<'a> BlobReader<'a> {
    /// Wrap a raw reader together with the blob's declared size.
    pub fn new(inner: impl Read + Send + 'a, size: u64) -> Self {
        Self {
            inner: Box::new(inner),
            size,
        }
    }

    /// The blob's declared size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Read for BlobReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl std::fmt::Debug for BlobReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobReader").field("size", &self.size).finish()
    }
}

/// Version-control object database, scoped to one worker.
///
/// The traversal engine driving the rewrite hands each worker thread its own
/// handle; implementations must still be `Send + Sync` so a single backend
/// can be shared where the engine chooses to, but no caller may assume
/// cross-handle ordering.
pub trait ObjectDatabase: Send + Sync {
    /// Insert a blob and return its content handle.
    ///
    /// Idempotent: inserting the same bytes twice returns the same handle
    /// and stores one object.
    fn insert_blob(&self, data: &[u8]) -> OdbResult<ObjectId>;

    /// Open a streaming reader over a blob's content.
    ///
    /// Returns [`OdbError::NotFound`](crate::OdbError::NotFound) if no blob
    /// exists under `id`.
    fn open_blob(&self, id: &ObjectId) -> OdbResult<BlobReader<'_>>;

    /// Check whether a blob exists.
    fn contains_blob(&self, id: &ObjectId) -> OdbResult<bool>;

    /// Read a blob's content fully into memory.
    ///
    /// Default implementation drains [`open_blob`](Self::open_blob).
    /// Backends may override to avoid the intermediate reader.
    fn read_blob(&self, id: &ObjectId) -> OdbResult<Vec<u8>> {
        let mut reader = self.open_blob(id)?;
        let mut data = Vec::with_capacity(reader.size() as usize);
        reader.read_to_end(&mut data)?;
        Ok(data)
    }
}
