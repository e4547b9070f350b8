use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, RwLock};

use ballast_types::ObjectId;

use crate::error::{OdbError, OdbResult};
use crate::traits::{BlobReader, ObjectDatabase};

/// In-memory, HashMap-based object database.
///
/// Intended for tests and embedding. Blobs are held behind a `RwLock` for
/// safe concurrent access and shared via `Arc` so readers never copy the
/// stored bytes. Handles are BLAKE3 hashes of the blob bytes, making
/// insertion naturally idempotent.
pub struct InMemoryOdb {
    blobs: RwLock<HashMap<ObjectId, Arc<Vec<u8>>>>,
}

impl InMemoryOdb {
    /// Create a new empty in-memory database.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the database is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored blobs.
    pub fn total_bytes(&self) -> u64 {
        self.blobs
            .read()
            .expect("lock poisoned")
            .values()
            .map(|data| data.len() as u64)
            .sum()
    }
}

impl Default for InMemoryOdb {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectDatabase for InMemoryOdb {
    fn insert_blob(&self, data: &[u8]) -> OdbResult<ObjectId> {
        let id = ObjectId::from_bytes(data);
        if id.is_null() {
            return Err(OdbError::NullObjectId);
        }
        let mut map = self.blobs.write().expect("lock poisoned");
        // Idempotent: identical bytes map to the same handle, so a second
        // insert is a no-op.
        map.entry(id).or_insert_with(|| Arc::new(data.to_vec()));
        Ok(id)
    }

    fn open_blob(&self, id: &ObjectId) -> OdbResult<BlobReader<'_>> {
        let map = self.blobs.read().expect("lock poisoned");
        let data = map.get(id).cloned().ok_or(OdbError::NotFound(*id))?;
        let size = data.len() as u64;
        Ok(BlobReader::new(ArcCursor::new(data), size))
    }

    fn contains_blob(&self, id: &ObjectId) -> OdbResult<bool> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map.contains_key(id))
    }

    fn read_blob(&self, id: &ObjectId) -> OdbResult<Vec<u8>> {
        let map = self.blobs.read().expect("lock poisoned");
        map.get(id)
            .map(|data| data.as_ref().clone())
            .ok_or(OdbError::NotFound(*id))
    }
}

impl std::fmt::Debug for InMemoryOdb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryOdb")
            .field("blob_count", &self.len())
            .finish()
    }
}

/// `Read` adapter over shared blob bytes, detached from the store lock.
struct ArcCursor {
    data: Arc<Vec<u8>>,
    pos: usize,
}

impl ArcCursor {
    fn new(data: Arc<Vec<u8>>) -> Self {
        Self { data, pos: 0 }
    }
}

impl std::io::Read for ArcCursor {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let remaining = &self.data[self.pos..];
        let mut cursor = Cursor::new(remaining);
        let n = std::io::Read::read(&mut cursor, buf)?;
        self.pos += n;
        Ok(n)
    }
}
