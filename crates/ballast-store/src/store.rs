use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest as _, Sha256};
use tempfile::NamedTempFile;
use tracing::debug;

use ballast_types::Digest;

use crate::error::{StoreError, StoreResult};

/// Content-addressed filesystem store keyed by SHA-256 digest.
///
/// Objects live at `<root>/<aa>/<bb>/<digest>` where `aa` and `bb` are the
/// first and next two hex characters of the digest. The store is safe to
/// share across threads and processes: all coordination happens through
/// filesystem atomicity, never an in-process lock.
#[derive(Debug, Clone)]
pub struct DigestStore {
    root: PathBuf,
}

impl DigestStore {
    /// Open a store rooted at the given directory, creating it if absent.
    pub fn new(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The path an object with the given digest occupies, present or not.
    pub fn object_path(&self, digest: &Digest) -> PathBuf {
        let hex = digest.to_hex();
        self.root.join(&hex[..2]).join(&hex[2..4]).join(&hex)
    }

    /// Check whether an object is present.
    pub fn contains(&self, digest: &Digest) -> bool {
        self.object_path(digest).exists()
    }

    /// Stream content into the store, returning its digest.
    ///
    /// The content is hashed while being written to a private temporary file
    /// inside the store root (same filesystem as the destination, so the
    /// final rename cannot degrade to a copy). Placement uses a no-clobber
    /// atomic rename:
    ///
    /// - destination absent: the rename wins and the object is in place;
    /// - destination present: the temp file is discarded and existence is
    ///   accepted as proof of prior placement;
    /// - rename failed for any other reason: a racing writer may have won
    ///   the path moments ago, so a pre-existing object whose size equals
    ///   `expected_size` is accepted; anything else is an error.
    ///
    /// The temporary file is removed before this returns on every path.
    pub fn ensure_present<R: Read>(&self, reader: R, expected_size: u64) -> StoreResult<Digest> {
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        let (digest, written) = stream_into(reader, tmp.as_file_mut())?;
        tmp.as_file().sync_all()?;

        let dest = self.object_path(&digest);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        match tmp.persist_noclobber(&dest) {
            Ok(_) => {
                debug!(digest = %digest, size = written, "stored new object");
                Ok(digest)
            }
            Err(persist) => {
                if persist.error.kind() == io::ErrorKind::AlreadyExists {
                    // Lost the no-clobber race, or the object predates this
                    // call entirely. Either way it is already in place.
                    debug!(digest = %digest, "object already present");
                    return Ok(digest);
                }
                // The rename failed outright. A concurrent writer may still
                // have claimed the path; fall back to inspecting what is
                // there now.
                match fs::metadata(&dest) {
                    Ok(meta) if meta.len() == expected_size => Ok(digest),
                    Ok(meta) => Err(StoreError::SizeMismatch {
                        digest,
                        expected: expected_size,
                        found: meta.len(),
                    }),
                    Err(_) => Err(StoreError::Placement {
                        digest,
                        source: persist.error,
                    }),
                }
            }
        }
    }

    /// Read an object back, verifying its content against the digest.
    pub fn read(&self, digest: &Digest) -> StoreResult<Vec<u8>> {
        let path = self.object_path(digest);
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(*digest));
            }
            Err(e) => return Err(e.into()),
        };
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let computed = Digest::from_bytes(&data);
        if computed != *digest {
            return Err(StoreError::DigestMismatch {
                expected: *digest,
                computed,
            });
        }
        Ok(data)
    }
}

/// Copy `reader` to `out` in one pass, hashing as it goes.
fn stream_into<R: Read>(mut reader: R, out: &mut File) -> io::Result<(Digest, u64)> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        out.write_all(&buf[..n])?;
        total += n as u64;
    }
    out.flush()?;
    Ok((Digest::from_raw(hasher.finalize().into()), total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HELLO_HEX: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    fn open_store() -> (TempDir, DigestStore) {
        let dir = TempDir::new().unwrap();
        let store = DigestStore::new(dir.path()).unwrap();
        (dir, store)
    }

    /// Count object files under the two-level fan-out, ignoring leftover
    /// temp files (there should never be any).
    fn object_count(root: &Path) -> usize {
        let mut count = 0;
        for l1 in fs::read_dir(root).unwrap() {
            let l1 = l1.unwrap();
            if !l1.file_type().unwrap().is_dir() {
                continue;
            }
            for l2 in fs::read_dir(l1.path()).unwrap() {
                let l2 = l2.unwrap();
                for obj in fs::read_dir(l2.path()).unwrap() {
                    if obj.unwrap().file_type().unwrap().is_file() {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    fn leftover_files(root: &Path) -> usize {
        fs::read_dir(root)
            .unwrap()
            .filter(|e| e.as_ref().unwrap().file_type().unwrap().is_file())
            .count()
    }

    #[test]
    fn stores_at_sharded_path() {
        let (dir, store) = open_store();
        let digest = store.ensure_present(&b"hello"[..], 5).unwrap();
        assert_eq!(digest.to_hex(), HELLO_HEX);

        let expected = dir
            .path()
            .join(&HELLO_HEX[..2])
            .join(&HELLO_HEX[2..4])
            .join(HELLO_HEX);
        assert_eq!(store.object_path(&digest), expected);
        assert!(expected.is_file());
        assert_eq!(fs::metadata(&expected).unwrap().len(), 5);
    }

    #[test]
    fn placement_is_idempotent() {
        let (dir, store) = open_store();
        let content = b"stored once, referenced twice";
        let d1 = store.ensure_present(&content[..], content.len() as u64).unwrap();
        let d2 = store.ensure_present(&content[..], content.len() as u64).unwrap();
        assert_eq!(d1, d2);
        assert_eq!(object_count(dir.path()), 1);
    }

    #[test]
    fn no_temp_files_left_behind() {
        let (dir, store) = open_store();
        store.ensure_present(&b"first"[..], 5).unwrap();
        store.ensure_present(&b"first"[..], 5).unwrap();
        store.ensure_present(&b"second"[..], 6).unwrap();
        assert_eq!(leftover_files(dir.path()), 0);
    }

    #[test]
    fn empty_content() {
        let (dir, store) = open_store();
        let digest = store.ensure_present(&b""[..], 0).unwrap();
        assert_eq!(digest, Digest::from_bytes(b""));
        assert_eq!(fs::metadata(store.object_path(&digest)).unwrap().len(), 0);
        assert_eq!(object_count(dir.path()), 1);
    }

    #[test]
    fn contains_and_read() {
        let (_dir, store) = open_store();
        let digest = store.ensure_present(&b"read me back"[..], 12).unwrap();
        assert!(store.contains(&digest));
        assert_eq!(store.read(&digest).unwrap(), b"read me back");

        let absent = Digest::from_bytes(b"never stored");
        assert!(!store.contains(&absent));
        assert!(matches!(store.read(&absent), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn read_detects_corruption() {
        let (_dir, store) = open_store();
        let digest = store.ensure_present(&b"pristine"[..], 8).unwrap();
        fs::write(store.object_path(&digest), b"tampered").unwrap();
        assert!(matches!(
            store.read(&digest),
            Err(StoreError::DigestMismatch { .. })
        ));
    }

    #[test]
    fn pre_existing_object_is_trusted() {
        let (dir, store) = open_store();
        let digest = store.ensure_present(&b"original"[..], 8).unwrap();

        // A second writer with the same content must not disturb the file.
        let before = fs::metadata(store.object_path(&digest)).unwrap().modified().unwrap();
        let again = store.ensure_present(&b"original"[..], 8).unwrap();
        assert_eq!(again, digest);
        let after = fs::metadata(store.object_path(&digest)).unwrap().modified().unwrap();
        assert_eq!(before, after);
        assert_eq!(object_count(dir.path()), 1);
    }

    #[test]
    fn large_content_streams() {
        let (_dir, store) = open_store();
        // Larger than the internal copy buffer to exercise the loop.
        let content = vec![0xabu8; 3 * 64 * 1024 + 17];
        let digest = store
            .ensure_present(content.as_slice(), content.len() as u64)
            .unwrap();
        assert_eq!(digest, Digest::from_bytes(&content));
        assert_eq!(
            fs::metadata(store.object_path(&digest)).unwrap().len(),
            content.len() as u64
        );
    }

    #[test]
    fn failing_reader_propagates_io_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("reader exploded"))
            }
        }

        let (dir, store) = open_store();
        assert!(matches!(
            store.ensure_present(Broken, 100),
            Err(StoreError::Io(_))
        ));
        // The temp file must still have been cleaned up.
        assert_eq!(leftover_files(dir.path()), 0);
    }

    #[test]
    fn concurrent_placement_stores_once() {
        use std::sync::Arc;
        use std::thread;

        let (dir, store) = open_store();
        let store = Arc::new(store);
        let content = Arc::new(vec![0x5au8; 128 * 1024]);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let content = Arc::clone(&content);
                thread::spawn(move || {
                    store
                        .ensure_present(content.as_slice(), content.len() as u64)
                        .unwrap()
                })
            })
            .collect();

        let digests: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(digests.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(object_count(dir.path()), 1);
        assert_eq!(leftover_files(dir.path()), 0);
    }

    proptest::proptest! {
        #[test]
        fn ensure_present_twice_stores_exactly_once(content: Vec<u8>) {
            let (dir, store) = open_store();
            let size = content.len() as u64;
            let d1 = store.ensure_present(content.as_slice(), size).unwrap();
            let d2 = store.ensure_present(content.as_slice(), size).unwrap();
            proptest::prop_assert_eq!(d1, d2);
            proptest::prop_assert_eq!(object_count(dir.path()), 1);
            let meta = fs::metadata(store.object_path(&d1)).unwrap();
            proptest::prop_assert_eq!(meta.len(), size);
        }
    }
}
