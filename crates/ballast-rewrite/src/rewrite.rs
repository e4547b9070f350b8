use std::path::Path;

use tracing::{debug, warn};

use ballast_odb::ObjectDatabase;
use ballast_store::{DigestStore, StoreError};
use ballast_types::{Digest, FileMode, Tree, TreeEntry};

use crate::attributes::{attributes_line, merge_line, ATTRIBUTES_FILE};
use crate::error::RewriteResult;
use crate::filter::PathFilter;
use crate::pointer::Pointer;

/// Outcome of the hash-and-store step for one entry.
///
/// Filter misses and store failures both leave the entry unconverted, but
/// they are distinct branches: a miss is silent, a failure is logged.
enum Placement {
    /// Content is in the side store under this digest.
    Stored { digest: Digest, size: u64 },
    /// Filename did not match the configured pattern.
    NotApplicable,
    /// Hashing or placement failed; conversion is skipped for this entry.
    Failed(StoreError),
}

/// The blob-to-pointer transform for one configured pattern and side store.
///
/// Immutable after construction and shareable across worker threads; the
/// object database handle is passed into each call so the traversal engine
/// can keep one handle per worker.
#[derive(Debug)]
pub struct Rewriter {
    filter: PathFilter,
    store: DigestStore,
}

impl Rewriter {
    /// Create a rewriter for a filename pattern and a side-store root.
    ///
    /// The store root is created eagerly; an invalid pattern or an unusable
    /// root is a constructor error.
    pub fn new(pattern: &str, store_root: impl AsRef<Path>) -> RewriteResult<Self> {
        Ok(Self {
            filter: PathFilter::new(pattern)?,
            store: DigestStore::new(store_root)?,
        })
    }

    /// The configured filename pattern.
    pub fn pattern(&self) -> &str {
        self.filter.as_str()
    }

    /// The side store backing this rewriter.
    pub fn store(&self) -> &DigestStore {
        &self.store
    }

    /// Convert a single tree entry, best-effort.
    ///
    /// Entries whose name does not match the pattern pass through unchanged,
    /// as do entries whose content could not be placed into the side store.
    /// Object database failures propagate: if the original content cannot be
    /// read or the pointer blob cannot be inserted, the entry's conversion
    /// is fatal to the caller.
    pub fn fix(&self, odb: &dyn ObjectDatabase, entry: &TreeEntry) -> RewriteResult<TreeEntry> {
        match self.place(odb, entry)? {
            Placement::NotApplicable => Ok(entry.clone()),
            Placement::Failed(err) => {
                warn!(
                    name = %entry.name,
                    error = %err,
                    "side store placement failed; leaving entry unconverted"
                );
                Ok(entry.clone())
            }
            Placement::Stored { digest, size } => {
                let pointer = Pointer::new(digest, size);
                let id = odb.insert_blob(pointer.to_text().as_bytes())?;
                debug!(name = %entry.name, digest = %digest, size, "converted entry to pointer");
                Ok(entry.with_id(id))
            }
        }
    }

    /// Convert one directory snapshot.
    ///
    /// Runs [`fix`](Self::fix) over every entry. If nothing changed the
    /// input tree is returned as-is and the attributes entry is not touched.
    /// Otherwise the configured attributes line is merged into the
    /// snapshot's `.gitattributes` entry — created if absent, reused
    /// unchanged if the line is already present verbatim — and the entry is
    /// (re)recorded as a regular file.
    pub fn apply(&self, odb: &dyn ObjectDatabase, tree: &Tree) -> RewriteResult<Tree> {
        let mut converted = Vec::with_capacity(tree.len());
        for entry in tree {
            converted.push(self.fix(odb, entry)?);
        }
        let mut candidate = Tree::new(converted);
        if candidate == *tree {
            return Ok(candidate);
        }

        let line = attributes_line(self.filter.as_str());
        let attrs_id = match candidate.get(ATTRIBUTES_FILE) {
            None => odb.insert_blob(format!("{line}\n").as_bytes())?,
            Some(existing) => {
                let data = odb.read_blob(&existing.id)?;
                let text = String::from_utf8_lossy(&data);
                match merge_line(&text, &line) {
                    None => existing.id,
                    Some(merged) => odb.insert_blob(merged.as_bytes())?,
                }
            }
        };
        candidate.upsert(TreeEntry::new(FileMode::Regular, ATTRIBUTES_FILE, attrs_id));
        Ok(candidate)
    }

    /// Filter, then hash-and-store. The explicit outcome keeps the
    /// best-effort skip a visible branch in [`fix`](Self::fix).
    fn place(&self, odb: &dyn ObjectDatabase, entry: &TreeEntry) -> RewriteResult<Placement> {
        if !self.filter.matches(&entry.name) {
            return Ok(Placement::NotApplicable);
        }
        let reader = odb.open_blob(&entry.id)?;
        let size = reader.size();
        match self.store.ensure_present(reader, size) {
            Ok(digest) => Ok(Placement::Stored { digest, size }),
            Err(err) => Ok(Placement::Failed(err)),
        }
    }
}
