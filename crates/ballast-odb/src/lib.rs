//! Object database seam for Ballast.
//!
//! The rewrite core does not own a version-control object database; it reads
//! original blob content and inserts replacement blobs through the
//! [`ObjectDatabase`] trait defined here. The surrounding traversal engine
//! supplies an implementation, one handle per worker thread.
//!
//! # Design Rules
//!
//! 1. Blobs are immutable once written (content-addressing guarantees this).
//! 2. Insertion is idempotent: the same bytes always yield the same handle.
//! 3. Reads are streaming: [`BlobReader`] carries the declared size but the
//!    caller decides how much to buffer.
//! 4. All I/O errors are propagated, never silently ignored.
//!
//! [`InMemoryOdb`] is the `HashMap`-based backend used by tests and
//! embedders.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{OdbError, OdbResult};
pub use memory::InMemoryOdb;
pub use traits::{BlobReader, ObjectDatabase};
