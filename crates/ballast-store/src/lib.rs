//! Sharded content-addressed side store for Ballast.
//!
//! Large file contents pulled out of a version-control tree land here,
//! keyed by their SHA-256 digest under a two-level hex fan-out:
//!
//! ```text
//! <root>/
//! └── 2c/
//!     └── f2/
//!         └── 2cf24dba5fb0a30e26e83b2ac5b9e29e...938b9824
//! ```
//!
//! # Design Rules
//!
//! 1. Placement is idempotent: content with identical bytes is stored
//!    exactly once, however many tree entries reference it.
//! 2. Content is streamed, never held in memory as a whole.
//! 3. Concurrent writers racing on one digest are resolved by a no-clobber
//!    atomic rename; exactly one write wins, the rest degrade to an
//!    existence check. Workers in separate processes sharing the store
//!    directory are covered by the same mechanism.
//! 4. Temporary files are private to one [`DigestStore::ensure_present`]
//!    call and removed before it returns, success or not.

pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::DigestStore;
