//! Blob-to-pointer rewrite core.
//!
//! Given one directory snapshot at a time, the [`Rewriter`] replaces the
//! content of every entry whose filename matches a configured glob pattern
//! with a small pointer document, persists the original bytes into a
//! content-addressed side store, and merges the matching declaration into
//! the snapshot's `.gitattributes` entry. The surrounding traversal engine
//! owns commit/tree walking; this crate only ever sees one [`Tree`] and one
//! entry at a time.
//!
//! # Key Types
//!
//! - [`Rewriter`] — the per-entry ([`fix`](Rewriter::fix)) and per-tree
//!   ([`apply`](Rewriter::apply)) transform
//! - [`PathFilter`] — glob-based filename selection
//! - [`Pointer`] — canonical pointer document rendering and parsing
//! - [`attributes`] — `.gitattributes` line construction and merge
//!
//! Conversion is best-effort per entry: a side-store failure leaves the
//! entry unconverted and is logged, while object-database failures propagate
//! to the caller.
//!
//! [`Tree`]: ballast_types::Tree

pub mod attributes;
pub mod error;
pub mod filter;
pub mod pointer;
pub mod rewrite;

pub use attributes::{attributes_line, ATTRIBUTES_FILE};
pub use error::{RewriteError, RewriteResult};
pub use filter::PathFilter;
pub use pointer::Pointer;
pub use rewrite::Rewriter;
