//! Foundation types for Ballast.
//!
//! Ballast rewrites large file contents inside version-control trees into
//! small pointer records backed by a content-addressed side store. This crate
//! provides the types shared by every other Ballast crate.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Opaque handle into the version-control object database
//! - [`Digest`] — SHA-256 content digest identifying side-stored bytes
//! - [`FileMode`] — File mode of a tree entry (regular, executable, ...)
//! - [`TreeEntry`] — One named file within a directory snapshot
//! - [`Tree`] — A directory snapshot: name-sorted set of entries

pub mod digest;
pub mod error;
pub mod object;
pub mod tree;

pub use digest::Digest;
pub use error::TypeError;
pub use object::ObjectId;
pub use tree::{FileMode, Tree, TreeEntry};
