//! Cache of downloaded revision content
//!
//! Keyed by (local path, revision). Content for a historical revision is
//! fetched from the server once and read back from a private temporary
//! directory afterwards.
//!
//! # Layout
//!
//! One flat directory, one file per revision, named
//! `<sha256 of the local path>-r<revision>`. The directory has no schema and
//! does not survive the cache: it is removed when the cache is dropped.

pub mod cache;
pub mod store;

pub use cache::{ContentLimits, RevisionContentCache, RevisionKey};
pub use store::ContentStore;
