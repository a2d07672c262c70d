//! tfvc-cache - local state caches for a TFVC client
//!
//! Three independent caches that let a version-control client answer common
//! questions without a round trip to the server:
//!
//! - [`roots`] classifies local paths against workspace mapping roots
//! - [`workspace`] computes the mapping commands needed to reconcile a
//!   workspace with its desired state
//! - [`content`] keeps downloaded revision content in a temporary directory

pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod roots;
pub mod workspace;

pub use error::{CacheError, CacheResult};
