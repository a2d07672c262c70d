//! Mapping root classification cache
//!
//! Remembers which local directories are workspace mapping roots and which
//! are known to be outside any mapping, so "is this path under version
//! control?" can usually be answered without asking the VCS client.
//!
//! Only two facts are stored: `IsMappingRoot` and `NoRoot`. Everything else
//! is derived at query time from ancestors and descendants of the queried
//! path. Mapping roots never nest, so every new fact evicts the stored
//! facts it contradicts.
//!
//! # Derivation rules
//!
//! | Stored entry relative to query | Stored status | Result |
//! |--------------------------------|---------------|--------|
//! | same path | any | stored status |
//! | descendant | `NoRoot` | `NoRoot` |
//! | descendant | `IsMappingRoot` | `NoRoot` |
//! | ancestor | `IsMappingRoot` | `UnderMappingRoot` |
//! | none of the above | | `Unknown` |
//!
//! Entries are scanned in `HashMap` order and the first matching rule wins.
//! Contradictory entries cannot coexist after a write completes, but the
//! cache does not rank rules against each other.

use crate::error::{CacheError, CacheResult};
use crate::workspace::Mapping;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, trace};

/// Directory name fragments reserved for the VCS client's private storage
const SERVICE_DIRECTORY_MARKERS: &[&str] = &["$tf", ".tf"];

/// What the cache knows about a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CachedStatus {
    /// Nothing is known
    Unknown,
    /// The path is a workspace mapping root
    IsMappingRoot,
    /// The path is inside a mapping root without being one
    UnderMappingRoot,
    /// The path is not under any mapping root
    NoRoot,
}

impl fmt::Display for CachedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::IsMappingRoot => "is-mapping-root",
            Self::UnderMappingRoot => "under-mapping-root",
            Self::NoRoot => "no-root",
        };
        write!(f, "{}", name)
    }
}

/// Whether the path points into the VCS client's service directory
pub fn is_in_service_directory(path: &Path) -> bool {
    let path = path.to_string_lossy().to_lowercase();
    SERVICE_DIRECTORY_MARKERS
        .iter()
        .any(|marker| path.contains(marker))
}

fn assert_no_service_directory(path: &Path) -> CacheResult<()> {
    if is_in_service_directory(path) {
        return Err(CacheError::invalid_path(
            path,
            "path contains the VCS service directory name",
        ));
    }
    Ok(())
}

/// `ancestor` is a proper prefix of `path`, compared by components
fn is_strict_ancestor(ancestor: &Path, path: &Path) -> bool {
    path.starts_with(ancestor) && ancestor != path
}

/// Thread-safe cache of mapping root facts
#[derive(Debug, Default)]
pub struct RootCache {
    data: RwLock<HashMap<PathBuf, CachedStatus>>,
}

impl RootCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Determine a path's status from cached facts
    pub fn get(&self, path: &Path) -> CachedStatus {
        let data = self.data.read();

        if let Some(status) = data.get(path) {
            trace!("{}: {} (cache hit)", path.display(), status);
            return *status;
        }

        for (key, value) in data.iter() {
            let is_child = is_strict_ancestor(path, key);
            let is_parent = is_strict_ancestor(key, path);

            let derived = match value {
                CachedStatus::NoRoot | CachedStatus::IsMappingRoot if is_child => {
                    CachedStatus::NoRoot
                }
                CachedStatus::IsMappingRoot if is_parent => CachedStatus::UnderMappingRoot,
                _ => continue,
            };

            trace!(
                "{}: {} (derived from {} being {})",
                path.display(),
                derived,
                key.display(),
                value
            );
            return derived;
        }

        CachedStatus::Unknown
    }

    /// Record that neither `path` nor any of its ancestors is a mapping root
    pub fn put_no_mappings_for(&self, path: &Path) -> CacheResult<()> {
        assert_no_service_directory(path)?;
        trace!("New path without mapping roots: {}", path.display());

        let mut data = self.data.write();
        data.retain(|key, value| {
            let contradicted =
                *value == CachedStatus::IsMappingRoot && is_strict_ancestor(key, path);
            if contradicted {
                info!(
                    "Evicting information about {} being {} because {} is {}",
                    key.display(),
                    value,
                    path.display(),
                    CachedStatus::NoRoot
                );
            }
            !contradicted
        });
        data.insert(path.to_path_buf(), CachedStatus::NoRoot);
        Ok(())
    }

    /// Record the local paths of `mappings` as mapping roots
    ///
    /// Any other root nested with a new root is evicted. Every stored
    /// `NoRoot` fact is evicted too, related to the new root or not.
    pub fn put_mappings(&self, mappings: &[Mapping]) -> CacheResult<()> {
        for mapping in mappings {
            assert_no_service_directory(&mapping.local_path)?;
        }

        let mut data = self.data.write();
        for mapping in mappings {
            let path = mapping.local_path.as_path();
            trace!("New mapping root: {}", path.display());

            data.retain(|key, value| {
                if key == path {
                    return true;
                }
                let contradicted = match value {
                    CachedStatus::NoRoot => true,
                    CachedStatus::IsMappingRoot => {
                        is_strict_ancestor(path, key) || is_strict_ancestor(key, path)
                    }
                    _ => false,
                };
                if contradicted {
                    info!(
                        "Evicting information about {} being {} because {} is {}",
                        key.display(),
                        value,
                        path.display(),
                        CachedStatus::IsMappingRoot
                    );
                }
                !contradicted
            });
            data.insert(path.to_path_buf(), CachedStatus::IsMappingRoot);
        }
        Ok(())
    }

    /// Snapshot of the stored facts
    pub fn entries(&self) -> Vec<(PathBuf, CachedStatus)> {
        let data = self.data.read();
        let mut entries: Vec<_> = data.iter().map(|(k, v)| (k.clone(), *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Number of stored facts
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether no facts are stored
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Forget everything
    pub fn clear(&self) {
        self.data.write().clear();
    }
}
