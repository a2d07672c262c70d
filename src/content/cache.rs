//! Revision content cache
//!
//! Downloaded file content keyed by (local path, revision). Revisions are
//! immutable on the server, so a cached entry never goes stale; entries only
//! leave the cache through size-bounded LRU eviction or when the cache's
//! temporary directory is dropped.

use crate::config::schema::ContentConfig;
use crate::content::store::ContentStore;
use crate::error::{CacheError, CacheResult};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Identity of a cached revision
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RevisionKey {
    /// Local path of the file, normalized by components
    pub local_path: PathBuf,
    /// Server revision (changeset number)
    pub revision: u64,
}

impl RevisionKey {
    /// Create a key, normalizing the path
    pub fn new(local_path: &Path, revision: u64) -> Self {
        Self {
            local_path: local_path.components().collect(),
            revision,
        }
    }

    /// File name of the cached content: SHA256 of the full path plus revision
    pub fn file_name(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.local_path.as_os_str().as_encoded_bytes());
        let hash = hex::encode(hasher.finalize());
        format!("{}-r{}", hash, self.revision)
    }
}

/// Bounds on what the cache keeps on disk (0 = unbounded)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLimits {
    /// Maximum number of cached revisions
    pub max_entries: usize,
    /// Maximum total size of cached content in bytes
    pub max_bytes: u64,
}

impl ContentLimits {
    /// No eviction at all
    pub const UNBOUNDED: Self = Self {
        max_entries: 0,
        max_bytes: 0,
    };

    /// Limits from the `[content]` config section
    pub fn from_config(config: &ContentConfig) -> Self {
        Self {
            max_entries: config.max_entries,
            max_bytes: config.max_total_mb.saturating_mul(1024 * 1024),
        }
    }
}

impl Default for ContentLimits {
    fn default() -> Self {
        Self::from_config(&ContentConfig::default())
    }
}

#[derive(Debug)]
struct Entry {
    size: u64,
    last_access: u64,
}

#[derive(Debug, Default)]
struct Index {
    entries: HashMap<String, Entry>,
    total_bytes: u64,
    clock: u64,
}

impl Index {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn over(&self, limits: &ContentLimits) -> bool {
        (limits.max_entries > 0 && self.entries.len() > limits.max_entries)
            || (limits.max_bytes > 0 && self.total_bytes > limits.max_bytes)
    }
}

/// State shared by the cache and the stores it hands out
#[derive(Debug)]
pub(crate) struct Shared {
    dir: TempDir,
    limits: ContentLimits,
    index: Mutex<Index>,
    key_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Shared {
    pub(crate) fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Run `f` while holding the lock that serializes writers of one key
    ///
    /// The lock is shared by name and leaves `key_locks` again once nobody
    /// holds or waits for it, whether `f` succeeds, fails or panics.
    pub(crate) fn with_key_lock<R>(&self, file_name: &str, f: impl FnOnce() -> R) -> R {
        let lock = {
            let mut locks = self.key_locks.lock();
            Arc::clone(locks.entry(file_name.to_string()).or_default())
        };
        let _release = KeyLockRelease {
            shared: self,
            file_name,
            lock: &lock,
        };
        let _guard = lock.lock();
        f()
    }

    /// Refresh recency of an entry
    pub(crate) fn touch(&self, file_name: &str) {
        let mut index = self.index.lock();
        let now = index.tick();
        if let Some(entry) = index.entries.get_mut(file_name) {
            entry.last_access = now;
        }
    }

    /// Register freshly persisted content, then evict down to the limits
    pub(crate) fn record(&self, file_name: &str, size: u64) {
        let mut index = self.index.lock();
        let now = index.tick();
        let previous = index.entries.insert(
            file_name.to_string(),
            Entry {
                size,
                last_access: now,
            },
        );
        if let Some(previous) = previous {
            index.total_bytes -= previous.size;
        }
        index.total_bytes += size;

        self.evict(&mut index, file_name);
    }

    fn forget(&self, file_name: &str) {
        let mut index = self.index.lock();
        if let Some(entry) = index.entries.remove(file_name) {
            index.total_bytes -= entry.size;
        }
    }

    fn contains(&self, file_name: &str) -> bool {
        self.index.lock().entries.contains_key(file_name)
    }

    /// Drop least recently used entries until the limits hold
    ///
    /// `keep` and entries whose key lock is held elsewhere are never evicted.
    fn evict(&self, index: &mut Index, keep: &str) {
        while index.over(&self.limits) {
            let mut locks = self.key_locks.lock();
            let victim = index
                .entries
                .iter()
                .filter(|(name, _)| name.as_str() != keep)
                .filter(|(name, _)| {
                    locks
                        .get(name.as_str())
                        .is_none_or(|lock| Arc::strong_count(lock) == 1)
                })
                .min_by_key(|(_, entry)| entry.last_access)
                .map(|(name, _)| name.clone());

            let Some(name) = victim else {
                break;
            };
            // Held until the file is gone so no writer can recreate it first
            locks.remove(&name);

            if let Some(entry) = index.entries.remove(&name) {
                index.total_bytes -= entry.size;
                info!("Evicting cached content {} ({} bytes)", name, entry.size);
            }

            let path = self.root().join(&name);
            if let Err(e) = fs::remove_file(&path) {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!("Failed to remove evicted content {}: {}", path.display(), e);
                }
            }
        }
    }
}

/// Drops a key lock from `key_locks` when its last user lets go
struct KeyLockRelease<'a> {
    shared: &'a Shared,
    file_name: &'a str,
    lock: &'a Arc<Mutex<()>>,
}

impl Drop for KeyLockRelease<'_> {
    fn drop(&mut self) {
        let mut locks = self.shared.key_locks.lock();
        let unused = locks
            .get(self.file_name)
            .is_some_and(|held| Arc::ptr_eq(held, self.lock) && Arc::strong_count(held) == 2);
        if unused {
            locks.remove(self.file_name);
        }
    }
}

/// Cache of downloaded revision content in a private temporary directory
///
/// The directory is removed when the cache and every store it handed out
/// have been dropped.
#[derive(Debug, Clone)]
pub struct RevisionContentCache {
    shared: Arc<Shared>,
}

impl RevisionContentCache {
    /// Create a cache owning `dir`
    pub fn new(dir: TempDir, limits: ContentLimits) -> Self {
        debug!("Revision content cache at {}", dir.path().display());
        Self {
            shared: Arc::new(Shared {
                dir,
                limits,
                index: Mutex::new(Index::default()),
                key_locks: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Create a cache in a fresh directory under the system temp dir
    pub fn in_temp_dir(limits: ContentLimits) -> CacheResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("tfvc-content-")
            .tempdir()
            .map_err(|e| CacheError::io("creating content cache directory", e))?;
        Ok(Self::new(dir, limits))
    }

    /// Create a cache as described by the `[content]` config section
    pub fn from_config(config: &ContentConfig) -> CacheResult<Self> {
        let limits = ContentLimits::from_config(config);
        let Some(parent) = &config.temp_parent else {
            return Self::in_temp_dir(limits);
        };

        fs::create_dir_all(parent).map_err(|e| {
            CacheError::io(format!("creating directory {}", parent.display()), e)
        })?;
        let dir = tempfile::Builder::new()
            .prefix("tfvc-content-")
            .tempdir_in(parent)
            .map_err(|e| CacheError::io("creating content cache directory", e))?;
        Ok(Self::new(dir, limits))
    }

    /// Directory holding the cached content
    pub fn root(&self) -> &Path {
        self.shared.root()
    }

    /// Look up content already cached for the revision
    ///
    /// The returned store is not pinned: a save of another revision may
    /// evict it before [`ContentStore::load_content`] runs, which then fails
    /// with an IO error. Use [`find_or_create`](Self::find_or_create) to
    /// look up and read under the key lock.
    pub fn find(&self, local_path: &Path, revision: u64) -> Option<ContentStore> {
        let store = self.create(local_path, revision);
        let name = store.file_name();

        if !self.shared.contains(name) {
            debug!("Content miss: {} r{}", local_path.display(), revision);
            return None;
        }
        if !store.path().is_file() {
            warn!("Cached content {} vanished from disk", name);
            self.shared.forget(name);
            return None;
        }

        self.shared.touch(name);
        debug!("Content hit: {} r{}", local_path.display(), revision);
        Some(store)
    }

    /// Handle for storing content of the revision
    ///
    /// Nothing is written until [`ContentStore::save_content`] is called.
    pub fn create(&self, local_path: &Path, revision: u64) -> ContentStore {
        ContentStore::new(
            Arc::clone(&self.shared),
            RevisionKey::new(local_path, revision),
        )
    }

    /// Return cached content, downloading it through `download` on a miss
    ///
    /// Concurrent callers for the same revision wait for each other, so the
    /// download runs at most once.
    pub fn find_or_create<F>(
        &self,
        local_path: &Path,
        revision: u64,
        download: F,
    ) -> CacheResult<Vec<u8>>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let store = self.create(local_path, revision);
        self.shared.with_key_lock(store.file_name(), || {
            if let Some(found) = self.find(local_path, revision) {
                return found.load_content();
            }

            store.write_locked(download)?;
            store.load_content()
        })
    }

    /// Number of cached revisions
    pub fn len(&self) -> usize {
        self.shared.index.lock().entries.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total size of cached content in bytes
    pub fn total_bytes(&self) -> u64 {
        self.shared.index.lock().total_bytes
    }
}
