//! Handle to one cached revision

use crate::content::cache::{RevisionKey, Shared};
use crate::error::{CacheError, CacheResult};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::debug;

/// Backing file for the content of one (path, revision) pair
#[derive(Debug)]
pub struct ContentStore {
    shared: Arc<Shared>,
    key: RevisionKey,
    file_name: String,
}

impl ContentStore {
    pub(crate) fn new(shared: Arc<Shared>, key: RevisionKey) -> Self {
        let file_name = key.file_name();
        Self {
            shared,
            key,
            file_name,
        }
    }

    /// The revision this store holds
    pub fn key(&self) -> &RevisionKey {
        &self.key
    }

    /// Location of the backing file
    pub fn path(&self) -> PathBuf {
        self.shared.root().join(&self.file_name)
    }

    pub(crate) fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Store the bytes produced by `write`
    ///
    /// The content only becomes visible to `find` once `write` has finished
    /// successfully.
    pub fn save_content<F>(&self, write: F) -> CacheResult<()>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        self.shared
            .with_key_lock(&self.file_name, || self.write_locked(write))
    }

    /// Store `bytes` as the content
    pub fn save_bytes(&self, bytes: &[u8]) -> CacheResult<()> {
        self.save_content(|w| w.write_all(bytes))
    }

    /// Write content; the caller holds the key lock
    pub(crate) fn write_locked<F>(&self, write: F) -> CacheResult<()>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let context = || {
            format!(
                "writing content of {} r{}",
                self.key.local_path.display(),
                self.key.revision
            )
        };

        let mut tmp = NamedTempFile::new_in(self.shared.root())
            .map_err(|e| CacheError::io("creating temporary content file", e))?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            write(&mut writer).map_err(|e| CacheError::io(context(), e))?;
            writer.flush().map_err(|e| CacheError::io(context(), e))?;
        }

        let size = tmp
            .as_file()
            .metadata()
            .map_err(|e| CacheError::io(context(), e))?
            .len();
        tmp.persist(self.path())
            .map_err(|e| CacheError::io(context(), e.error))?;

        debug!(
            "Cached {} bytes for {} r{}",
            size,
            self.key.local_path.display(),
            self.key.revision
        );
        self.shared.record(&self.file_name, size);
        Ok(())
    }

    /// Read the whole content back
    pub fn load_content(&self) -> CacheResult<Vec<u8>> {
        let path = self.path();
        let content = fs::read(&path).map_err(|e| {
            CacheError::io(format!("reading cached content {}", path.display()), e)
        })?;
        self.shared.touch(&self.file_name);
        Ok(content)
    }
}
