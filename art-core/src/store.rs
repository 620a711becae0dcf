//! Key-value byte stores used for document autosave.
//!
//! The document handle only needs `get` and `put`. [`MemoryStore`] keeps blobs
//! in process; [`FileStore`] writes one file per key into a data directory.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::StoreError;

/// Key under which the open document is persisted.
pub const DOCUMENT_KEY: &str = "EmojiArtDocument.Untitled";

/// A best-effort key-value blob store.
pub trait ByteStore: Send + Sync + fmt::Debug {
    /// Read the blob stored under `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

impl<S: ByteStore + ?Sized> ByteStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, bytes)
    }
}

/// Thread-safe in-memory store. Clones share the same contents.
///
/// # Example
///
/// ```
/// use art_core::{ByteStore, MemoryStore, DOCUMENT_KEY};
///
/// let store = MemoryStore::new();
/// store.put(DOCUMENT_KEY, b"{}").unwrap();
/// assert_eq!(store.get(DOCUMENT_KEY).unwrap().as_deref(), Some(&b"{}"[..]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with one blob.
    #[must_use]
    pub fn with_blob(key: &str, bytes: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store
            .blobs
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_string(), bytes.into());
        store
    }
}

impl ByteStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let blobs = self
            .blobs
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(blobs.get(key).cloned())
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let mut blobs = self
            .blobs
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Filesystem store writing `<data_dir>/<sanitized key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    /// The directory blobs are written to.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", sanitize_filename(key)))
    }
}

impl ByteStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key);
        // Readers never observe a partially written document.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        tracing::trace!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

/// Sanitize a store key for use as a filename.
///
/// Replaces any character that is not alphanumeric, `-`, or `_` with `_`.
fn sanitize_filename(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
