//! # Storage Backends
//!
//! The string-keyed storage abstraction the whole persistence layer sits on.
//!
//! ## The Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        StorageBackend                                   │
//! │                                                                         │
//! │   get(key)    ──► Some(json string) | None                             │
//! │   set(key, v) ──► value replaced wholesale (no partial writes)         │
//! │   remove(key) ──► idempotent                                           │
//! │                                                                         │
//! │   Values are opaque JSON documents. Typing, defaults and corruption    │
//! │   handling live one level up, in Store.                                │
//! │                                                                         │
//! │   ┌──────────────────┐          ┌──────────────────┐                   │
//! │   │   FileBackend    │          │  MemoryBackend   │                   │
//! │   │  <dir>/<key>.json│          │  HashMap (tests) │                   │
//! │   └──────────────────┘          └──────────────────┘                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The whole store is read/written as a unit on every mutation - there is a
//! single local operator, so no row-level locking exists or is needed.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use crate::error::StoreResult;

// =============================================================================
// Trait
// =============================================================================

/// Key-value storage of JSON documents.
pub trait StorageBackend: Send + Sync + fmt::Debug {
    /// Returns the raw JSON stored under `key`, or None if absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

// =============================================================================
// File Backend
// =============================================================================

/// Stores each key as `<data_dir>/<key>.json`.
///
/// Writes go through a sibling temp file and a rename, so a crash mid-write
/// leaves the previous document intact (which the corruption fallback would
/// otherwise turn into an empty collection).
#[derive(Debug)]
pub struct FileBackend {
    data_dir: PathBuf,
}

impl FileBackend {
    /// Opens (and creates, if needed) the data directory.
    pub fn open(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        debug!(dir = %data_dir.display(), "File backend ready");
        Ok(FileBackend { data_dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        let tmp = self.data_dir.join(format!("{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Memory Backend
// =============================================================================

/// In-memory storage for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        MemoryBackend::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.lock().expect("memory backend poisoned");
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().expect("memory backend poisoned");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().expect("memory backend poisoned");
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
