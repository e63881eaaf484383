//! Minimal string key-value stores backing the response cache.
//!
//! The TTL policy lives in [`super::TtlCache`]; stores only move bytes.
//! Neither store is assumed durable or shared across processes.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use parking_lot::RwLock;
use tracing::warn;

/// String KV boundary so the storage medium is swappable without
/// touching the orchestrator.
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// Process-local store; contents vanish on exit.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: &str, value: String) {
        self.entries.write().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

/// One file per key under a directory.
///
/// Write and remove failures are logged and swallowed: the cache is an
/// optimization, never a reason to fail a fetch.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> io::Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn put(&self, key: &str, value: String) {
        let path = self.path_for(key);
        if let Err(e) = std::fs::write(&path, value) {
            warn!(path = %path.display(), error = %e, "cache write failed");
        }
    }

    fn remove(&self, key: &str) {
        let path = self.path_for(key);
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "cache remove failed");
            }
        }
    }
}
