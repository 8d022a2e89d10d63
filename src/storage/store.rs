//! Durable key-value blob stores

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Durable storage for serialized cache blobs
pub trait CacheStore: Send + Sync {
    /// Read a blob, `None` if it was never written
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace a blob
    fn save(&self, key: &str, blob: &str) -> Result<()>;

    /// Delete a blob; missing blobs are not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Stores each blob as `{dir}/{key}.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `dir`, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache directory {:?}", dir))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl CacheStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {:?}", path)),
        }
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        let path = self.path_for(key);

        // Write to a temp file then rename so readers never see a partial blob
        let temp_path = path.with_extension("tmp");
        let mut file = std::fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create {:?}", temp_path))?;
        file.write_all(blob.as_bytes())
            .context("Failed to write cache blob")?;
        file.flush().context("Failed to flush cache blob")?;
        drop(file);

        std::fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to move cache blob into {:?}", path))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {:?}", path)),
        }
    }
}

/// In-process store, for tests and for running without persistence
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
    writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob without counting it as a write
    pub fn with_blob(self, key: &str, blob: &str) -> Self {
        self.blobs.lock().insert(key.to_string(), blob.to_string());
        self
    }

    /// Number of successful `save` calls
    pub fn writes(&self) -> usize {
        *self.writes.lock()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.blobs.lock().get(key).cloned()
    }
}

impl CacheStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        self.blobs.lock().insert(key.to_string(), blob.to_string());
        *self.writes.lock() += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.blobs.lock().remove(key);
        Ok(())
    }
}
