use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

use super::key_gen::file_stem;

/// Key-value storage backing the contributor cache.
///
/// Stores hold opaque bytes; decoding belongs to the caller.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Whether values survive between reads; the no-op store says no
    fn is_persistent(&self) -> bool {
        true
    }
}

/// One file per key under a cache directory
pub struct FileCacheStore {
    base_dir: PathBuf,
}

impl FileCacheStore {
    pub fn new(base_dir: PathBuf) -> Self {
        FileCacheStore { base_dir }
    }

    /// Get path for a cache key
    pub fn get_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.cache", file_stem(key)))
    }
}

impl CacheStore for FileCacheStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.get_path(key);

        if !path.exists() {
            return Ok(None);
        }

        fs::read(&path)
            .map(Some)
            .with_context(|| format!("Failed to read cache: {:?}", path))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.get_path(key);

        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("Failed to create cache directory: {:?}", self.base_dir))?;

        // Write then rename so readers never see a partial entry
        let tmp_path = path.with_extension("cache.tmp");
        fs::write(&tmp_path, value)
            .with_context(|| format!("Failed to write cache: {:?}", tmp_path))?;
        fs::rename(&tmp_path, &path)
            .with_context(|| format!("Failed to write cache: {:?}", path))?;

        debug!("Wrote cache entry: {:?}", path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.get_path(key);

        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete cache: {:?}", path))?;
            debug!("Deleted cache entry: {:?}", path);
        }

        Ok(())
    }
}

/// Process-local store
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory cache lock poisoned"))
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// Store for environments without local persistence
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCacheStore;

impl CacheStore for NoopCacheStore {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &[u8]) -> Result<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_operations() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCacheStore::new(temp_dir.path().join("cache"));

        assert_eq!(store.get("key").unwrap(), None);

        store.set("key", b"value one").unwrap();
        assert_eq!(store.get("key").unwrap(), Some(b"value one".to_vec()));

        store.set("key", b"value two").unwrap();
        assert_eq!(store.get("key").unwrap(), Some(b"value two".to_vec()));
        assert!(!store.get_path("key").with_extension("cache.tmp").exists());

        store.remove("key").unwrap();
        assert_eq!(store.get("key").unwrap(), None);

        // Removing a missing entry is fine
        store.remove("key").unwrap();
    }

    #[test]
    fn test_file_store_keeps_raw_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCacheStore::new(temp_dir.path().to_path_buf());

        store.set("key", &[0xff, 0xfe, 0x00]).unwrap();
        assert_eq!(store.get("key").unwrap(), Some(vec![0xff, 0xfe, 0x00]));
    }

    #[test]
    fn test_file_store_hashes_unsafe_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCacheStore::new(temp_dir.path().to_path_buf());

        let path = store.get_path("../escape");
        assert_eq!(path.parent().unwrap(), temp_dir.path());

        store.set("../escape", b"x").unwrap();
        assert_eq!(store.get("../escape").unwrap(), Some(b"x".to_vec()));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCacheStore::new();
        assert!(store.is_persistent());

        store.set("a", b"1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some(b"1".to_vec()));
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_noop_store_holds_nothing() {
        let store = NoopCacheStore;
        assert!(!store.is_persistent());

        store.set("a", b"1").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }
}
