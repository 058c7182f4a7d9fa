//! Placeholder cache
//!
//! Blur placeholder generation is the most expensive pipeline step (image
//! decode + resize), so results are cached on disk keyed by image path with
//! the file's mtime as the invalidation token.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Cache file name, relative to the base directory
const CACHE_FILE: &str = ".mdxgen-cache/placeholders.json";

/// A cached placeholder for one cover image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderEntry {
    /// Source image mtime (unix timestamp) at encode time
    pub mtime: u64,
    /// The encoded data URL
    pub data_url: String,
}

/// On-disk cache of blur placeholders, keyed by image reference
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlaceholderCache {
    /// Version of the cache format
    pub version: u32,
    /// Placeholder size the entries were encoded at; a config change
    /// invalidates the whole cache
    pub size: u32,
    pub entries: HashMap<String, PlaceholderEntry>,
}

impl PlaceholderCache {
    /// Current cache format version
    const VERSION: u32 = 1;

    /// Load cache from disk, or create a new empty cache
    pub fn load(base_dir: &Path, size: u32) -> Self {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Ok(content) = fs::read_to_string(&cache_path) {
            if let Ok(cache) = serde_json::from_str::<PlaceholderCache>(&content) {
                if cache.version == Self::VERSION && cache.size == size {
                    return cache;
                }
                tracing::info!("Placeholder cache stale, rebuilding");
            }
        }
        Self {
            version: Self::VERSION,
            size,
            entries: HashMap::new(),
        }
    }

    /// Save cache to disk
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(cache_path, content)?;
        Ok(())
    }

    /// Look up a placeholder, honoring the mtime invalidation token.
    pub fn get(&self, image_ref: &str, mtime: u64) -> Option<&str> {
        self.entries
            .get(image_ref)
            .filter(|entry| entry.mtime == mtime)
            .map(|entry| entry.data_url.as_str())
    }

    pub fn insert(&mut self, image_ref: &str, mtime: u64, data_url: String) {
        self.entries
            .insert(image_ref.to_string(), PlaceholderEntry { mtime, data_url });
    }
}

/// Remove the cache directory entirely.
pub fn clear(base_dir: &Path) -> Result<()> {
    let cache_dir = base_dir.join(".mdxgen-cache");
    if cache_dir.exists() {
        fs::remove_dir_all(&cache_dir)?;
        tracing::info!("Cache cleared");
    }
    Ok(())
}

/// Get file modification time as unix timestamp
pub fn file_mtime(path: &Path) -> Result<u64> {
    let metadata = fs::metadata(path)?;
    let mtime = metadata.modified()?;
    Ok(mtime
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PlaceholderCache::load(dir.path(), 20);
        cache.insert("/static/images/hi.png", 1000, "data:image/jpeg;base64,x".to_string());
        cache.save(dir.path()).unwrap();

        let loaded = PlaceholderCache::load(dir.path(), 20);
        assert_eq!(
            loaded.get("/static/images/hi.png", 1000),
            Some("data:image/jpeg;base64,x")
        );
    }

    #[test]
    fn test_mtime_invalidates_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PlaceholderCache::load(dir.path(), 20);
        cache.insert("/cover.png", 1000, "old".to_string());
        assert!(cache.get("/cover.png", 2000).is_none());
    }

    #[test]
    fn test_size_change_invalidates_cache() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = PlaceholderCache::load(dir.path(), 20);
        cache.insert("/cover.png", 1000, "old".to_string());
        cache.save(dir.path()).unwrap();

        let loaded = PlaceholderCache::load(dir.path(), 32);
        assert!(loaded.entries.is_empty());
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PlaceholderCache::load(dir.path(), 20);
        cache.save(dir.path()).unwrap();
        assert!(dir.path().join(CACHE_FILE).exists());

        clear(dir.path()).unwrap();
        assert!(!dir.path().join(CACHE_FILE).exists());
    }
}
