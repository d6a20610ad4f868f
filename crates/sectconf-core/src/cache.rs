//! Caller-owned cache of loaded configurations
//!
//! Programs that ask for the same configuration file from many places can
//! share one [`ConfigCache`] so that each file is read and parsed once.
//! Entries are keyed by the name the caller asked for, not by the located
//! path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::config::{Config, ConfigOptions};
use crate::error::Result;

/// Thread-safe map from requested file name to loaded [`Config`]
#[derive(Debug, Default)]
pub struct ConfigCache {
    entries: RwLock<HashMap<PathBuf, Arc<Config>>>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached config for `name`, loading it on first use
    pub fn get_or_load(&self, name: impl AsRef<Path>, options: &ConfigOptions) -> Result<Arc<Config>> {
        let name = name.as_ref();
        if let Some(config) = self.get(name) {
            log::debug!("Configuration cache hit for {}", name.display());
            return Ok(config);
        }

        let loaded = Arc::new(Config::load(name, options)?);
        let mut entries = self.entries.write().expect("config cache lock poisoned");
        // another thread may have filled the entry while we were loading
        let config = entries
            .entry(name.to_path_buf())
            .or_insert_with(|| loaded)
            .clone();
        log::debug!("Cached configuration for {}", name.display());
        Ok(config)
    }

    pub fn get(&self, name: impl AsRef<Path>) -> Option<Arc<Config>> {
        let entries = self.entries.read().expect("config cache lock poisoned");
        entries.get(name.as_ref()).cloned()
    }

    /// Store `config` under `name`, returning the entry it replaced
    pub fn insert(&self, name: impl Into<PathBuf>, config: Config) -> Option<Arc<Config>> {
        let mut entries = self.entries.write().expect("config cache lock poisoned");
        entries.insert(name.into(), Arc::new(config))
    }

    pub fn remove(&self, name: impl AsRef<Path>) -> Option<Arc<Config>> {
        let mut entries = self.entries.write().expect("config cache lock poisoned");
        entries.remove(name.as_ref())
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .expect("config cache lock poisoned")
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("config cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_get_or_load_reuses_entry() {
        let root = std::env::temp_dir().join("sectconf_test_cache");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("cached.conf"), "x = 1\n").unwrap();

        let cache = ConfigCache::new();
        let options = ConfigOptions::default().with_start_dir(&root);

        let first = cache.get_or_load("cached.conf", &options).unwrap();
        assert_eq!(first.get_i64("x"), Some(1));

        // Changes on disk are not seen until the entry is dropped
        std::fs::write(root.join("cached.conf"), "x = 2\n").unwrap();
        let second = cache.get_or_load("cached.conf", &options).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.get_i64("x"), Some(1));
        assert_eq!(cache.len(), 1);

        assert!(cache.remove("cached.conf").is_some());
        let third = cache.get_or_load("cached.conf", &options).unwrap();
        assert_eq!(third.get_i64("x"), Some(2));

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let dir = std::env::temp_dir().join("sectconf_test_cache_missing");
        std::fs::create_dir_all(&dir).unwrap();

        let cache = ConfigCache::new();
        let options = ConfigOptions::default().with_start_dir(&dir);
        let err = cache
            .get_or_load("sectconf-cache-missing.conf", &options)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(cache.is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_insert_and_clear() {
        let cache = ConfigCache::new();
        assert!(cache
            .insert("inline.conf", Config::parse("a = 1\n").unwrap())
            .is_none());
        assert_eq!(
            cache.get("inline.conf").and_then(|c| c.get_i64("a")),
            Some(1)
        );
        assert!(cache
            .insert("inline.conf", Config::parse("a = 2\n").unwrap())
            .is_some());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("inline.conf").is_none());
    }
}
