//! Fingerprint cache store
//!
//! Persists one fingerprint per package, keyed by package name and scoped to
//! the workspace. The store is a small keyed abstraction so tests can swap
//! the filesystem layout for an in-memory map.
//!
//! A cache entry is written only after a successful build and read before
//! every build attempt (unless caching is bypassed). A plain run's cache
//! check covers only the package's own directory; dependency freshness is
//! consulted solely by the dirty pre-filter (`build --dirty`), so a package
//! can legitimately hit its cache while a dependency changed underneath it.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::config::defaults;
use crate::error::CacheError;

/// Keyed store of package fingerprints
pub trait FingerprintStore: Send + Sync {
    /// Read the stored fingerprint for a package.
    ///
    /// Any read failure is reported as `None`: a package whose cache entry
    /// cannot be read is assumed dirty rather than blocking the build.
    fn load(&self, package: &str) -> Option<String>;

    /// Persist the fingerprint for a package, overwriting any prior entry.
    fn store(&self, package: &str, fingerprint: &str) -> Result<(), CacheError>;
}

/// Filesystem-backed store: one `<package>.hash` file per package beneath
/// the workspace cache directory, created lazily on first write.
#[derive(Debug)]
pub struct FsStore {
    cache_dir: PathBuf,
}

impl FsStore {
    /// Create a store rooted at the given cache directory. The directory
    /// itself is created on first write, not here.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    fn entry_path(&self, package: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{package}.{}", defaults::CACHE_ENTRY_EXT))
    }
}

impl FingerprintStore for FsStore {
    fn load(&self, package: &str) -> Option<String> {
        std::fs::read_to_string(self.entry_path(package)).ok()
    }

    fn store(&self, package: &str, fingerprint: &str) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.cache_dir).map_err(|e| CacheError::CreateDir {
            path: self.cache_dir.clone(),
            error: e.to_string(),
        })?;
        std::fs::write(self.entry_path(package), fingerprint).map_err(|e| {
            CacheError::WriteEntry {
                package: package.to_string(),
                error: e.to_string(),
            }
        })
    }
}

/// In-memory store for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl FingerprintStore for MemoryStore {
    fn load(&self, package: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("fingerprint map poisoned")
            .get(package)
            .cloned()
    }

    fn store(&self, package: &str, fingerprint: &str) -> Result<(), CacheError> {
        self.entries
            .lock()
            .expect("fingerprint map poisoned")
            .insert(package.to_string(), fingerprint.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fs_store_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path().join("cache"));

        assert_eq!(store.load("util"), None);
        store.store("util", "abc123").unwrap();
        assert_eq!(store.load("util"), Some("abc123".to_string()));
    }

    #[test]
    fn test_fs_store_creates_directory_lazily() {
        let tmp = TempDir::new().unwrap();
        let cache_dir = tmp.path().join("nested").join("cache");
        let store = FsStore::new(cache_dir.clone());

        assert!(!cache_dir.exists());
        store.store("core", "deadbeef").unwrap();
        assert!(cache_dir.join("core.hash").exists());
    }

    #[test]
    fn test_fs_store_overwrites_entry() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path().to_path_buf());

        store.store("app", "old").unwrap();
        store.store("app", "new").unwrap();
        assert_eq!(store.load("app"), Some("new".to_string()));
    }

    #[test]
    fn test_entries_are_keyed_per_package() {
        let store = MemoryStore::new();
        store.store("a", "fp-a").unwrap();
        store.store("b", "fp-b").unwrap();

        assert_eq!(store.load("a"), Some("fp-a".to_string()));
        assert_eq!(store.load("b"), Some("fp-b".to_string()));
        assert_eq!(store.load("c"), None);
    }
}
