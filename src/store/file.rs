//! File-Backed Store
//!
//! [`DurableStore`] adapter keeping one JSON document per entry in a
//! directory. Writes go through a temp-file rename so a crash mid-write
//! never leaves a torn record, and entries survive process restarts.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};
use crate::store::DurableStore;

// == File Store ==
/// Durable store rooted at a cache directory.
///
/// Filenames are the lowercase hex of the key bytes, so arbitrary keys map
/// to filesystem-safe names; the key itself is recovered from the record.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    // == Constructor ==
    /// Opens a store at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        // The "k" prefix keeps the empty key from becoming a bare ".json"
        // dotfile, which the extension filters below would never see
        let name: String = key.bytes().map(|b| format!("{b:02x}")).collect();
        self.dir.join(format!("k{name}.json"))
    }

    fn read_entry(path: &Path) -> Result<Option<CacheEntry>> {
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path)?;
        let entry = serde_json::from_slice(&bytes)
            .map_err(|e| CacheError::Store(format!("corrupt record at {}: {e}", path.display())))?;
        Ok(Some(entry))
    }

    fn write_entry(&self, entry: &CacheEntry) -> Result<()> {
        let path = self.entry_path(&entry.key);
        let json = serde_json::to_vec(entry)
            .map_err(|e| CacheError::Store(format!("record for '{}' not writable: {e}", entry.key)))?;

        // Write atomically via temp file
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(&json)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }
}

impl DurableStore for FileStore {
    fn upsert(&mut self, entry: CacheEntry) -> Result<()> {
        self.write_entry(&entry)
    }

    fn fetch(&self, key: &str) -> Result<Option<CacheEntry>> {
        Self::read_entry(&self.entry_path(key))
    }

    fn set_expiry(&mut self, key: &str, expires_at: DateTime<Utc>) -> Result<bool> {
        match self.fetch(key)? {
            Some(mut entry) => {
                entry.expires_at = expires_at;
                self.write_entry(&entry)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn expired_keys(&self, threshold: DateTime<Utc>) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for dirent in fs::read_dir(&self.dir)? {
            let path = dirent?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_entry(&path) {
                Ok(Some(entry)) => {
                    if entry.expires_at <= threshold {
                        keys.push(entry.key);
                    }
                }
                Ok(None) => {}
                // One torn file must not disable eviction for the store;
                // point reads of the bad key still surface the error
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping unreadable record during scan");
                }
            }
        }
        Ok(keys)
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        let path = self.entry_path(key);
        if path.exists() {
            fs::remove_file(path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn len(&self) -> Result<usize> {
        let mut count = 0;
        for dirent in fs::read_dir(&self.dir)? {
            let path = dirent?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                count += 1;
            }
        }
        Ok(count)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn entry(key: &str, ttl_secs: u64, now: DateTime<Utc>) -> CacheEntry {
        CacheEntry::new(key.to_string(), b"payload".to_vec(), ttl_secs, now)
    }

    #[test]
    fn test_upsert_and_fetch() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::open(temp.path()).unwrap();
        let now = Utc::now();

        store.upsert(entry("key1", 60, now)).unwrap();

        let fetched = store.fetch("key1").unwrap().unwrap();
        assert_eq!(fetched.key, "key1");
        assert_eq!(fetched.payload, b"payload");
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_entries_survive_reopen() {
        let temp = TempDir::new().unwrap();
        let now = Utc::now();

        {
            let mut store = FileStore::open(temp.path()).unwrap();
            store.upsert(entry("key1", 60, now)).unwrap();
        }

        let store = FileStore::open(temp.path()).unwrap();
        let fetched = store.fetch("key1").unwrap().unwrap();
        assert_eq!(fetched.payload, b"payload");
    }

    #[test]
    fn test_keys_with_path_hostile_characters() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::open(temp.path()).unwrap();
        let now = Utc::now();

        let key = "../weird key/with:stuff";
        store.upsert(entry(key, 60, now)).unwrap();

        let fetched = store.fetch(key).unwrap().unwrap();
        assert_eq!(fetched.key, key);
    }

    #[test]
    fn test_set_expiry_persists() {
        let temp = TempDir::new().unwrap();
        let now = Utc::now();
        let later = now + Duration::seconds(300);

        {
            let mut store = FileStore::open(temp.path()).unwrap();
            store.upsert(entry("key1", 60, now)).unwrap();
            assert!(store.set_expiry("key1", later).unwrap());
            assert!(!store.set_expiry("missing", later).unwrap());
        }

        let store = FileStore::open(temp.path()).unwrap();
        let fetched = store.fetch("key1").unwrap().unwrap();
        assert_eq!(fetched.expires_at, later);
    }

    #[test]
    fn test_expired_keys_threshold() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::open(temp.path()).unwrap();
        let now = Utc::now();

        store.upsert(entry("short", 10, now)).unwrap();
        store.upsert(entry("long", 600, now)).unwrap();

        let expired = store.expired_keys(now + Duration::seconds(10)).unwrap();
        assert_eq!(expired, vec!["short".to_string()]);
    }

    #[test]
    fn test_delete_idempotent_at_fs_level() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::open(temp.path()).unwrap();
        let now = Utc::now();

        store.upsert(entry("key1", 60, now)).unwrap();
        assert!(store.delete("key1").unwrap());
        assert!(!store.delete("key1").unwrap());
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn test_empty_key_is_counted_and_sweepable() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::open(temp.path()).unwrap();
        let past = Utc::now() - Duration::seconds(60);

        // Lease already lapsed when written
        store.upsert(entry("", 10, past)).unwrap();

        assert!(store.fetch("").unwrap().is_some());
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.expired_keys(Utc::now()).unwrap(), vec![String::new()]);
        assert!(store.delete("").unwrap());
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn test_scan_skips_corrupt_records() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::open(temp.path()).unwrap();
        let now = Utc::now();

        store.upsert(entry("good", 10, now)).unwrap();
        fs::write(store.entry_path("bad"), b"not json").unwrap();

        // The torn file is skipped; eviction of the rest keeps working
        let expired = store.expired_keys(now + Duration::seconds(60)).unwrap();
        assert_eq!(expired, vec!["good".to_string()]);
    }

    #[test]
    fn test_corrupt_record_is_store_error() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();

        let path = store.entry_path("key1");
        fs::write(&path, b"not json").unwrap();

        let result = store.fetch("key1");
        assert!(matches!(result, Err(CacheError::Store(_))));
    }
}
