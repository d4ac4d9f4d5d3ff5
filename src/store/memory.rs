//! In-Memory Store
//!
//! HashMap-backed [`DurableStore`] adapter. Nothing survives the process;
//! useful for tests and for callers that only want sliding expiration.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::cache::CacheEntry;
use crate::error::Result;
use crate::store::DurableStore;

// == Memory Store ==
/// Volatile store keyed by entry key.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, CacheEntry>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DurableStore for MemoryStore {
    fn upsert(&mut self, entry: CacheEntry) -> Result<()> {
        self.entries.insert(entry.key.clone(), entry);
        Ok(())
    }

    fn fetch(&self, key: &str) -> Result<Option<CacheEntry>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_expiry(&mut self, key: &str, expires_at: DateTime<Utc>) -> Result<bool> {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.expires_at = expires_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn expired_keys(&self, threshold: DateTime<Utc>) -> Result<Vec<String>> {
        Ok(self
            .entries
            .values()
            .filter(|entry| entry.expires_at <= threshold)
            .map(|entry| entry.key.clone())
            .collect())
    }

    fn delete(&mut self, key: &str) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.entries.len())
    }
}
