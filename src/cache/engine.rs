//! Cache Engine Module
//!
//! The process-wide entry point for cache reads and writes. Owns the
//! sliding-expiration policy and the sweep pass; delegates durability to a
//! [`DurableStore`] and value encoding to a [`Codec`].
//!
//! # Concurrency
//! The engine is shared by cloning; clones share state through `Arc`. Every
//! operation runs under a single `RwLock` over the store, so each logical
//! operation (read-then-refresh, scan-then-recheck-then-delete) is atomic
//! with respect to all others. Store failures surface immediately; the
//! engine never retries internally.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheEntry, CacheKey, CacheStats};
use crate::codec::{Codec, JsonCodec};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::store::{DurableStore, FileStore};

// == Cache Engine ==
/// Durable key-value cache with sliding expiration.
///
/// "Cache this for 15 minutes" means 15 minutes from last use: every
/// successful read persists a fresh lease before the value is returned.
/// Expired-but-unswept entries are treated as absent and reclaimed by
/// [`sweep_expired`](Self::sweep_expired).
pub struct CacheEngine<S: DurableStore, C: Codec = JsonCodec> {
    inner: Arc<EngineInner<S, C>>,
}

struct EngineInner<S, C> {
    store: RwLock<S>,
    codec: C,
    stats: StatsCounters,
}

impl<S: DurableStore, C: Codec> Clone for CacheEngine<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: DurableStore> CacheEngine<S> {
    // == Constructor ==
    /// Creates an engine over `store` with the default JSON codec.
    pub fn new(store: S) -> Self {
        Self::with_codec(store, JsonCodec)
    }
}

impl CacheEngine<FileStore> {
    /// Opens a file-backed engine at the configured cache directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(FileStore::open(&config.cache_dir)?))
    }
}

impl<S: DurableStore, C: Codec> CacheEngine<S, C> {
    /// Creates an engine over `store` with a caller-supplied codec.
    pub fn with_codec(store: S, codec: C) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                store: RwLock::new(store),
                codec,
                stats: StatsCounters::default(),
            }),
        }
    }

    // == Put ==
    /// Encodes `value` and caches it under `key` for `ttl` from now.
    pub async fn put<T>(&self, key: &str, value: &T, ttl: Duration) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let bytes = self
            .inner
            .codec
            .encode(value)
            .map_err(|e| CacheError::Serialization {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        self.put_bytes(key, bytes, ttl).await
    }

    /// Byte-level put. An existing entry is overwritten wholesale: payload,
    /// ttl, and a fresh `expires_at = now + ttl` that does not stack with
    /// the previous lease. An expired-but-unswept row is replaced the same
    /// way.
    pub async fn put_bytes(&self, key: &str, bytes: Vec<u8>, ttl: Duration) -> Result<()> {
        let now = Utc::now();
        let entry = CacheEntry::new(key.to_string(), bytes, ttl.as_secs(), now);

        let mut store = self.inner.store.write().await;
        store.upsert(entry)?;
        debug!(key, ttl_secs = ttl.as_secs(), "entry cached");
        Ok(())
    }

    // == Get ==
    /// Retrieves and decodes the value cached under `key`.
    ///
    /// A hit slides the lease: `expires_at` becomes `now + ttl` and the
    /// refresh is persisted before the value is returned. An absent key and
    /// an expired-but-unswept one are the same `NotFound` to the caller.
    pub async fn get<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let bytes = self.get_bytes(key).await?;
        self.inner
            .codec
            .decode(&bytes)
            .map_err(|e| CacheError::Deserialization {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    /// Byte-level get with the same refresh contract as [`get`](Self::get).
    pub async fn get_bytes(&self, key: &str) -> Result<Vec<u8>> {
        let now = Utc::now();
        let mut store = self.inner.store.write().await;

        match store.fetch(key)? {
            Some(entry) if entry.is_live_at(now) => {
                // Persist the refreshed lease before handing back the value
                store.set_expiry(key, entry.refreshed_expiry(now))?;
                self.inner.stats.record_hit();
                debug!(key, "lease refreshed on read");
                Ok(entry.payload)
            }
            // An expired row is left in place; the sweep reclaims it
            _ => {
                self.inner.stats.record_miss();
                Err(CacheError::NotFound(key.to_string()))
            }
        }
    }

    // == Remove ==
    /// Deletes the entry under `key`. A no-op, not an error, if absent.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let mut store = self.inner.store.write().await;
        store.delete(key)?;
        Ok(())
    }

    // == Inspect ==
    /// Current lease of a live entry, without refreshing it.
    pub async fn expires_at(&self, key: &str) -> Result<DateTime<Utc>> {
        let now = Utc::now();
        let store = self.inner.store.read().await;
        match store.fetch(key)? {
            Some(entry) if entry.is_live_at(now) => Ok(entry.expires_at),
            _ => Err(CacheError::NotFound(key.to_string())),
        }
    }

    // == Sweep ==
    /// Deletes every entry whose lease has lapsed as of `now`, in one
    /// logical batch, and returns the count removed.
    ///
    /// Each candidate's current `expires_at` is re-checked at deletion time,
    /// so an entry refreshed after the scan survives the pass.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut store = self.inner.store.write().await;
        let candidates = store.expired_keys(now)?;

        let mut removed = 0;
        for key in candidates {
            if let Some(entry) = store.fetch(&key)? {
                if entry.is_expired_at(now) && store.delete(&key)? {
                    removed += 1;
                }
            }
        }

        if removed > 0 {
            self.inner.stats.record_swept(removed as u64);
            info!(removed, "sweep removed expired entries");
        }
        Ok(removed)
    }

    // == Stats ==
    /// Snapshot of hit/miss/sweep counters and the store's entry count.
    pub async fn stats(&self) -> Result<CacheStats> {
        let store = self.inner.store.read().await;
        Ok(self.inner.stats.snapshot(store.len()?))
    }

    // == Keyed-By-Identity Convenience ==
    /// [`put`](Self::put) keyed by a domain value's stable identity.
    pub async fn put_for<K, T>(&self, id: &K, value: &T, ttl: Duration) -> Result<()>
    where
        K: CacheKey + ?Sized,
        T: Serialize + ?Sized,
    {
        self.put(&id.cache_key(), value, ttl).await
    }

    /// [`get`](Self::get) keyed by a domain value's stable identity.
    pub async fn get_for<K, T>(&self, id: &K) -> Result<T>
    where
        K: CacheKey + ?Sized,
        T: DeserializeOwned,
    {
        self.get(&id.cache_key()).await
    }

    /// [`remove`](Self::remove) keyed by a domain value's stable identity.
    pub async fn remove_for<K>(&self, id: &K) -> Result<()>
    where
        K: CacheKey + ?Sized,
    {
        self.remove(&id.cache_key()).await
    }
}
