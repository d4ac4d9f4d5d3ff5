//! Durable Store Module
//!
//! The persistence layer the cache engine delegates to. The engine only
//! requires point read/write, a range read by expiration threshold, point
//! delete, and read-your-writes visibility within a session; any embedded
//! key-value or relational engine can satisfy this.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};

use crate::cache::CacheEntry;
use crate::error::Result;

// == Durable Store Trait ==
/// Contract between the cache engine and its persistence layer.
///
/// Methods are synchronous; the engine owns the async layer and serializes
/// access, so implementations never see concurrent calls. A successful write
/// must be visible to a subsequent read by the same caller.
pub trait DurableStore: Send + Sync + 'static {
    /// Insert-or-replace by key.
    fn upsert(&mut self, entry: CacheEntry) -> Result<()>;

    /// Point read by key. Returns whatever is persisted, live or not;
    /// liveness is the engine's call.
    fn fetch(&self, key: &str) -> Result<Option<CacheEntry>>;

    /// Persists a refreshed lease without rewriting the payload.
    ///
    /// Returns false if the key is absent.
    fn set_expiry(&mut self, key: &str, expires_at: DateTime<Utc>) -> Result<bool>;

    /// Range read: keys of all entries with `expires_at <= threshold`.
    fn expired_keys(&self, threshold: DateTime<Utc>) -> Result<Vec<String>>;

    /// Point delete. Returns false if the key was absent.
    fn delete(&mut self, key: &str) -> Result<bool>;

    /// Number of persisted entries, expired rows included.
    fn len(&self) -> Result<usize>;
}
