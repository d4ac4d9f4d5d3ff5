//! Cache Module
//!
//! Provides durable caching with sliding TTL expiration.

mod engine;
mod entry;
mod key;
mod stats;


// Re-export public types
pub use engine::CacheEngine;
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use stats::CacheStats;
