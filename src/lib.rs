//! Slide Cache - a persistent key-value cache with sliding expiration
//!
//! Every entry carries a time-to-live, every successful read extends the
//! lease, and a periodic sweep evicts entries nobody reads again.
//!
//! # Example
//! ```no_run
//! use std::time::Duration;
//! use slide_cache::{CacheEngine, Config, Sweeper};
//!
//! # async fn run() -> slide_cache::Result<()> {
//! let config = Config::from_env();
//! let cache = CacheEngine::from_config(&config)?;
//!
//! let mut sweeper = Sweeper::new();
//! sweeper.start(cache.clone(), Duration::from_secs(config.sweep_interval));
//!
//! cache.put("session:42", "alice", Duration::from_secs(60)).await?;
//! let user: String = cache.get("session:42").await?;
//!
//! sweeper.stop();
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod store;
pub mod tasks;

pub use cache::{CacheEngine, CacheEntry, CacheKey, CacheStats};
pub use codec::{Codec, JsonCodec};
pub use config::Config;
pub use error::{CacheError, Result};
pub use store::{DurableStore, FileStore, MemoryStore};
pub use tasks::Sweeper;
