//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Sweep: removes expired cache entries at configured intervals

mod sweep;

pub use sweep::Sweeper;
