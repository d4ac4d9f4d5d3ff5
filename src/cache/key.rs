//! Cache Key Module
//!
//! Lets callers cache by a domain object's stable identity instead of
//! hand-building key strings at every call site.

// == Cache Key Trait ==
/// A value with a stable string identity usable as a cache key.
///
/// Implementations must be deterministic: the same logical value always
/// yields the same key, across processes, or persisted entries become
/// unreachable.
pub trait CacheKey {
    /// The string identifier this value caches under.
    fn cache_key(&self) -> String;
}

impl CacheKey for str {
    fn cache_key(&self) -> String {
        self.to_string()
    }
}

impl CacheKey for String {
    fn cache_key(&self) -> String {
        self.clone()
    }
}

macro_rules! impl_cache_key_for_ids {
    ($($ty:ty),*) => {
        $(
            impl CacheKey for $ty {
                fn cache_key(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_cache_key_for_ids!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
