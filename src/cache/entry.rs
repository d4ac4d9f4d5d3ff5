//! Cache Entry Module
//!
//! Defines the persisted record for a single cache entry with sliding TTL.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// The sole persisted entity: one key, its opaque payload, and its lease.
///
/// `expires_at` is always derived as `last qualifying access + ttl`; it is
/// never set independently. Liveness is recomputed from `expires_at` and the
/// clock on every inspection, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Unique identifier; primary lookup key
    pub key: String,
    /// Serialized value; replaced only by a full overwrite
    pub payload: Vec<u8>,
    /// The cache period originally requested for this entry, in seconds
    pub ttl_secs: u64,
    /// Absolute expiration timestamp
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry whose lease starts at `now`.
    pub fn new(key: String, payload: Vec<u8>, ttl_secs: u64, now: DateTime<Utc>) -> Self {
        Self {
            key,
            payload,
            ttl_secs,
            expires_at: lease_end(now, ttl_secs),
        }
    }

    // == Liveness ==
    /// An entry is live iff `expires_at > now` at the instant of inspection.
    ///
    /// Boundary condition: an entry whose expiration equals the current time
    /// is already expired; the lease covers `[access, access + ttl)`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Inverse of [`is_live_at`](Self::is_live_at), as the sweep phrases it.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_live_at(now)
    }

    // == Lease ==
    /// The expiration an access at `now` slides the lease to.
    pub fn refreshed_expiry(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        lease_end(now, self.ttl_secs)
    }

    /// Remaining lease in seconds at `now`, clamped to zero once expired.
    ///
    /// Useful for debugging and statistics; liveness decisions go through
    /// [`is_live_at`](Self::is_live_at) instead.
    pub fn ttl_remaining_at(&self, now: DateTime<Utc>) -> u64 {
        (self.expires_at - now).num_seconds().max(0) as u64
    }
}

// == Lease Arithmetic ==
/// End of a lease starting at `now`. TTLs too large for the timestamp
/// arithmetic saturate at the maximum representable instant instead of
/// wrapping negative and expiring the entry on arrival.
fn lease_end(now: DateTime<Utc>, ttl_secs: u64) -> DateTime<Utc> {
    i64::try_from(ttl_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn entry_at(now: DateTime<Utc>, ttl_secs: u64) -> CacheEntry {
        CacheEntry::new("key1".to_string(), b"value1".to_vec(), ttl_secs, now)
    }

    #[test]
    fn test_entry_creation_derives_expiry() {
        let now = Utc::now();
        let entry = entry_at(now, 60);

        assert_eq!(entry.key, "key1");
        assert_eq!(entry.payload, b"value1");
        assert_eq!(entry.expires_at, now + Duration::seconds(60));
    }

    #[test]
    fn test_entry_live_within_ttl() {
        let now = Utc::now();
        let entry = entry_at(now, 60);

        assert!(entry.is_live_at(now));
        assert!(entry.is_live_at(now + Duration::seconds(59)));
    }

    #[test]
    fn test_entry_expired_at_and_after_boundary() {
        let now = Utc::now();
        let entry = entry_at(now, 60);

        // Expired exactly when the TTL has fully elapsed
        assert!(entry.is_expired_at(now + Duration::seconds(60)));
        assert!(entry.is_expired_at(now + Duration::seconds(61)));
        assert!(!entry.is_live_at(entry.expires_at));
    }

    #[test]
    fn test_refreshed_expiry_slides_from_access_time() {
        let now = Utc::now();
        let entry = entry_at(now, 60);

        let later = now + Duration::seconds(30);
        assert_eq!(entry.refreshed_expiry(later), later + Duration::seconds(60));
    }

    #[test]
    fn test_ttl_remaining() {
        let now = Utc::now();
        let entry = entry_at(now, 60);

        assert_eq!(entry.ttl_remaining_at(now), 60);
        assert_eq!(entry.ttl_remaining_at(now + Duration::seconds(45)), 15);
        // Clamped to zero once expired
        assert_eq!(entry.ttl_remaining_at(now + Duration::seconds(120)), 0);
    }

    #[test]
    fn test_pathological_ttl_saturates() {
        let now = Utc::now();
        let entry = entry_at(now, u64::MAX);

        // A lease longer than the clock can represent is still a live lease
        assert!(entry.is_live_at(now));
        assert!(entry.expires_at > now);
        assert!(entry.refreshed_expiry(now) > now);
    }

    #[test]
    fn test_entry_serde_roundtrip() {
        let now = Utc::now();
        let entry = entry_at(now, 60);

        let json = serde_json::to_vec(&entry).unwrap();
        let back: CacheEntry = serde_json::from_slice(&json).unwrap();

        assert_eq!(back.key, entry.key);
        assert_eq!(back.payload, entry.payload);
        assert_eq!(back.ttl_secs, entry.ttl_secs);
        assert_eq!(back.expires_at, entry.expires_at);
    }
}
