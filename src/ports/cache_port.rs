//! Key/value cache port trait.

use std::time::Duration;

/// String-keyed cache with per-entry time to live.
///
/// Injected wherever caching is wanted so the backing store can be swapped.
pub trait CachePort {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String, ttl: Duration);
}
