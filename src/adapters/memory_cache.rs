//! In-process cache adapter with per-entry expiry.

use crate::ports::cache_port::CachePort;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

struct Entry {
    value: String,
    expires_at: Instant,
}

#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    // Entries are replaced whole, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            log::warn!("cache lock was poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry. Runs on every `set`.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.lock().retain(|_, e| e.expires_at > now);
    }
}

impl CachePort for InMemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, value: String, ttl: Duration) {
        self.purge_expired();
        let Some(expires_at) = Instant::now().checked_add(ttl) else {
            log::warn!("cache ttl for {} overflows, entry not stored", key);
            return;
        };
        self.lock()
            .insert(key.to_string(), Entry { value, expires_at });
    }
}
