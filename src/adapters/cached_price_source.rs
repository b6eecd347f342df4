//! Price source decorator that serves repeated fetches from a cache.

use crate::domain::error::QuantdashError;
use crate::domain::price::PricePoint;
use crate::ports::cache_port::CachePort;
use crate::ports::price_port::PriceSource;
use std::time::Duration;

pub struct CachedPriceSource<S, C> {
    inner: S,
    cache: C,
    ttl: Duration,
}

impl<S: PriceSource, C: CachePort> CachedPriceSource<S, C> {
    pub fn new(inner: S, cache: C, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    fn cache_key(symbol: &str) -> String {
        format!("series:{}", symbol.to_uppercase())
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

impl<S: PriceSource, C: CachePort> PriceSource for CachedPriceSource<S, C> {
    fn fetch_series(&self, symbol: &str) -> Result<Vec<PricePoint>, QuantdashError> {
        let key = Self::cache_key(symbol);

        if let Some(payload) = self.cache.get(&key) {
            match serde_json::from_str::<Vec<PricePoint>>(&payload) {
                Ok(series) => {
                    log::debug!("cache hit for {}", key);
                    return Ok(series);
                }
                Err(e) => log::warn!("discarding unreadable cache entry {}: {}", key, e),
            }
        } else {
            log::debug!("cache miss for {}", key);
        }

        let series = self.inner.fetch_series(symbol)?;
        self.cache.set(&key, serde_json::to_string(&series)?, self.ttl);
        Ok(series)
    }

    fn list_symbols(&self) -> Result<Vec<String>, QuantdashError> {
        self.inner.list_symbols()
    }
}
