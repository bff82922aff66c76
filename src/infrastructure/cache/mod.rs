//! Caching layer for hot catalogue reads.
//!
//! Provides a [`CacheService`] trait with two implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`NullCache`] - No-op implementation for testing/disabled caching
//!
//! Values are JSON documents; [`get_json`] and [`set_json`] wrap the string
//! interface and treat undecodable entries as misses.

pub mod keys;
mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};

use serde::{Serialize, de::DeserializeOwned};

/// Reads and decodes a cached JSON value.
///
/// Cache errors and malformed entries are logged and reported as a miss.
pub async fn get_json<T: DeserializeOwned>(cache: &dyn CacheService, key: &str) -> Option<T> {
    let raw = match cache.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, cache_key = key, "Cache read failed");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, cache_key = key, "Discarding undecodable cache entry");
            None
        }
    }
}

/// Encodes and stores a JSON value. `None` uses the cache's default TTL.
///
/// Failures are logged and otherwise ignored.
pub async fn set_json<T: Serialize + ?Sized>(
    cache: &dyn CacheService,
    key: &str,
    value: &T,
    ttl_seconds: Option<u64>,
) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, cache_key = key, "Failed to encode cache entry");
            return;
        }
    };

    if let Err(e) = cache.set(key, &raw, ttl_seconds).await {
        tracing::warn!(error = %e, cache_key = key, "Cache write failed");
    }
}
