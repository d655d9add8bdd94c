//! Opportunistic crest/logo URI cache
//!
//! Written as a side effect of fixture fetch cycles, read by whatever UI
//! layer wants team artwork. Never required for reconciliation correctness:
//! a miss simply means the placeholder crest is shown.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::LazyLock;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::constants::asset_cache::CAPACITY;

// LRU cache from raw team label to crest URI as reported by the provider
static CREST_CACHE: LazyLock<RwLock<LruCache<String, String>>> =
    LazyLock::new(|| RwLock::new(LruCache::new(NonZeroUsize::new(CAPACITY).unwrap())));

/// Stores a crest URI for a team label. Empty URIs are ignored.
pub async fn cache_crest_uri(team: String, uri: String) {
    if uri.trim().is_empty() {
        return;
    }
    trace!("Caching crest URI for {team}: {uri}");
    let mut cache = CREST_CACHE.write().await;
    cache.put(team, uri);
}

/// Retrieves a cached crest URI for a team label, if one was seen.
pub async fn get_cached_crest_uri(team: &str) -> Option<String> {
    let mut cache = CREST_CACHE.write().await;
    let hit = cache.get(team).cloned();
    if hit.is_none() {
        debug!("Crest cache miss for {team}");
    }
    hit
}

/// Current number of cached crest URIs.
pub async fn crest_cache_size() -> usize {
    CREST_CACHE.read().await.len()
}

/// Empties the crest cache. Intended for tests.
pub async fn clear_crest_cache() {
    CREST_CACHE.write().await.clear();
}
