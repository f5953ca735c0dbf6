//! In-memory TTL cache for aggregated market views.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

/// Immutable cached value. A refresh replaces the whole entry.
#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Thread-safe key/value store with per-entry expiry.
///
/// Expired entries stay in the map until the key is written again; reads only
/// decide visibility. The key space is one entry per tracked symbol or
/// aggregate view, so growth is bounded by configuration, not traffic.
#[derive(Debug)]
pub struct TtlCache<V> {
    inner: Arc<RwLock<HashMap<String, Arc<CacheEntry<V>>>>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Store `value` under `key`, visible until `now + ttl`.
    ///
    /// Any prior entry is replaced unconditionally.
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let entry = Arc::new(CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        });
        let mut map = self.inner.write().await;
        map.insert(key.into(), entry);
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }
}

impl<V: Clone> TtlCache<V> {
    /// Return the value for `key` if present and not yet expired.
    pub async fn get(&self, key: &str) -> Option<V> {
        let entry = {
            let map = self.inner.read().await;
            map.get(key).cloned()
        }?;

        if entry.is_fresh(Instant::now()) {
            Some(entry.value.clone())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn value_is_visible_until_ttl_elapses() {
        let cache = TtlCache::new();
        cache.set("quote:AAPL", 189.5_f64, Duration::from_secs(30)).await;

        assert_eq!(cache.get("quote:AAPL").await, Some(189.5));

        tokio::time::advance(Duration::from_secs(29)).await;
        assert_eq!(cache.get("quote:AAPL").await, Some(189.5));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("quote:AAPL").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_are_not_swept_on_read() {
        let cache = TtlCache::new();
        cache.set("market:sectors", vec![1.0_f64], Duration::from_secs(60)).await;

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(cache.get("market:sectors").await.is_none());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn set_overwrites_value_and_expiry() {
        let cache = TtlCache::new();
        cache.set("news:6", "old", Duration::from_secs(5)).await;
        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(cache.get("news:6").await.is_none());

        cache.set("news:6", "new", Duration::from_secs(5)).await;
        assert_eq!(cache.get("news:6").await, Some("new"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn zero_ttl_is_never_visible() {
        let cache = TtlCache::new();
        cache.set("status", 1_u8, Duration::ZERO).await;
        assert!(cache.get("status").await.is_none());
    }

    #[tokio::test]
    async fn missing_key_is_a_miss() {
        let cache: TtlCache<String> = TtlCache::default();
        assert!(cache.get("quote:MSFT").await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn clones_share_storage_across_tasks() {
        let cache = TtlCache::new();
        let writer = cache.clone();
        tokio::spawn(async move {
            writer.set("quote:TSLA", 250_u32, Duration::from_secs(30)).await;
        })
        .await
        .expect("writer task should finish");

        assert_eq!(cache.get("quote:TSLA").await, Some(250));
        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
