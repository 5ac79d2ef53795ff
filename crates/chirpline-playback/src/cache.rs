//! Decoded-clip cache keyed by path.
//!
//! Each path gets one cell. Concurrent loads of the same uncached path wait on
//! that cell, so a path is fetched at most once while it stays cached. A
//! failed load leaves the cell empty and the next request retries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;
use tracing::debug;

use crate::clip::DecodedClip;
use crate::error::LoadError;
use crate::fetch::ClipFetcher;

type Slot = Arc<OnceCell<Arc<DecodedClip>>>;

/// Shared cache of decoded clips.
#[derive(Debug, Default)]
pub struct ClipCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl ClipCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached clip for `path`, loading it through `fetcher` on a miss.
    pub async fn get_or_load(
        &self,
        path: &str,
        fetcher: &dyn ClipFetcher,
    ) -> Result<Arc<DecodedClip>, LoadError> {
        let slot = self.slots().entry(path.to_string()).or_default().clone();

        if let Some(clip) = slot.get() {
            debug!(path, "clip cache hit");
            return Ok(Arc::clone(clip));
        }

        let clip = slot
            .get_or_try_init(|| async {
                debug!(path, "clip cache miss, fetching");
                fetcher.fetch(path).await.map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(clip))
    }

    /// Returns the clip if it is already decoded.
    pub fn get(&self, path: &str) -> Option<Arc<DecodedClip>> {
        self.slots().get(path).and_then(|slot| slot.get().cloned())
    }

    /// Returns true if the clip is decoded and cached.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Number of decoded clips held.
    pub fn len(&self) -> usize {
        self.slots()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    /// Returns true if no clip is decoded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Releases every cached buffer reference.
    pub fn clear(&self) {
        let mut slots = self.slots();
        let released = slots.len();
        slots.clear();
        debug!(released, "clip cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;
    use futures_util::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Yields once before answering so concurrent loads interleave.
    struct SlowFetcher {
        fetches: AtomicUsize,
    }

    impl ClipFetcher for SlowFetcher {
        fn fetch<'a>(&'a self, _path: &'a str) -> BoxFuture<'a, Result<DecodedClip, LoadError>> {
            Box::pin(async move {
                self.fetches.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
                Ok(DecodedClip::silence(1000, 100))
            })
        }
    }

    #[tokio::test]
    async fn test_second_load_is_cache_hit() {
        let fetcher = MemoryFetcher::new().with_clip("a.wav", DecodedClip::silence(1000, 50));
        let cache = ClipCache::new();

        let first = cache.get_or_load("a.wav", &fetcher).await.unwrap();
        let second = cache.get_or_load("a.wav", &fetcher).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fetcher.fetch_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_loads_coalesce() {
        let fetcher = SlowFetcher {
            fetches: AtomicUsize::new(0),
        };
        let cache = ClipCache::new();

        let (a, b) = tokio::join!(
            cache.get_or_load("same.wav", &fetcher),
            cache.get_or_load("same.wav", &fetcher)
        );
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert_eq!(fetcher.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let fetcher = MemoryFetcher::new();
        let cache = ClipCache::new();

        assert!(cache.get_or_load("gone.wav", &fetcher).await.is_err());
        assert!(cache.get_or_load("gone.wav", &fetcher).await.is_err());
        assert_eq!(fetcher.fetch_count(), 2);
        assert!(cache.is_empty());
        assert!(!cache.contains("gone.wav"));
    }

    #[tokio::test]
    async fn test_clear_releases_buffers() {
        let fetcher = MemoryFetcher::new().with_clip("a.wav", DecodedClip::silence(1000, 50));
        let cache = ClipCache::new();

        let clip = cache.get_or_load("a.wav", &fetcher).await.unwrap();
        assert_eq!(Arc::strong_count(&clip), 2);
        cache.clear();
        assert_eq!(Arc::strong_count(&clip), 1);
        assert!(cache.is_empty());

        cache.get_or_load("a.wav", &fetcher).await.unwrap();
        assert_eq!(fetcher.fetch_count(), 2);
    }
}
