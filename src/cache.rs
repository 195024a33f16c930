//! In-memory snapshot cache with TTL-driven, single-flight refresh.

use crate::rate_provider::RateProvider;
use crate::snapshot::RateSnapshot;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

struct CacheState {
    snapshot: Option<Arc<RateSnapshot>>,
    last_attempt_at: Option<DateTime<Utc>>,
    last_success_at: Option<DateTime<Utc>>,
}

struct CacheInner {
    provider: Arc<dyn RateProvider>,
    base: String,
    ttl: Duration,
    state: RwLock<CacheState>,
    refresh_in_progress: AtomicBool,
}

/// Holds the current rate snapshot and coordinates its refresh.
///
/// Readers get the most recently installed snapshot without waiting on any
/// network I/O; at most one fetch is in flight at a time, and a failed fetch
/// leaves the previous snapshot serving (stale-but-available). Cloning the
/// cache shares the same underlying state.
#[derive(Clone)]
pub struct RateCache {
    inner: Arc<CacheInner>,
}

impl RateCache {
    pub fn new(provider: Arc<dyn RateProvider>, base: &str, ttl: Duration) -> Self {
        RateCache {
            inner: Arc::new(CacheInner {
                provider,
                base: base.to_string(),
                ttl,
                state: RwLock::new(CacheState {
                    snapshot: None,
                    last_attempt_at: None,
                    last_success_at: None,
                }),
                refresh_in_progress: AtomicBool::new(false),
            }),
        }
    }

    /// The most recently installed snapshot, or `None` before the first
    /// successful fetch. Never performs I/O; the lock is held only long
    /// enough to clone the reference.
    pub async fn current_snapshot(&self) -> Option<Arc<RateSnapshot>> {
        self.inner.state.read().await.snapshot.clone()
    }

    /// Time of the last successful fetch. This is what the consuming surface
    /// shows to disclose data age.
    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.inner.state.read().await.last_success_at
    }

    /// Time of the last fetch attempt, successful or not.
    pub async fn last_attempted(&self) -> Option<DateTime<Utc>> {
        self.inner.state.read().await.last_attempt_at
    }

    /// Fetches a new snapshot if the current one is older than the TTL (or
    /// missing). Concurrent callers while a refresh is in flight return
    /// immediately without queuing another fetch.
    pub async fn refresh_if_stale(&self) {
        if !self.is_stale().await {
            return;
        }
        self.refresh(false).await;
    }

    /// Fetches a new snapshot regardless of TTL. Still single-flight.
    pub async fn force_refresh(&self) {
        self.refresh(true).await;
    }

    /// Kicks off `refresh_if_stale` on a background task so read paths never
    /// wait on the provider.
    pub fn trigger_refresh(&self) {
        let cache = self.clone();
        tokio::spawn(async move {
            cache.refresh_if_stale().await;
        });
    }

    async fn is_stale(&self) -> bool {
        let state = self.inner.state.read().await;
        match state.last_success_at {
            Some(at) => {
                let age = (Utc::now() - at).to_std().unwrap_or(Duration::ZERO);
                age >= self.inner.ttl
            }
            None => true,
        }
    }

    async fn refresh(&self, ignore_ttl: bool) {
        if self
            .inner
            .refresh_in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Refresh already in flight, skipping");
            return;
        }

        // Re-check under the flag: another caller may have completed a
        // refresh between our staleness check and winning the flag.
        if !ignore_ttl && !self.is_stale().await {
            self.inner.refresh_in_progress.store(false, Ordering::SeqCst);
            return;
        }

        self.inner.state.write().await.last_attempt_at = Some(Utc::now());

        match self.inner.provider.fetch(&self.inner.base).await {
            Ok(snapshot) => {
                let mut state = self.inner.state.write().await;
                // Install the snapshot before advancing last_success_at, so
                // an observer of the newer timestamp also sees the snapshot.
                state.snapshot = Some(Arc::new(snapshot));
                state.last_success_at = Some(Utc::now());
                debug!(base = %self.inner.base, "Installed new rate snapshot");
            }
            Err(e) => {
                warn!(error = %e, "Rate refresh failed, keeping previous snapshot");
            }
        }

        self.inner.refresh_in_progress.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    struct MockProvider {
        fetch_count: AtomicUsize,
        fail: AtomicBool,
        delay: Duration,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                fetch_count: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                delay: Duration::ZERO,
            }
        }

        fn with_delay(delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl RateProvider for MockProvider {
        async fn fetch(&self, base: &str) -> Result<RateSnapshot, FetchError> {
            self.fetch_count.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(FetchError::Network("simulated outage".to_string()));
            }
            let rates: HashMap<String, f64> = [("USD", 1.0), ("EUR", 0.9)]
                .iter()
                .map(|(c, r)| (c.to_string(), *r))
                .collect();
            RateSnapshot::new(base, rates, Utc::now())
        }
    }

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn test_empty_until_first_fetch() {
        let provider = Arc::new(MockProvider::new());
        let cache = RateCache::new(provider, "USD", HOUR);

        assert!(cache.current_snapshot().await.is_none());
        assert!(cache.last_updated().await.is_none());

        cache.refresh_if_stale().await;

        assert!(cache.current_snapshot().await.is_some());
        assert!(cache.last_updated().await.is_some());
    }

    #[tokio::test]
    async fn test_fresh_snapshot_skips_fetch() {
        let provider = Arc::new(MockProvider::new());
        let cache = RateCache::new(Arc::clone(&provider) as Arc<dyn RateProvider>, "USD", HOUR);

        cache.refresh_if_stale().await;
        cache.refresh_if_stale().await;
        cache.refresh_if_stale().await;

        assert_eq!(provider.fetch_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_force_refresh_bypasses_ttl() {
        let provider = Arc::new(MockProvider::new());
        let cache = RateCache::new(Arc::clone(&provider) as Arc<dyn RateProvider>, "USD", HOUR);

        cache.refresh_if_stale().await;
        cache.force_refresh().await;

        assert_eq!(provider.fetch_count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_single_flight() {
        let provider = Arc::new(MockProvider::with_delay(Duration::from_millis(50)));
        let cache = RateCache::new(Arc::clone(&provider) as Arc<dyn RateProvider>, "USD", HOUR);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                cache.refresh_if_stale().await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // The winner holds the flag across its slow fetch; everyone else
        // returns without queuing.
        assert_eq!(provider.fetch_count.load(Ordering::SeqCst), 1);
        assert!(cache.current_snapshot().await.is_some());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_old_snapshot() {
        let provider = Arc::new(MockProvider::new());
        let cache =
            RateCache::new(Arc::clone(&provider) as Arc<dyn RateProvider>, "USD", Duration::ZERO);

        cache.refresh_if_stale().await;
        let first_updated = cache.last_updated().await.unwrap();
        let first_snapshot = cache.current_snapshot().await.unwrap();

        provider.fail.store(true, Ordering::SeqCst);
        cache.refresh_if_stale().await;
        cache.refresh_if_stale().await;

        let snapshot = cache.current_snapshot().await.unwrap();
        assert_eq!(snapshot.rate("EUR"), first_snapshot.rate("EUR"));
        assert_eq!(cache.last_updated().await.unwrap(), first_updated);
        assert!(provider.fetch_count.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn test_stays_empty_when_first_fetch_fails() {
        let provider = Arc::new(MockProvider::new());
        provider.fail.store(true, Ordering::SeqCst);
        let cache = RateCache::new(Arc::clone(&provider) as Arc<dyn RateProvider>, "USD", HOUR);

        cache.refresh_if_stale().await;

        assert!(cache.current_snapshot().await.is_none());
        assert!(cache.last_updated().await.is_none());
        assert!(cache.last_attempted().await.is_some());
    }
}
