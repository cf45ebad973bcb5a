//! Snapshot cache gate
//!
//! Short-TTL in-memory gate in front of the ingestion pipeline. Holds one
//! computed snapshot plus its computation timestamp; the lock is held across
//! recomputation so concurrent stale readers wait for a single computation
//! instead of racing. `now` is supplied by the caller, which keeps staleness
//! behavior testable.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::model::dashboard::DashboardSnapshot;

struct CachedSnapshot {
    computed_at: DateTime<Utc>,
    snapshot: DashboardSnapshot,
}

/// TTL-gated holder of the latest dashboard snapshot.
pub struct SnapshotCache {
    ttl: chrono::Duration,
    state: Mutex<Option<CachedSnapshot>>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::seconds(300)),
            state: Mutex::new(None),
        }
    }

    /// Return the cached snapshot when fresh, otherwise run `compute` and
    /// cache its result. Recomputation is serialized behind the lock.
    pub async fn get_or_compute<F, Fut>(&self, now: DateTime<Utc>, compute: F) -> DashboardSnapshot
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = DashboardSnapshot>,
    {
        let mut state = self.state.lock().await;

        if let Some(cached) = state.as_ref() {
            if now - cached.computed_at < self.ttl {
                tracing::debug!(computed_at = %cached.computed_at, "Returning cached snapshot");
                return cached.snapshot.clone();
            }
            tracing::debug!(computed_at = %cached.computed_at, "Cached snapshot is stale");
        }

        let snapshot = compute().await;

        *state = Some(CachedSnapshot {
            computed_at: now,
            snapshot: snapshot.clone(),
        });

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::aggregate::build_snapshot;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn now_at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 10, 12, minute, 0).unwrap()
    }

    #[tokio::test]
    async fn second_read_within_ttl_hits_cache() {
        let cache = SnapshotCache::new(Duration::from_secs(300));
        let computations = AtomicUsize::new(0);

        for _ in 0..3 {
            let snapshot = cache
                .get_or_compute(now_at(0), || async {
                    computations.fetch_add(1, Ordering::SeqCst);
                    build_snapshot(&[], now_at(0))
                })
                .await;
            assert_eq!(snapshot.total_threats, 0);
        }

        assert_eq!(computations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recomputes_after_ttl_expires() {
        let cache = SnapshotCache::new(Duration::from_secs(300));
        let computations = AtomicUsize::new(0);

        cache
            .get_or_compute(now_at(0), || async {
                computations.fetch_add(1, Ordering::SeqCst);
                build_snapshot(&[], now_at(0))
            })
            .await;

        // 4 minutes later: still fresh.
        cache
            .get_or_compute(now_at(4), || async {
                computations.fetch_add(1, Ordering::SeqCst);
                build_snapshot(&[], now_at(4))
            })
            .await;
        assert_eq!(computations.load(Ordering::SeqCst), 1);

        // 6 minutes later: stale, recomputed.
        let snapshot = cache
            .get_or_compute(now_at(6), || async {
                computations.fetch_add(1, Ordering::SeqCst);
                build_snapshot(&[], now_at(6))
            })
            .await;
        assert_eq!(computations.load(Ordering::SeqCst), 2);
        assert_eq!(snapshot.last_updated, now_at(6));
    }

    #[tokio::test]
    async fn concurrent_reads_share_one_computation() {
        let cache = Arc::new(SnapshotCache::new(Duration::from_secs(300)));
        let computations = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let computations = Arc::clone(&computations);
                tokio::spawn(async move {
                    cache
                        .get_or_compute(now_at(0), move || async move {
                            computations.fetch_add(1, Ordering::SeqCst);
                            // Give the other tasks time to pile up on the lock.
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            build_snapshot(&[], now_at(0))
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(computations.load(Ordering::SeqCst), 1);
    }
}
