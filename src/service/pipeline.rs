//! Ingestion pipeline orchestration
//!
//! Wires the feed adapters, the enrichment stage, and the aggregator
//! together behind the snapshot cache gate.

use std::time::Duration;

use chrono::Utc;

use crate::feed::{fetch_all, FeedAdapter};
use crate::model::article::Article;
use crate::model::dashboard::{DashboardSnapshot, ThreatReport};
use crate::service::aggregate::{build_report, build_snapshot};
use crate::service::enrich::EnrichmentService;
use crate::service::snapshot::SnapshotCache;

/// End-to-end threat ingestion service.
pub struct ThreatService {
    adapters: Vec<Box<dyn FeedAdapter>>,
    enrichment: EnrichmentService,
    cache: SnapshotCache,
}

impl ThreatService {
    pub fn new(
        adapters: Vec<Box<dyn FeedAdapter>>,
        enrichment: EnrichmentService,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            adapters,
            enrichment,
            cache: SnapshotCache::new(cache_ttl),
        }
    }

    /// Fetch every configured feed and enrich the surviving articles.
    /// Never fails: sources and CVEs degrade individually.
    pub async fn collect_articles(&self) -> Vec<Article> {
        let articles = fetch_all(&self.adapters).await;
        self.enrichment.enrich_articles(articles).await
    }

    /// The cache-gated dashboard snapshot.
    pub async fn dashboard_snapshot(&self) -> DashboardSnapshot {
        let now = Utc::now();
        self.cache
            .get_or_compute(now, || async {
                let articles = self.collect_articles().await;
                build_snapshot(&articles, now)
            })
            .await
    }

    /// Fresh summary + article list (uncached).
    pub async fn threat_report(&self) -> ThreatReport {
        let articles = self.collect_articles().await;
        build_report(articles)
    }
}
