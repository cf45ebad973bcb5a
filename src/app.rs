//! Application state and service initialization
//!
//! This module centralizes all service initialization and dependency
//! injection, making it easier to manage the application lifecycle and test
//! services.

use std::sync::Arc;

use actix_web::web;

use crate::api::health::DependencyHealth;
use crate::feed::{FeedAdapter, HackerNewsFeed, NcscFeed};
use crate::model::Config;
use crate::service::enrich::MitigationAdvisor;
use crate::service::nvd::CveLookup;
use crate::service::{
    EnrichmentService, GeminiAdvisor, LlmClient, MitigationService, NvdClient, PlanStore,
    ThreatService,
};

/// Application state containing all services and shared resources
pub struct AppState {
    /// Ingestion pipeline behind the snapshot cache gate
    pub threat_service: web::Data<ThreatService>,
    /// On-demand mitigation plan generation
    pub mitigation_service: web::Data<MitigationService>,
    /// Plan and report persistence
    pub plan_store: web::Data<PlanStore>,
    /// Configuration state for the readiness probe
    pub dependencies: web::Data<DependencyHealth>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. LLM client initialization (absent `GEMINI_API_KEY` degrades the
    ///    pipeline to fallback suggestions)
    /// 2. NVD client initialization
    /// 3. Feed adapter construction from the configured sources
    /// 4. Service dependency graph construction
    pub fn new(config: &Config) -> Self {
        let llm = LlmClient::from_env();
        if llm.is_none() {
            tracing::warn!("Generative service key not configured, mitigation text will use the fallback table");
        }

        let nvd = Arc::new(NvdClient::new());
        let dependencies = DependencyHealth::new(llm.is_some(), nvd.has_api_key());
        let lookup: Arc<dyn CveLookup> = nvd;

        let advisor: Option<Arc<dyn MitigationAdvisor>> = llm
            .clone()
            .map(|client| Arc::new(GeminiAdvisor::new(client)) as Arc<dyn MitigationAdvisor>);

        let threat_service = ThreatService::new(
            Self::build_adapters(config),
            EnrichmentService::new(Arc::clone(&lookup), advisor),
            config.cache_ttl,
        );

        let mitigation_service = MitigationService::new(llm, lookup);
        let plan_store = PlanStore::new(config.data_dir.clone());

        Self {
            threat_service: web::Data::new(threat_service),
            mitigation_service: web::Data::new(mitigation_service),
            plan_store: web::Data::new(plan_store),
            dependencies: web::Data::new(dependencies),
        }
    }

    /// Build one adapter per configured feed source
    fn build_adapters(config: &Config) -> Vec<Box<dyn FeedAdapter>> {
        config
            .feeds
            .iter()
            .filter_map(|feed| match feed.name.as_str() {
                "The Hacker News" => {
                    Some(Box::new(HackerNewsFeed::new(feed.url.clone())) as Box<dyn FeedAdapter>)
                }
                "NCSC" => Some(Box::new(NcscFeed::new(feed.url.clone())) as Box<dyn FeedAdapter>),
                other => {
                    tracing::warn!(source = other, "No adapter for configured feed, skipping");
                    None
                }
            })
            .collect()
    }
}
