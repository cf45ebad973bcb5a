//! CVE enrichment stage
//!
//! Resolves every unique CVE id referenced by the surviving articles against
//! the vulnerability database, then asks the generative service for
//! mitigation steps, degrading to a static keyword-driven suggestion table.
//! Lookups for distinct ids run concurrently; each id's database lookup
//! completes before its mitigation call since the latter needs the
//! description.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::article::{Article, CveRecord};
use crate::service::llm::LlmClient;
use crate::service::nvd::CveLookup;

/// Environment variable for the mitigation model (defaults if not set)
const ENV_MITIGATION_MODEL: &str = "MITIGATION_MODEL";

/// Default Gemini model for mitigation generation
const DEFAULT_MITIGATION_MODEL: &str = "gemini-2.0-flash";

const SUGGESTION_SYSTEM_PROMPT: &str = "You are a cybersecurity expert. For the given CVE \
vulnerability, provide 3 specific, actionable mitigation steps. Keep each step concise.";

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("Mitigation generation failed: {0}")]
    GenerationFailed(String),
}

/// Capability for generating mitigation-step text for one CVE.
#[async_trait]
pub trait MitigationAdvisor: Send + Sync {
    /// Suggest mitigation steps, in generation order.
    async fn suggest_mitigations(
        &self,
        cve_id: &str,
        description: &str,
    ) -> Result<Vec<String>, AdvisorError>;
}

/// LLM-extracted mitigation steps
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(description = "Mitigation steps for a CVE vulnerability")]
struct SuggestedMitigations {
    /// Ordered list of steps
    #[schemars(description = "Exactly 3 concise, actionable mitigation steps, most urgent first")]
    steps: Vec<String>,
}

/// Gemini-backed mitigation advisor
pub struct GeminiAdvisor {
    llm: LlmClient,
    model: String,
}

impl GeminiAdvisor {
    pub fn new(llm: LlmClient) -> Self {
        let model = std::env::var(ENV_MITIGATION_MODEL)
            .unwrap_or_else(|_| DEFAULT_MITIGATION_MODEL.to_string());

        tracing::info!(model = %model, "Mitigation advisor initialized");

        Self { llm, model }
    }
}

#[async_trait]
impl MitigationAdvisor for GeminiAdvisor {
    async fn suggest_mitigations(
        &self,
        cve_id: &str,
        description: &str,
    ) -> Result<Vec<String>, AdvisorError> {
        let prompt = format!("CVE: {}\nDescription: {}", cve_id, description);

        let extractor = self
            .llm
            .gemini_client()
            .extractor::<SuggestedMitigations>(&self.model)
            .preamble(SUGGESTION_SYSTEM_PROMPT)
            .build();

        let suggested = extractor
            .extract(&prompt)
            .await
            .map_err(|e| AdvisorError::GenerationFailed(e.to_string()))?;

        if suggested.steps.is_empty() {
            return Err(AdvisorError::GenerationFailed(
                "model returned no steps".to_string(),
            ));
        }

        Ok(suggested.steps)
    }
}

/// Static mitigation suggestions keyed on vulnerability-class terms in the
/// description. Always returns a non-empty list.
pub fn fallback_mitigations(description: &str) -> Vec<String> {
    let lower = description.to_lowercase();

    let steps: &[&str] = if lower.contains("remote code execution") || lower.contains("rce") {
        &[
            "Apply the latest security patches",
            "Restrict network access to affected services",
            "Implement proper input validation and sanitization",
        ]
    } else if lower.contains("denial of service") || lower.contains("dos") {
        &[
            "Implement rate limiting and request throttling",
            "Configure proper resource limits and monitoring",
            "Use a web application firewall (WAF)",
        ]
    } else if lower.contains("information disclosure") || lower.contains("data leak") {
        &[
            "Update to the latest version with security fixes",
            "Implement proper access controls and authentication",
            "Encrypt sensitive data at rest and in transit",
        ]
    } else if lower.contains("buffer overflow") || lower.contains("memory corruption") {
        &[
            "Apply the latest security patches",
            "Enable address space layout randomization (ASLR)",
            "Implement proper bounds checking and input validation",
        ]
    } else if lower.contains("sql injection") || lower.contains("xss") {
        &[
            "Use parameterized queries and prepared statements",
            "Implement proper input validation and sanitization",
            "Enable web application firewall (WAF) rules",
        ]
    } else {
        &[
            "Update to the latest version with security patches",
            "Review and apply vendor security advisories",
            "Implement proper monitoring and logging",
        ]
    };

    steps.iter().map(|s| s.to_string()).collect()
}

/// Enrichment stage over extracted articles.
pub struct EnrichmentService {
    lookup: Arc<dyn CveLookup>,
    advisor: Option<Arc<dyn MitigationAdvisor>>,
}

impl EnrichmentService {
    pub fn new(lookup: Arc<dyn CveLookup>, advisor: Option<Arc<dyn MitigationAdvisor>>) -> Self {
        if advisor.is_none() {
            tracing::warn!("No mitigation advisor configured, using fallback suggestions");
        }

        Self { lookup, advisor }
    }

    /// Resolve every unique CVE id once and attach the resulting records to
    /// their articles. Articles are never dropped here: a failed lookup only
    /// removes that CVE from the article's resolved list.
    pub async fn enrich_articles(&self, mut articles: Vec<Article>) -> Vec<Article> {
        let mut unique_ids: Vec<String> = Vec::new();
        for article in &articles {
            for id in &article.cve_ids {
                if !unique_ids.contains(id) {
                    unique_ids.push(id.clone());
                }
            }
        }

        tracing::info!(
            articles = articles.len(),
            unique_cves = unique_ids.len(),
            "Enriching articles"
        );

        let resolutions = join_all(unique_ids.iter().map(|id| self.resolve_cve(id))).await;

        let resolved: HashMap<String, CveRecord> = unique_ids
            .into_iter()
            .zip(resolutions)
            .filter_map(|(id, record)| record.map(|r| (id, r)))
            .collect();

        for article in &mut articles {
            article.cves = article
                .cve_ids
                .iter()
                .filter_map(|id| resolved.get(id).cloned())
                .collect();
        }

        articles
    }

    /// Look up one CVE and populate its mitigation steps. Returns `None`
    /// when the database has nothing for this id.
    async fn resolve_cve(&self, cve_id: &str) -> Option<CveRecord> {
        let mut record = match self.lookup.lookup(cve_id).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(cve = %cve_id, error = %e, "CVE lookup failed, skipping");
                return None;
            }
        };

        if record.description.is_empty() {
            return Some(record);
        }

        record.mitigation = match &self.advisor {
            Some(advisor) => match advisor.suggest_mitigations(cve_id, &record.description).await {
                Ok(steps) => steps,
                Err(e) => {
                    tracing::warn!(cve = %cve_id, error = %e, "Mitigation generation failed, using fallback");
                    fallback_mitigations(&record.description)
                }
            },
            None => fallback_mitigations(&record.description),
        };

        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::severity::Severity;
    use crate::service::nvd::LookupError;
    use chrono::Utc;
    use std::sync::Mutex;

    struct FakeLookup {
        records: HashMap<String, CveRecord>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeLookup {
        fn with(records: Vec<CveRecord>) -> Self {
            Self {
                records: records.into_iter().map(|r| (r.id.clone(), r)).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CveLookup for FakeLookup {
        async fn lookup(&self, cve_id: &str) -> Result<CveRecord, LookupError> {
            self.calls.lock().unwrap().push(cve_id.to_string());
            self.records
                .get(cve_id)
                .cloned()
                .ok_or_else(|| LookupError::NotFound(cve_id.to_string()))
        }
    }

    struct FakeAdvisor {
        fail: bool,
    }

    #[async_trait]
    impl MitigationAdvisor for FakeAdvisor {
        async fn suggest_mitigations(
            &self,
            cve_id: &str,
            _description: &str,
        ) -> Result<Vec<String>, AdvisorError> {
            if self.fail {
                Err(AdvisorError::GenerationFailed("service down".to_string()))
            } else {
                Ok(vec![
                    format!("Step one for {cve_id}"),
                    format!("Step two for {cve_id}"),
                    format!("Step three for {cve_id}"),
                ])
            }
        }
    }

    fn record(id: &str, score: f64, description: &str) -> CveRecord {
        CveRecord {
            id: id.to_string(),
            severity: Severity::from_score(score),
            cvss_score: score,
            description: description.to_string(),
            affected_systems: vec!["cpe:2.3:a:vendor:product".to_string()],
            mitigation: Vec::new(),
        }
    }

    fn article(ids: &[&str]) -> Article {
        Article {
            title: "Test advisory".to_string(),
            description: String::new(),
            link: "https://example.com/a".to_string(),
            source: "Test".to_string(),
            published: Utc::now(),
            threat_level: Severity::Medium,
            cve_ids: ids.iter().map(|s| s.to_string()).collect(),
            cves: Vec::new(),
        }
    }

    #[tokio::test]
    async fn looks_up_each_unique_id_once() {
        let lookup = Arc::new(FakeLookup::with(vec![
            record("CVE-2024-0001", 9.8, "remote code execution flaw"),
            record("CVE-2024-0002", 5.0, "denial of service flaw"),
        ]));
        let service = EnrichmentService::new(
            lookup.clone(),
            Some(Arc::new(FakeAdvisor { fail: false })),
        );

        let articles = vec![
            article(&["CVE-2024-0001", "CVE-2024-0002"]),
            article(&["CVE-2024-0001"]),
        ];
        let enriched = service.enrich_articles(articles).await;

        assert_eq!(enriched[0].cves.len(), 2);
        assert_eq!(enriched[1].cves.len(), 1);

        let calls = lookup.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
    }

    #[tokio::test]
    async fn failed_lookup_drops_only_that_cve() {
        let lookup = Arc::new(FakeLookup::with(vec![record(
            "CVE-2024-0001",
            9.8,
            "rce flaw",
        )]));
        let service = EnrichmentService::new(lookup, Some(Arc::new(FakeAdvisor { fail: false })));

        let enriched = service
            .enrich_articles(vec![article(&["CVE-2024-0001", "CVE-2024-9999"])])
            .await;

        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].cves.len(), 1);
        assert_eq!(enriched[0].cves[0].id, "CVE-2024-0001");
    }

    #[tokio::test]
    async fn mitigation_steps_keep_generation_order() {
        let lookup = Arc::new(FakeLookup::with(vec![record(
            "CVE-2024-0001",
            9.8,
            "rce flaw",
        )]));
        let service = EnrichmentService::new(lookup, Some(Arc::new(FakeAdvisor { fail: false })));

        let enriched = service.enrich_articles(vec![article(&["CVE-2024-0001"])]).await;

        assert_eq!(
            enriched[0].cves[0].mitigation,
            vec![
                "Step one for CVE-2024-0001",
                "Step two for CVE-2024-0001",
                "Step three for CVE-2024-0001"
            ]
        );
    }

    #[tokio::test]
    async fn advisor_failure_falls_back_to_static_table() {
        let lookup = Arc::new(FakeLookup::with(vec![record(
            "CVE-2024-0001",
            9.8,
            "A remote code execution vulnerability",
        )]));
        let service = EnrichmentService::new(lookup, Some(Arc::new(FakeAdvisor { fail: true })));

        let enriched = service.enrich_articles(vec![article(&["CVE-2024-0001"])]).await;

        assert_eq!(
            enriched[0].cves[0].mitigation,
            fallback_mitigations("A remote code execution vulnerability")
        );
    }

    #[tokio::test]
    async fn missing_advisor_uses_fallback() {
        let lookup = Arc::new(FakeLookup::with(vec![record(
            "CVE-2024-0001",
            5.0,
            "SQL injection in login form",
        )]));
        let service = EnrichmentService::new(lookup, None);

        let enriched = service.enrich_articles(vec![article(&["CVE-2024-0001"])]).await;

        assert!(!enriched[0].cves[0].mitigation.is_empty());
        assert!(enriched[0].cves[0].mitigation[0].contains("parameterized queries"));
    }

    #[test]
    fn fallback_table_never_empty() {
        for description in [
            "remote code execution",
            "denial of service",
            "information disclosure",
            "buffer overflow",
            "reflected xss",
            "something else entirely",
            "",
        ] {
            assert_eq!(fallback_mitigations(description).len(), 3);
        }
    }
}
