//! NVD CVE API client
//!
//! Provides the vulnerability-database lookup capability behind the
//! `CveLookup` trait so the enrichment pipeline can be tested with fakes.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::model::article::CveRecord;
use crate::model::nvd::NvdResponse;
use crate::model::severity::Severity;

const NVD_API_BASE_URL: &str = "https://services.nvd.nist.gov/rest/json/cves/2.0";
const NVD_BASE_URL_ENV: &str = "NVD_BASE_URL";
const ENV_NVD_API_KEY: &str = "NVD_API_KEY";

/// Outbound request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("NVD API key is not configured")]
    MissingApiKey,

    #[error("No data found for {0}")]
    NotFound(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Lookup capability for CVE details.
#[async_trait]
pub trait CveLookup: Send + Sync {
    /// Fetch the authoritative record for one CVE id.
    async fn lookup(&self, cve_id: &str) -> Result<CveRecord, LookupError>;
}

/// Client for the NVD CVE API 2.0
pub struct NvdClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl NvdClient {
    /// Create a new NVD client.
    ///
    /// The base URL is resolved in this order:
    /// 1. `NVD_BASE_URL` environment variable if set
    /// 2. Default NVD API URL
    ///
    /// The API key is read from `NVD_API_KEY`; lookups fail with
    /// `LookupError::MissingApiKey` when it is absent.
    pub fn new() -> Self {
        let base_url = env::var(NVD_BASE_URL_ENV)
            .ok()
            .unwrap_or_else(|| NVD_API_BASE_URL.to_string());

        let api_key = env::var(ENV_NVD_API_KEY).ok().filter(|k| !k.is_empty());

        if api_key.is_none() {
            tracing::warn!("NVD API key not configured, CVE lookups will be skipped");
        }

        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    /// Whether lookups can be attempted at all.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for NvdClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CveLookup for NvdClient {
    async fn lookup(&self, cve_id: &str) -> Result<CveRecord, LookupError> {
        let api_key = self.api_key.as_deref().ok_or(LookupError::MissingApiKey)?;

        let url = format!("{}?cveId={}", self.base_url, cve_id);

        tracing::debug!(cve = %cve_id, url = %url, "Fetching CVE details from NVD");

        let response = self
            .client
            .get(&url)
            .header("apiKey", api_key)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::ParseError(format!(
                "Unexpected status {}: {}",
                status, body
            )));
        }

        let parsed: NvdResponse = response
            .json()
            .await
            .map_err(|e| LookupError::ParseError(format!("Failed to deserialize response: {}", e)))?;

        let cve = parsed
            .vulnerabilities
            .first()
            .map(|v| &v.cve)
            .ok_or_else(|| LookupError::NotFound(cve_id.to_string()))?;

        let cvss_score = cve.base_score();

        tracing::debug!(
            cve = %cve_id,
            score = cvss_score,
            "Successfully fetched CVE details"
        );

        Ok(CveRecord {
            id: cve_id.to_string(),
            severity: Severity::from_score(cvss_score),
            cvss_score,
            description: cve
                .description()
                .unwrap_or("No description available")
                .to_string(),
            affected_systems: cve.affected_systems(),
            mitigation: Vec::new(),
        })
    }
}
