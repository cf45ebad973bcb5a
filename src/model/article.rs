//! Threat article and CVE record models
//!
//! These are the units flowing through the ingestion pipeline. Field names
//! serialize in the camelCase form the dashboard UI consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::severity::Severity;

/// A single CVE reference, enriched with NVD data where available.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CveRecord {
    /// Canonical identifier, always `CVE-<4 digits>-<4+ digits>`.
    pub id: String,

    /// Tier derived purely from `cvss_score`.
    pub severity: Severity,

    /// CVSS base score; 0.0 when unknown.
    pub cvss_score: f64,

    pub description: String,

    /// Affected systems as CPE criteria strings.
    pub affected_systems: Vec<String>,

    /// Mitigation steps in generation order. Empty when enrichment failed.
    pub mitigation: Vec<String>,
}

/// One feed entry that mentions at least one CVE.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,

    pub description: String,

    pub link: String,

    /// Human-readable source name, e.g. "The Hacker News".
    pub source: String,

    /// Publication timestamp from the feed entry.
    #[serde(rename = "date")]
    pub published: DateTime<Utc>,

    /// Coarse tier assigned at scrape time from title keywords.
    pub threat_level: Severity,

    /// CVE identifiers extracted from title + description.
    #[serde(skip)]
    pub cve_ids: Vec<String>,

    /// Enriched CVE records; populated by the enrichment stage.
    pub cves: Vec<CveRecord>,
}
