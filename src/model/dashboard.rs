//! Dashboard reporting models
//!
//! Derived views over enriched articles: the per-article `ThreatItem` with
//! its reconciled severity, and the aggregate `DashboardSnapshot` and
//! `ThreatReport` returned by the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::article::Article;
use super::severity::{Severity, SeverityHistogram};

/// Threat category assigned by the text classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ThreatCategory {
    Malware,
    Phishing,
    Vulnerability,
    #[serde(rename = "DDoS")]
    Ddos,
    Other,
}

impl ThreatCategory {
    /// All categories in classifier priority order.
    pub const ALL: [ThreatCategory; 5] = [
        ThreatCategory::Malware,
        ThreatCategory::Phishing,
        ThreatCategory::Vulnerability,
        ThreatCategory::Ddos,
        ThreatCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatCategory::Malware => "Malware",
            ThreatCategory::Phishing => "Phishing",
            ThreatCategory::Vulnerability => "Vulnerability",
            ThreatCategory::Ddos => "DDoS",
            ThreatCategory::Other => "Other",
        }
    }
}

/// Abbreviated CVE view embedded in a `ThreatItem`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CveSummary {
    pub id: String,
    pub cvss_score: f64,
    /// Tier derived from the raw score, unaffected by reconciliation.
    pub severity: Severity,
}

/// Reporting view of one article with its reconciled severity.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThreatItem {
    /// First CVE id, falling back to the title.
    pub id: String,
    pub title: String,
    pub description: String,
    pub source: String,

    /// Reconciled overall severity (score-first, keyword-fallback).
    pub severity: Severity,

    pub published_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,

    /// The score used to justify `severity`.
    pub cvss_score: f64,

    pub cves: Vec<CveSummary>,

    /// True when `severity` outranks the tier implied by the CVE records alone.
    pub severity_elevated: bool,
}

/// One calendar day in the 7-day trend series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TrendPoint {
    /// Day label, e.g. "Apr 5".
    pub name: String,
    #[serde(rename = "Malware")]
    pub malware: u64,
    #[serde(rename = "Phishing")]
    pub phishing: u64,
    #[serde(rename = "Vulnerability")]
    pub vulnerability: u64,
    #[serde(rename = "DDoS")]
    pub ddos: u64,
    #[serde(rename = "Other")]
    pub other: u64,
}

/// One row of the category distribution histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DistributionEntry {
    pub name: String,
    pub value: u64,
}

/// Point-in-time dashboard aggregate. Immutable once computed; the cache
/// gate replaces it wholesale on expiry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub total_threats: u64,
    /// Threats published within the trailing 7 days.
    pub recent_threats: u64,
    /// Articles with at least one CVE carrying mitigation steps.
    pub mitigated_threats: u64,
    pub critical_threats: u64,
    /// Total CVE references across all articles.
    pub cves_monitored: u64,
    /// 0-100 weighted severity scalar.
    pub threat_level: f64,
    /// Exactly 7 entries, 6 days ago through today, chronological.
    pub threat_trends: Vec<TrendPoint>,
    pub threat_distribution: Vec<DistributionEntry>,
    pub recent_threats_list: Vec<ThreatItem>,
    /// Histogram over raw CVE scores only; elevation never affects it.
    pub cve_severity: SeverityHistogram,
    pub last_updated: DateTime<Utc>,
}

/// Headline statistics for the threats endpoint and the export job.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThreatSummary {
    pub active_threats: u64,
    /// Unique CVE identifiers across all articles.
    pub cves_monitored: u64,
    /// CVEs with a non-empty mitigation list, counted per CVE.
    pub mitigations_applied: u64,
    /// Highest tier present among CVE records.
    pub threat_level: Severity,
    /// Counts of score-derived tiers; unknown-score CVEs land in `low`.
    pub severity_distribution: SeverityHistogram,
}

/// Summary plus the full article list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ThreatReport {
    pub summary: ThreatSummary,
    pub threats: Vec<Article>,
}
