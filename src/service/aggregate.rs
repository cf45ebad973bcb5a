//! Dashboard aggregation
//!
//! Pure, deterministic computation of the dashboard snapshot and the threat
//! summary from enriched articles plus an explicit `now`. Re-running with
//! identical inputs at the same instant yields identical output.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::model::article::Article;
use crate::model::dashboard::{
    CveSummary, DashboardSnapshot, DistributionEntry, ThreatCategory, ThreatItem, ThreatReport,
    ThreatSummary, TrendPoint,
};
use crate::model::severity::{Severity, SeverityHistogram};
use crate::service::classify::{categorize, reconcile_severity};

/// Build the reporting view of each article, reconciling its severity.
pub fn build_threat_items(articles: &[Article]) -> Vec<ThreatItem> {
    articles
        .iter()
        .map(|article| {
            let reconciled = reconcile_severity(
                &article.title,
                &article.description,
                article.threat_level,
                &article.cves,
            );

            ThreatItem {
                id: article
                    .cves
                    .first()
                    .map(|c| c.id.clone())
                    .unwrap_or_else(|| article.title.clone()),
                title: article.title.clone(),
                description: article.description.clone(),
                source: article.source.clone(),
                severity: reconciled.severity,
                published_date: article.published,
                last_modified_date: article.published,
                cvss_score: reconciled.score_to_report,
                cves: article
                    .cves
                    .iter()
                    .map(|c| CveSummary {
                        id: c.id.clone(),
                        cvss_score: c.cvss_score,
                        severity: Severity::from_score(c.cvss_score),
                    })
                    .collect(),
                severity_elevated: reconciled.elevated,
            }
        })
        .collect()
}

/// Weighted 0-100 severity scalar.
///
/// The weights and the x10 scaling are an inherited heuristic kept verbatim
/// for output compatibility; see DESIGN.md.
fn threat_level_score(counts: &SeverityHistogram, total: usize) -> f64 {
    let weighted = 25.0 * counts.critical as f64
        + 15.0 * counts.high as f64
        + 10.0 * counts.medium as f64
        + 5.0 * counts.low as f64;

    (weighted / total.max(1) as f64 * 10.0).clamp(0.0, 100.0)
}

/// Compute a complete dashboard snapshot.
pub fn build_snapshot(articles: &[Article], now: DateTime<Utc>) -> DashboardSnapshot {
    let items = build_threat_items(articles);
    let seven_days_ago = now - Duration::days(7);

    let mut overall_counts = SeverityHistogram::default();
    for item in &items {
        overall_counts.record_tier(item.severity);
    }

    let mut cve_severity = SeverityHistogram::default();
    for article in articles {
        for cve in &article.cves {
            cve_severity.record_score(cve.cvss_score);
        }
    }

    let recent_threats = items
        .iter()
        .filter(|i| i.published_date > seven_days_ago)
        .count() as u64;

    let mitigated_threats = articles
        .iter()
        .filter(|a| a.cves.iter().any(|c| !c.mitigation.is_empty()))
        .count() as u64;

    let cves_monitored = articles.iter().map(|a| a.cves.len() as u64).sum();

    let critical_threats = overall_counts.critical;
    let threat_level = threat_level_score(&overall_counts, items.len());

    DashboardSnapshot {
        total_threats: items.len() as u64,
        recent_threats,
        mitigated_threats,
        critical_threats,
        cves_monitored,
        threat_level,
        threat_trends: build_trends(articles, now),
        threat_distribution: build_distribution(articles),
        recent_threats_list: items,
        cve_severity,
        last_updated: now,
    }
}

/// Exactly 7 entries, one per calendar day from 6 days ago through today,
/// in chronological order. Categories with no articles stay at 0.
fn build_trends(articles: &[Article], now: DateTime<Utc>) -> Vec<TrendPoint> {
    (0..7)
        .map(|i| {
            let day = (now - Duration::days(6 - i)).date_naive();

            let mut point = TrendPoint {
                name: day.format("%b %-d").to_string(),
                malware: 0,
                phishing: 0,
                vulnerability: 0,
                ddos: 0,
                other: 0,
            };

            for article in articles {
                if article.published.date_naive() != day {
                    continue;
                }
                match categorize(&article.title, &article.description) {
                    ThreatCategory::Malware => point.malware += 1,
                    ThreatCategory::Phishing => point.phishing += 1,
                    ThreatCategory::Vulnerability => point.vulnerability += 1,
                    ThreatCategory::Ddos => point.ddos += 1,
                    ThreatCategory::Other => point.other += 1,
                }
            }

            point
        })
        .collect()
}

/// One entry per category with at least one article, in fixed category order.
fn build_distribution(articles: &[Article]) -> Vec<DistributionEntry> {
    ThreatCategory::ALL
        .iter()
        .filter_map(|category| {
            let count = articles
                .iter()
                .filter(|a| categorize(&a.title, &a.description) == *category)
                .count() as u64;

            (count > 0).then(|| DistributionEntry {
                name: category.as_str().to_string(),
                value: count,
            })
        })
        .collect()
}

/// Compute the summary + article list served by the threats endpoint and
/// written by the export job.
pub fn build_report(articles: Vec<Article>) -> ThreatReport {
    let unique_cves: HashSet<&str> = articles
        .iter()
        .flat_map(|a| a.cves.iter().map(|c| c.id.as_str()))
        .collect();

    let mitigations_applied = articles
        .iter()
        .flat_map(|a| a.cves.iter())
        .filter(|c| !c.mitigation.is_empty())
        .count() as u64;

    // Tier-based distribution: every CVE counts, score-0 records land in Low.
    let mut severity_distribution = SeverityHistogram::default();
    for cve in articles.iter().flat_map(|a| a.cves.iter()) {
        severity_distribution.record_tier(cve.severity);
    }

    let threat_level = if severity_distribution.critical > 0 {
        Severity::Critical
    } else if severity_distribution.high > 0 {
        Severity::High
    } else if severity_distribution.medium > 0 {
        Severity::Medium
    } else {
        Severity::Low
    };

    let summary = ThreatSummary {
        active_threats: articles.len() as u64,
        cves_monitored: unique_cves.len() as u64,
        mitigations_applied,
        threat_level,
        severity_distribution,
    };

    ThreatReport {
        summary,
        threats: articles,
    }
}
