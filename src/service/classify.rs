//! Severity classification and threat categorization
//!
//! Two keyword vocabularies are in play: the reduced scrape-time scan used
//! by feed adapters to tag articles, and the richer reconciliation scan used
//! when deriving a threat item's overall severity. The reconciliation itself
//! is an ordered cascade of strategies (CVE score, text-recovered score,
//! keyword scan), each of which either returns an opinion or defers to the
//! next.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::article::CveRecord;
use crate::model::dashboard::ThreatCategory;
use crate::model::severity::Severity;

/// Scrape-time critical keywords.
const INITIAL_CRITICAL_KEYWORDS: &[&str] = &["critical", "zero-day", "actively exploited"];
/// Scrape-time high keywords.
const INITIAL_HIGH_KEYWORDS: &[&str] = &["high", "severe", "security breach"];
/// Scrape-time low keywords.
const INITIAL_LOW_KEYWORDS: &[&str] = &["low", "minor"];

/// Reconciliation keyword tiers.
const CRITICAL_KEYWORDS: &[&str] = &[
    "critical",
    "actively exploited",
    "zero-day",
    "rce",
    "remote code execution",
];
const HIGH_KEYWORDS: &[&str] = &["high", "important", "security bypass"];
const MEDIUM_KEYWORDS: &[&str] = &["medium", "moderate"];

/// `CVSS 9.8` in a title.
static TITLE_CVSS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)CVSS\s+(\d+\.?\d*)").unwrap());

/// `CVSS score: 9.8` in a description.
static DESC_CVSS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)CVSS score:\s*(\d+\.?\d*)").unwrap());

/// Assign the coarse threat level a feed adapter tags an article with,
/// from title keywords alone. Defaults to Medium.
pub fn initial_threat_level(title: &str) -> Severity {
    let title = title.to_lowercase();

    if INITIAL_CRITICAL_KEYWORDS.iter().any(|k| title.contains(k)) {
        Severity::Critical
    } else if INITIAL_HIGH_KEYWORDS.iter().any(|k| title.contains(k)) {
        Severity::High
    } else if INITIAL_LOW_KEYWORDS.iter().any(|k| title.contains(k)) {
        Severity::Low
    } else {
        Severity::Medium
    }
}

/// Classify a threat into exactly one category by first-match keyword scan,
/// in priority order Malware > Phishing > Vulnerability > DDoS > Other.
pub fn categorize(title: &str, description: &str) -> ThreatCategory {
    let text = format!("{} {}", title, description).to_lowercase();

    if ["malware", "ransomware", "trojan"].iter().any(|k| text.contains(k)) {
        ThreatCategory::Malware
    } else if ["phishing", "social engineering", "credential"]
        .iter()
        .any(|k| text.contains(k))
    {
        ThreatCategory::Phishing
    } else if ["vulnerability", "exploit", "cve"].iter().any(|k| text.contains(k)) {
        ThreatCategory::Vulnerability
    } else if ["ddos", "denial of service"].iter().any(|k| text.contains(k)) {
        ThreatCategory::Ddos
    } else {
        ThreatCategory::Other
    }
}

/// Outcome of severity reconciliation for one article.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconciledSeverity {
    /// The overall severity to report.
    pub severity: Severity,
    /// The score used to justify it.
    pub score_to_report: f64,
    /// True when `severity` strictly outranks the tier implied by the CVE
    /// records alone.
    pub elevated: bool,
}

/// Reconcile an article's overall severity from its CVE scores, scores
/// recovered from free text, and keyword signals, in that priority order.
pub fn reconcile_severity(
    title: &str,
    description: &str,
    initial_level: Severity,
    cves: &[CveRecord],
) -> ReconciledSeverity {
    let highest_cve_score = cves.iter().map(|c| c.cvss_score).fold(0.0, f64::max);
    let cve_only = Severity::from_score(highest_cve_score);

    let (severity, score_to_report) = cve_score_opinion(highest_cve_score)
        .or_else(|| text_score_opinion(title, description))
        .unwrap_or_else(|| keyword_opinion(title, initial_level, highest_cve_score));

    ReconciledSeverity {
        severity,
        score_to_report,
        elevated: severity > cve_only,
    }
}

/// Strategy 1: trust the CVE-derived score when it reaches Medium.
fn cve_score_opinion(highest_cve_score: f64) -> Option<(Severity, f64)> {
    if highest_cve_score >= 4.0 {
        Some((Severity::from_score(highest_cve_score), highest_cve_score))
    } else {
        None
    }
}

/// Strategy 2: recover a score from free text. Two independent patterns;
/// the maximum recovered value wins, and it must also reach Medium.
fn text_score_opinion(title: &str, description: &str) -> Option<(Severity, f64)> {
    let from_title = capture_score(&TITLE_CVSS_PATTERN, title);
    let from_description = capture_score(&DESC_CVSS_PATTERN, description);

    let recovered = match (from_title, from_description) {
        (Some(a), Some(b)) => a.max(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };

    if recovered >= 4.0 {
        // A text-recovered score below 9.0 never reads as Critical-by-Low:
        // the band collapses to Medium rather than Low.
        let severity = if recovered >= 9.0 {
            Severity::Critical
        } else if recovered >= 7.0 {
            Severity::High
        } else {
            Severity::Medium
        };
        Some((severity, recovered))
    } else {
        None
    }
}

/// Strategy 3: keyword scan over the title combined with the scrape-time
/// tag; always has an opinion, defaulting to Low. Reports the (sub-Medium)
/// CVE score since no better one exists.
fn keyword_opinion(title: &str, initial_level: Severity, highest_cve_score: f64) -> (Severity, f64) {
    let title = title.to_lowercase();

    let severity = if initial_level == Severity::Critical
        || CRITICAL_KEYWORDS.iter().any(|k| title.contains(k))
    {
        Severity::Critical
    } else if initial_level == Severity::High || HIGH_KEYWORDS.iter().any(|k| title.contains(k)) {
        Severity::High
    } else if initial_level == Severity::Medium || MEDIUM_KEYWORDS.iter().any(|k| title.contains(k))
    {
        Severity::Medium
    } else {
        Severity::Low
    };

    (severity, highest_cve_score)
}

fn capture_score(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cve(score: f64) -> CveRecord {
        CveRecord {
            id: "CVE-2024-10000".to_string(),
            severity: Severity::from_score(score),
            cvss_score: score,
            description: String::new(),
            affected_systems: Vec::new(),
            mitigation: Vec::new(),
        }
    }

    #[test]
    fn initial_level_keyword_tiers() {
        assert_eq!(initial_threat_level("Critical flaw in router"), Severity::Critical);
        assert_eq!(initial_threat_level("New zero-day under attack"), Severity::Critical);
        assert_eq!(initial_threat_level("Severe bug in VPN appliance"), Severity::High);
        assert_eq!(initial_threat_level("Minor issue in CLI tool"), Severity::Low);
        assert_eq!(initial_threat_level("Router firmware update"), Severity::Medium);
    }

    #[test]
    fn categorize_priority_order() {
        // "ransomware exploit" mentions both Malware and Vulnerability terms;
        // Malware wins by priority.
        assert_eq!(categorize("Ransomware exploit kit", ""), ThreatCategory::Malware);
        assert_eq!(categorize("Credential harvesting campaign", ""), ThreatCategory::Phishing);
        assert_eq!(categorize("Exploit for CVE released", ""), ThreatCategory::Vulnerability);
        assert_eq!(categorize("Record DDoS attack", ""), ThreatCategory::Ddos);
        assert_eq!(categorize("Conference announcement", ""), ThreatCategory::Other);
    }

    #[test]
    fn cve_score_wins_when_medium_or_above() {
        let result = reconcile_severity("Some advisory", "", Severity::Medium, &[cve(9.8)]);
        assert_eq!(result.severity, Severity::Critical);
        assert_eq!(result.score_to_report, 9.8);
        assert!(!result.elevated);

        // Keywords in the title are ignored once the score speaks.
        let result = reconcile_severity(
            "Critical zero-day!",
            "",
            Severity::Critical,
            &[cve(5.0)],
        );
        assert_eq!(result.severity, Severity::Medium);
        assert!(!result.elevated);
    }

    #[test]
    fn text_score_used_when_cve_score_is_low() {
        let result = reconcile_severity(
            "Bug rated CVSS 8.1 in parser",
            "",
            Severity::Medium,
            &[cve(2.0)],
        );
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.score_to_report, 8.1);
        assert!(result.elevated);
    }

    #[test]
    fn description_text_score_pattern() {
        let result = reconcile_severity(
            "Parser bug",
            "The flaw has a CVSS score: 9.1 per the vendor.",
            Severity::Medium,
            &[],
        );
        assert_eq!(result.severity, Severity::Critical);
        assert_eq!(result.score_to_report, 9.1);
        assert!(result.elevated);
    }

    #[test]
    fn max_of_both_text_scores_wins() {
        let result = reconcile_severity(
            "Flaw CVSS 6.5 in libfoo",
            "Vendor assigns CVSS score: 7.2",
            Severity::Medium,
            &[],
        );
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.score_to_report, 7.2);
    }

    #[test]
    fn keyword_fallback_elevates_low_scoring_cve() {
        let result = reconcile_severity(
            "Zero-day actively exploited in the wild",
            "",
            Severity::Medium,
            &[cve(2.0)],
        );
        assert_eq!(result.severity, Severity::Critical);
        assert_eq!(result.score_to_report, 2.0);
        assert!(result.elevated);
    }

    #[test]
    fn scrape_time_tag_feeds_the_fallback() {
        let result = reconcile_severity("Advisory issued", "", Severity::High, &[cve(1.0)]);
        assert_eq!(result.severity, Severity::High);
        assert!(result.elevated);
    }

    #[test]
    fn defaults_to_low_without_signals() {
        let result = reconcile_severity("Advisory issued", "", Severity::Low, &[]);
        assert_eq!(result.severity, Severity::Low);
        assert_eq!(result.score_to_report, 0.0);
        assert!(!result.elevated);
    }

    #[test]
    fn sub_medium_text_score_defers_to_keywords() {
        let result = reconcile_severity(
            "Moderate flaw CVSS 3.1 reported",
            "",
            Severity::Low,
            &[],
        );
        // 3.1 never reaches the text-score strategy's threshold; the
        // keyword scan sees "moderate" instead.
        assert_eq!(result.severity, Severity::Medium);
        assert!(result.elevated);
    }
}
