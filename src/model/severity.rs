//! Severity tiers and CVSS score classification

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Severity tier for a threat or CVE.
///
/// Variant order matters: `Low < Medium < High < Critical`, so the derived
/// `Ord` gives the ranking used for elevation checks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Map a CVSS base score to a tier.
    ///
    /// Thresholds are inclusive on the lower edge of each band:
    /// >= 9.0 Critical, >= 7.0 High, >= 4.0 Medium, else Low.
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            Severity::Critical
        } else if score >= 7.0 {
            Severity::High
        } else if score >= 4.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Histogram of CVE counts per severity bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SeverityHistogram {
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl SeverityHistogram {
    /// Bucket a raw CVSS score. A score of exactly 0 is treated as absent
    /// and contributes to no bucket.
    pub fn record_score(&mut self, score: f64) {
        if score >= 9.0 {
            self.critical += 1;
        } else if score >= 7.0 {
            self.high += 1;
        } else if score >= 4.0 {
            self.medium += 1;
        } else if score > 0.0 {
            self.low += 1;
        }
    }

    /// Bucket by tier, regardless of the underlying score.
    pub fn record_tier(&mut self, tier: Severity) {
        match tier {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn score_thresholds_are_lower_inclusive() {
        assert_eq!(Severity::from_score(10.0), Severity::Critical);
        assert_eq!(Severity::from_score(9.0), Severity::Critical);
        assert_eq!(Severity::from_score(8.9), Severity::High);
        assert_eq!(Severity::from_score(7.0), Severity::High);
        assert_eq!(Severity::from_score(6.9), Severity::Medium);
        assert_eq!(Severity::from_score(4.0), Severity::Medium);
        assert_eq!(Severity::from_score(3.9), Severity::Low);
        assert_eq!(Severity::from_score(0.0), Severity::Low);
    }

    #[test]
    fn zero_score_is_not_counted() {
        let mut histogram = SeverityHistogram::default();
        histogram.record_score(0.0);
        assert_eq!(histogram, SeverityHistogram::default());

        histogram.record_score(0.1);
        assert_eq!(histogram.low, 1);
    }

    #[test]
    fn serializes_capitalized() {
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"Critical\""
        );
    }
}
