//! NVD CVE API 2.0 response models
//!
//! Covers the subset of <https://services.nvd.nist.gov/rest/json/cves/2.0>
//! this service reads: CVSS v3.1/v3.0 base scores, descriptions, and CPE
//! criteria for affected systems.

use serde::{Deserialize, Serialize};

/// Top-level response for a `cveId` query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NvdResponse {
    #[serde(default)]
    pub vulnerabilities: Vec<NvdVulnerability>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NvdVulnerability {
    pub cve: NvdCve,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NvdCve {
    pub id: String,

    #[serde(default)]
    pub descriptions: Vec<NvdDescription>,

    #[serde(default)]
    pub metrics: Option<NvdMetrics>,

    #[serde(default)]
    pub configurations: Vec<NvdConfiguration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NvdDescription {
    pub lang: String,
    pub value: String,
}

/// CVSS metric containers. v3.1 is preferred, v3.0 is the fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NvdMetrics {
    #[serde(rename = "cvssMetricV31", default)]
    pub cvss_v31: Vec<NvdCvssMetric>,

    #[serde(rename = "cvssMetricV30", default)]
    pub cvss_v30: Vec<NvdCvssMetric>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NvdCvssMetric {
    #[serde(rename = "cvssData")]
    pub cvss_data: NvdCvssData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NvdCvssData {
    #[serde(rename = "baseScore")]
    pub base_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NvdConfiguration {
    #[serde(default)]
    pub nodes: Vec<NvdNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NvdNode {
    #[serde(rename = "cpeMatch", default)]
    pub cpe_match: Vec<NvdCpeMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NvdCpeMatch {
    pub criteria: String,
}

impl NvdCve {
    /// CVSS base score, preferring v3.1 over v3.0. 0.0 when neither is present.
    pub fn base_score(&self) -> f64 {
        let metrics = match &self.metrics {
            Some(m) => m,
            None => return 0.0,
        };

        metrics
            .cvss_v31
            .first()
            .or_else(|| metrics.cvss_v30.first())
            .map(|m| m.cvss_data.base_score)
            .unwrap_or(0.0)
    }

    /// English description, falling back to the first available one.
    pub fn description(&self) -> Option<&str> {
        self.descriptions
            .iter()
            .find(|d| d.lang == "en")
            .or_else(|| self.descriptions.first())
            .map(|d| d.value.as_str())
    }

    /// One CPE criteria string per configuration node.
    pub fn affected_systems(&self) -> Vec<String> {
        let systems: Vec<String> = self
            .configurations
            .first()
            .map(|c| {
                c.nodes
                    .iter()
                    .map(|n| {
                        n.cpe_match
                            .first()
                            .map(|m| m.criteria.clone())
                            .unwrap_or_else(|| "Unknown".to_string())
                    })
                    .collect()
            })
            .unwrap_or_default();

        if systems.is_empty() {
            vec!["Unknown".to_string()]
        } else {
            systems
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_v31_score() {
        let json = serde_json::json!({
            "id": "CVE-2024-0001",
            "metrics": {
                "cvssMetricV31": [{"cvssData": {"baseScore": 9.8}}],
                "cvssMetricV30": [{"cvssData": {"baseScore": 7.5}}]
            }
        });
        let cve: NvdCve = serde_json::from_value(json).unwrap();
        assert_eq!(cve.base_score(), 9.8);
    }

    #[test]
    fn falls_back_to_v30_then_zero() {
        let json = serde_json::json!({
            "id": "CVE-2024-0002",
            "metrics": {"cvssMetricV30": [{"cvssData": {"baseScore": 6.1}}]}
        });
        let cve: NvdCve = serde_json::from_value(json).unwrap();
        assert_eq!(cve.base_score(), 6.1);

        let bare: NvdCve = serde_json::from_value(serde_json::json!({"id": "CVE-2024-0003"})).unwrap();
        assert_eq!(bare.base_score(), 0.0);
        assert_eq!(bare.affected_systems(), vec!["Unknown".to_string()]);
    }

    #[test]
    fn prefers_english_description() {
        let json = serde_json::json!({
            "id": "CVE-2024-0004",
            "descriptions": [
                {"lang": "es", "value": "descripcion"},
                {"lang": "en", "value": "description"}
            ]
        });
        let cve: NvdCve = serde_json::from_value(json).unwrap();
        assert_eq!(cve.description(), Some("description"));
    }
}
