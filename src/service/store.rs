//! File persistence for mitigation plans and snapshot exports

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::model::dashboard::ThreatReport;
use crate::model::mitigation::MitigationPlan;

const PLANS_SUBDIR: &str = "mitigation-plans";
const THREATS_FILE: &str = "threats.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Exported threat report with its write timestamp.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedReport<'a> {
    #[serde(flatten)]
    report: &'a ThreatReport,
    last_updated: DateTime<Utc>,
}

/// Writes plans and reports under the configured data directory.
pub struct PlanStore {
    base_dir: PathBuf,
}

impl PlanStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Persist a plan as one JSON file per (CVE id, date) pair.
    /// Returns the file name written.
    pub async fn save_plan(
        &self,
        cve_id: &str,
        plan: &MitigationPlan,
        date: NaiveDate,
    ) -> Result<String, StoreError> {
        let dir = self.base_dir.join(PLANS_SUBDIR);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}-{}.json", cve_id, date.format("%Y-%m-%d"));
        let contents = serde_json::to_vec_pretty(plan)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let path = dir.join(&file_name);
        tokio::fs::write(&path, contents).await?;

        tracing::info!(path = %path.display(), "Saved mitigation plan");

        Ok(file_name)
    }

    /// Write the full threat report to `threats.json`.
    pub async fn export_report(
        &self,
        report: &ThreatReport,
        now: DateTime<Utc>,
    ) -> Result<PathBuf, StoreError> {
        tokio::fs::create_dir_all(&self.base_dir).await?;

        let exported = ExportedReport {
            report,
            last_updated: now,
        };
        let contents = serde_json::to_vec_pretty(&exported)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let path = self.base_dir.join(THREATS_FILE);
        tokio::fs::write(&path, contents).await?;

        tracing::info!(
            path = %path.display(),
            threats = report.threats.len(),
            "Exported threat report"
        );

        Ok(path)
    }
}
