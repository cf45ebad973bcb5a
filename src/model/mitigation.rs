//! Mitigation plan models
//!
//! The plan structure doubles as the LLM extraction target: schemars
//! annotations describe each field to the extractor, and serde enforces the
//! four-key shape when parsing the structured response.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for on-demand mitigation plan generation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MitigationPlanRequest {
    /// Target CVE, validated against `^CVE-\d{4}-\d{4,}$` before any
    /// external call.
    pub cve_id: String,

    /// Target environment, e.g. "production Kubernetes cluster".
    #[serde(default)]
    pub environment: Option<String>,

    /// Specific affected systems or assets.
    #[serde(default)]
    pub affected_systems: Option<String>,

    /// Operational constraints to respect.
    #[serde(default)]
    pub constraints: Option<String>,
}

/// Structured mitigation plan.
///
/// Exactly these four keys, each an array of actionable steps.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(description = "Structured cybersecurity mitigation plan for a single CVE")]
pub struct MitigationPlan {
    /// Steps to take right now.
    #[schemars(description = "Actions to take immediately, e.g. 'Isolate affected systems.'")]
    pub immediate_actions: Vec<String>,

    /// Remediation over the coming days or weeks.
    #[schemars(description = "Short-term remediation steps, e.g. 'Apply vendor patch XYZ.'")]
    pub short_term_remediation: Vec<String>,

    /// Structural fixes.
    #[schemars(description = "Long-term solutions, e.g. 'Implement network segmentation.'")]
    pub long_term_solutions: Vec<String>,

    /// Anything else worth doing.
    #[schemars(
        description = "Additional recommendations, e.g. 'Monitor logs for indicators of compromise.'"
    )]
    pub additional_recommendations: Vec<String>,
}

/// Request body for persisting a generated plan.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavePlanRequest {
    pub cve_id: String,
    pub mitigation_plan: MitigationPlan,
}

/// Response for a persisted plan.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavePlanResponse {
    pub success: bool,
    pub message: String,
    pub file_name: String,
}
