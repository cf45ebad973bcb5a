//! On-demand mitigation plan service
//!
//! Generates a structured plan for a single CVE: validates the requested id,
//! pulls the official description from the vulnerability database when
//! available, asks the generative service for a structured plan, and
//! rejects malformed output.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::mitigation::{MitigationPlan, MitigationPlanRequest};
use crate::service::llm::LlmClient;
use crate::service::nvd::CveLookup;

mod prompts;
mod validation;

use prompts::{build_plan_prompt, PLAN_SYSTEM_PROMPT};
pub use validation::{validate_plan, PlanValidationResult};

/// Environment variable for the plan model (defaults if not set)
const ENV_PLAN_MODEL: &str = "PLAN_MODEL";

/// Default Gemini model for plan generation
const DEFAULT_PLAN_MODEL: &str = "gemini-2.0-flash";

/// Description used when the vulnerability database has nothing for the id.
const MISSING_DESCRIPTION: &str = "No official description readily available.";

/// Canonical CVE id format accepted by the endpoint.
static CVE_ID_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^CVE-\d{4}-\d{4,}$").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum MitigationError {
    /// Rejected before any external call.
    #[error("Valid CVE ID is required (e.g., CVE-YYYY-NNNN): got '{0}'")]
    InvalidCveId(String),

    /// The generative service is not configured. The message stays generic;
    /// it must not reveal which variable is missing.
    #[error("Server configuration error prevented plan generation")]
    MissingConfiguration,

    /// Transport-level failure talking to the generative service.
    #[error("AI service failed: {0}")]
    GenerationFailed(String),

    /// The service answered, but not with a usable plan.
    #[error("AI service returned an invalid plan format: {0}")]
    InvalidPlan(String),
}

/// Service for generating mitigation plans
pub struct MitigationService {
    llm: Option<LlmClient>,
    lookup: Arc<dyn CveLookup>,
    model: String,
}

impl MitigationService {
    pub fn new(llm: Option<LlmClient>, lookup: Arc<dyn CveLookup>) -> Self {
        let model =
            std::env::var(ENV_PLAN_MODEL).unwrap_or_else(|_| DEFAULT_PLAN_MODEL.to_string());

        tracing::info!(
            model = %model,
            llm_configured = llm.is_some(),
            "Mitigation plan service initialized"
        );

        Self { llm, lookup, model }
    }

    /// Generate a structured mitigation plan for one CVE.
    pub async fn generate_plan(
        &self,
        request: &MitigationPlanRequest,
    ) -> Result<MitigationPlan, MitigationError> {
        let cve_id = request.cve_id.trim();

        if !CVE_ID_FORMAT.is_match(cve_id) {
            return Err(MitigationError::InvalidCveId(cve_id.to_string()));
        }

        let llm = self
            .llm
            .as_ref()
            .ok_or(MitigationError::MissingConfiguration)?;

        // The lookup is best-effort here: a failed lookup degrades to a
        // generic description rather than failing the plan.
        let description = match self.lookup.lookup(cve_id).await {
            Ok(record) => record.description,
            Err(e) => {
                tracing::warn!(cve = %cve_id, error = %e, "CVE lookup failed, generating plan without description");
                MISSING_DESCRIPTION.to_string()
            }
        };

        let prompt = build_plan_prompt(
            cve_id,
            &description,
            request.environment.as_deref(),
            request.affected_systems.as_deref(),
            request.constraints.as_deref(),
        );

        tracing::debug!(cve = %cve_id, model = %self.model, "Generating mitigation plan");

        let extractor = llm
            .gemini_client()
            .extractor::<MitigationPlan>(&self.model)
            .preamble(PLAN_SYSTEM_PROMPT)
            .build();

        let plan = extractor
            .extract(&prompt)
            .await
            .map_err(|e| MitigationError::GenerationFailed(e.to_string()))?;

        let validation = validate_plan(&plan);
        if !validation.is_valid {
            tracing::error!(
                cve = %cve_id,
                errors = ?validation.errors,
                "Generated plan failed validation"
            );
            return Err(MitigationError::InvalidPlan(validation.errors.join("; ")));
        }

        tracing::info!(cve = %cve_id, "Successfully generated mitigation plan");

        Ok(plan)
    }
}
