//! Validation of generated mitigation plans
//!
//! The extractor guarantees the four-key shape; this checks that each
//! section actually carries usable steps.

use crate::model::mitigation::MitigationPlan;

/// Result of mitigation plan validation
#[derive(Debug)]
pub struct PlanValidationResult {
    /// Whether the plan passed validation
    pub is_valid: bool,
    /// Violations that make the plan unusable
    pub errors: Vec<String>,
}

impl PlanValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }
}

/// Validate a generated plan: every section must be a non-empty array of
/// non-blank steps.
pub fn validate_plan(plan: &MitigationPlan) -> PlanValidationResult {
    let mut result = PlanValidationResult::valid();

    let sections: [(&str, &[String]); 4] = [
        ("immediateActions", &plan.immediate_actions),
        ("shortTermRemediation", &plan.short_term_remediation),
        ("longTermSolutions", &plan.long_term_solutions),
        ("additionalRecommendations", &plan.additional_recommendations),
    ];

    for (name, steps) in sections {
        if steps.is_empty() {
            result.add_error(format!("Section '{}' contains no steps", name));
            continue;
        }

        for (i, step) in steps.iter().enumerate() {
            if step.trim().is_empty() {
                result.add_error(format!("Section '{}' step {} is blank", name, i + 1));
            }
        }
    }

    result
}
