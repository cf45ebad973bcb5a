//! Prompts for mitigation plan generation

/// System prompt for mitigation plan generation
pub const PLAN_SYSTEM_PROMPT: &str = r#"You are a cybersecurity expert generating structured mitigation plans.

RULES:
1. Every step must be distinct, concrete, and actionable.
2. Focus on practical steps relevant to the CVE description and the provided context.
3. Immediate actions contain containment steps that can be taken right now.
4. Short-term remediation covers patches and hardening over the coming days.
5. Long-term solutions address the structural weakness.
6. Additional recommendations cover monitoring, detection, and awareness.
7. Do not invent facts about the vulnerability beyond the description given."#;

/// Build the prompt for generating a plan for one CVE
pub fn build_plan_prompt(
    cve_id: &str,
    description: &str,
    environment: Option<&str>,
    affected_systems: Option<&str>,
    constraints: Option<&str>,
) -> String {
    format!(
        r#"Generate a structured cybersecurity mitigation plan for the vulnerability identified as {}.

CVE Description:
"{}"

Provide the plan based on the following context (if specified):
- Target Environment: {}
- Specific Affected Systems/Assets: {}
- Operational Constraints or Considerations: {}"#,
        cve_id,
        description,
        environment.unwrap_or("General / Not specified"),
        affected_systems.unwrap_or("Not specified"),
        constraints.unwrap_or("None specified"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_includes_context_defaults() {
        let prompt = build_plan_prompt("CVE-2024-12345", "A test flaw.", None, None, None);
        assert!(prompt.contains("CVE-2024-12345"));
        assert!(prompt.contains("General / Not specified"));
        assert!(prompt.contains("None specified"));
    }

    #[test]
    fn prompt_includes_provided_context() {
        let prompt = build_plan_prompt(
            "CVE-2024-12345",
            "A test flaw.",
            Some("production cluster"),
            Some("edge routers"),
            Some("no downtime allowed"),
        );
        assert!(prompt.contains("production cluster"));
        assert!(prompt.contains("edge routers"));
        assert!(prompt.contains("no downtime allowed"));
    }
}
