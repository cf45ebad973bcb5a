pub mod aggregate;
pub mod classify;
pub mod enrich;
pub mod extract;
pub mod llm;
pub mod mitigation;
pub mod nvd;
pub mod pipeline;
pub mod snapshot;
pub mod store;

pub use enrich::{EnrichmentService, GeminiAdvisor};
pub use llm::LlmClient;
pub use mitigation::MitigationService;
pub use nvd::NvdClient;
pub use pipeline::ThreatService;
pub use store::PlanStore;
