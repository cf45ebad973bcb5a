pub mod article;
pub mod config;
pub mod dashboard;
pub mod mitigation;
pub mod nvd;
pub mod severity;

pub use article::{Article, CveRecord};
pub use config::{Config, FeedConfig};
pub use dashboard::{
    CveSummary, DashboardSnapshot, DistributionEntry, ThreatCategory, ThreatItem, ThreatReport,
    ThreatSummary, TrendPoint,
};
pub use mitigation::{MitigationPlan, MitigationPlanRequest, SavePlanRequest, SavePlanResponse};
pub use severity::{Severity, SeverityHistogram};
