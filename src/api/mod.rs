//! REST API surface

pub mod dashboard;
pub mod error;
pub mod health;
pub mod mitigation;
pub mod openapi;
pub mod threats;

use utoipa::OpenApi;

pub use error::ApiError;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "threatfeed-intel",
        description = "Threat feed aggregation and CVE intelligence dashboard API"
    ),
    paths(
        dashboard::get_dashboard,
        threats::get_threats,
        mitigation::generate_mitigation_plan,
        mitigation::save_mitigation_plan,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        crate::model::Article,
        crate::model::CveRecord,
        crate::model::CveSummary,
        crate::model::DashboardSnapshot,
        crate::model::DistributionEntry,
        crate::model::MitigationPlan,
        crate::model::MitigationPlanRequest,
        crate::model::SavePlanRequest,
        crate::model::SavePlanResponse,
        crate::model::Severity,
        crate::model::SeverityHistogram,
        crate::model::ThreatItem,
        crate::model::ThreatReport,
        crate::model::ThreatSummary,
        crate::model::TrendPoint,
    )),
    tags(
        (name = "dashboard", description = "Aggregated dashboard statistics"),
        (name = "threats", description = "Threat summary and article list"),
        (name = "mitigation", description = "Mitigation plan generation and persistence"),
        (name = "health", description = "Liveness and readiness probes"),
    )
)]
pub struct ApiDoc;
