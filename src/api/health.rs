//! Health check endpoints for liveness and readiness probes

use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;
use utoipa::ToSchema;

/// Configuration state surfaced by the readiness probe.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DependencyHealth {
    /// Generative service key state: "configured" or "missing"
    pub generative: String,
    /// Vulnerability database key state: "configured" or "missing"
    pub vulnerability_db: String,
}

impl DependencyHealth {
    pub fn new(llm_configured: bool, nvd_configured: bool) -> Self {
        let state = |configured: bool| {
            if configured { "configured" } else { "missing" }.to_string()
        };

        Self {
            generative: state(llm_configured),
            vulnerability_db: state(nvd_configured),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadinessStatus {
    pub status: String,
    pub version: String,
    pub dependencies: DependencyHealth,
}

/// Liveness probe endpoint
///
/// Always returns 200 OK if the service is running.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive", body = HealthStatus)
    ),
    tag = "health"
)]
#[get("/health/live")]
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness probe endpoint
///
/// The pipeline degrades gracefully when external keys are missing, so this
/// always reports ready; the dependency block shows what is configured.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessStatus)
    ),
    tag = "health"
)]
#[get("/health/ready")]
pub async fn readiness(dependencies: web::Data<DependencyHealth>) -> impl Responder {
    HttpResponse::Ok().json(ReadinessStatus {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        dependencies: dependencies.get_ref().clone(),
    })
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(liveness).service(readiness);
}
