//! REST API endpoint for the dashboard snapshot

use actix_web::{get, web, HttpResponse, Responder};

use crate::service::ThreatService;

/// Get the current dashboard snapshot
///
/// Served from the in-memory cache while fresh; a stale cache triggers a
/// full pipeline run behind the single-flight gate.
#[utoipa::path(
    get,
    path = "/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard snapshot", body = crate::model::DashboardSnapshot)
    ),
    tag = "dashboard"
)]
#[get("/v1/dashboard")]
pub async fn get_dashboard(service: web::Data<ThreatService>) -> impl Responder {
    let snapshot = service.dashboard_snapshot().await;
    HttpResponse::Ok().json(snapshot)
}

/// Configure dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_dashboard);
}
