//! REST API endpoint for the threat report

use actix_web::{get, web, HttpResponse, Responder};

use crate::service::ThreatService;

/// Get the threat summary and full article list
#[utoipa::path(
    get,
    path = "/v1/threats",
    responses(
        (status = 200, description = "Threat summary and articles", body = crate::model::ThreatReport)
    ),
    tag = "threats"
)]
#[get("/v1/threats")]
pub async fn get_threats(service: web::Data<ThreatService>) -> impl Responder {
    let report = service.threat_report().await;
    HttpResponse::Ok().json(report)
}

/// Configure threat routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_threats);
}
