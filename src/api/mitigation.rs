//! REST API endpoints for mitigation plans

use actix_web::{post, web, HttpResponse};
use chrono::Utc;

use super::error::ApiError;
use crate::model::mitigation::{MitigationPlanRequest, SavePlanRequest, SavePlanResponse};
use crate::service::{MitigationService, PlanStore};

/// Generate a mitigation plan for one CVE
///
/// The CVE id is validated before any external call; a malformed id never
/// reaches the vulnerability database or the generative service.
#[utoipa::path(
    post,
    path = "/v1/mitigation",
    request_body = MitigationPlanRequest,
    responses(
        (status = 200, description = "Generated mitigation plan", body = crate::model::MitigationPlan),
        (status = 400, description = "Invalid CVE id"),
        (status = 500, description = "Server configuration error"),
        (status = 502, description = "Generative service failure or invalid plan")
    ),
    tag = "mitigation"
)]
#[post("/v1/mitigation")]
pub async fn generate_mitigation_plan(
    service: web::Data<MitigationService>,
    request: web::Json<MitigationPlanRequest>,
) -> Result<HttpResponse, ApiError> {
    let plan = service.generate_plan(&request).await?;
    Ok(HttpResponse::Ok().json(plan))
}

/// Persist a generated mitigation plan
///
/// Writes one JSON file per (CVE id, date) pair under the data directory.
#[utoipa::path(
    post,
    path = "/v1/mitigation/save",
    request_body = SavePlanRequest,
    responses(
        (status = 200, description = "Plan saved", body = SavePlanResponse),
        (status = 400, description = "Missing CVE id"),
        (status = 500, description = "Write failure")
    ),
    tag = "mitigation"
)]
#[post("/v1/mitigation/save")]
pub async fn save_mitigation_plan(
    store: web::Data<PlanStore>,
    request: web::Json<SavePlanRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();

    if request.cve_id.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "CVE ID and mitigation plan are required".to_string(),
        ));
    }

    let file_name = store
        .save_plan(
            request.cve_id.trim(),
            &request.mitigation_plan,
            Utc::now().date_naive(),
        )
        .await?;

    Ok(HttpResponse::Ok().json(SavePlanResponse {
        success: true,
        message: "Mitigation plan saved successfully".to_string(),
        file_name,
    }))
}

/// Configure mitigation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(generate_mitigation_plan)
        .service(save_mitigation_plan);
}
