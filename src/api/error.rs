//! Unified API error handling
//!
//! This module provides a consistent error response format across all API
//! endpoints.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use uuid::Uuid;

use crate::service::mitigation::MitigationError;
use crate::service::store::StoreError;

/// Standard error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
///
/// All API endpoints should return `Result<T, ApiError>` for consistent
/// error handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// CVE id failed format validation (400)
    #[error("Valid CVE ID is required (e.g., CVE-YYYY-NNNN)")]
    InvalidCveId,

    /// Bad request / validation error (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Missing or invalid server configuration (500). The message is
    /// intentionally generic and never names the offending setting.
    #[error("A server configuration error occurred")]
    Configuration,

    /// The generative service failed at the transport level (502)
    #[error("AI service failed: {0}")]
    AiService(String),

    /// The generative service answered with an unusable plan (502)
    #[error("AI service returned an invalid plan format")]
    InvalidPlan,

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidCveId | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::AiService(_) | ApiError::InvalidPlan => StatusCode::BAD_GATEWAY,
            ApiError::Configuration | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = match self {
            ApiError::InvalidCveId => "invalid_cve_id",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Configuration => "configuration_error",
            ApiError::AiService(_) => "ai_service_error",
            ApiError::InvalidPlan => "invalid_plan",
            ApiError::Internal(_) => "internal_error",
        };

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

// ============================================================================
// From conversions for service errors
// ============================================================================

impl From<MitigationError> for ApiError {
    fn from(err: MitigationError) -> Self {
        match err {
            MitigationError::InvalidCveId(_) => ApiError::InvalidCveId,
            MitigationError::MissingConfiguration => ApiError::Configuration,
            MitigationError::GenerationFailed(msg) => ApiError::AiService(msg),
            MitigationError::InvalidPlan(_) => ApiError::InvalidPlan,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
