//! Error handling for the HTTP API.

use crate::domain::health::result::{REQUEST_FAILURE_MESSAGE, RiskResult};
use crate::domain::types::Reading;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The `/analyze` body could not be understood. Carries the snapshot so
    /// the response still includes a RiskResult-shaped analysis.
    #[error("Invalid request body: {reason}")]
    InvalidBody { reason: String, reading: Reading },
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub analysis: RiskResult,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.to_string();
        let (status, analysis) = match &self {
            ApiError::InvalidBody { reading, .. } => {
                tracing::error!("Error in health analysis: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    RiskResult::degraded(reading, REQUEST_FAILURE_MESSAGE),
                )
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            error,
            analysis,
        });
        (status, body).into_response()
    }
}
