use super::error::ApiError;
use crate::application::analysis::AnalysisRequest;
use crate::application::ml::ModelSource;
use crate::application::system::ServiceContext;
use crate::domain::health::result::RiskResult;
use crate::domain::types::{Reading, ReadingSource};
use axum::{Json, body::Bytes, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
struct AnalyzeBody {
    #[serde(default)]
    age: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: RiskResult,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model_source: ModelSource,
    pub reading_source: Option<ReadingSource>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// `GET /data`: latest reading snapshot.
pub async fn get_data(State(context): State<ServiceContext>) -> Json<Reading> {
    Json(context.store.snapshot().await)
}

/// `POST /analyze`: score the latest reading. The body is optional and may
/// carry `{"age": int}`.
pub async fn analyze(
    State(context): State<ServiceContext>,
    body: Bytes,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let reading = context.store.snapshot().await;
    let age = parse_age(&body).map_err(|reason| ApiError::InvalidBody { reason, reading })?;

    let analysis = context
        .analyzer
        .analyze(&AnalysisRequest::new(reading, age));

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis,
    }))
}

/// `GET /health`: liveness plus model and acquisition provenance.
pub async fn health(State(context): State<ServiceContext>) -> Json<HealthResponse> {
    let stored = context.store.status().await;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        model_source: context.model_source,
        reading_source: stored.source,
        last_updated: stored.updated_at,
    })
}

/// Empty body or JSON `null` means no age was provided.
fn parse_age(body: &[u8]) -> Result<Option<i32>, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let parsed: Option<AnalyzeBody> = serde_json::from_slice(body).map_err(|e| e.to_string())?;
    Ok(parsed.and_then(|b| b.age))
}
