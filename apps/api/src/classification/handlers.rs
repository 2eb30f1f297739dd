use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::classification::single::classify_title;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub job_title: String,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub job_title: String,
    pub department: String,
}

/// POST /api/v1/classify
///
/// Single-title classification: keyword table, then cache, then one LLM
/// call. Upstream failures resolve to "other" rather than erroring.
pub async fn handle_classify_title(
    State(state): State<AppState>,
    Json(req): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, AppError> {
    if req.job_title.trim().is_empty() {
        return Err(AppError::Validation("job_title is required".to_string()));
    }

    let department = classify_title(&req.job_title, &state.llm, &state.title_cache).await;

    Ok(Json(ClassifyResponse {
        job_title: req.job_title,
        department,
    }))
}
