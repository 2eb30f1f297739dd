use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::contacts::handlers::{department_summaries, require_user, UserIdQuery};
use crate::errors::AppError;
use crate::models::contact::DepartmentGroupSummary;
use crate::personas::prompts::{ADHOC_PERSONA_PROMPT_TEMPLATE, PERSONA_SYSTEM};
use crate::personas::synthesizer::{suggest_personas, Persona};
use crate::state::AppState;

const ADHOC_PERSONA_TEMPERATURE: f32 = 0.7;
const TOP_DEPARTMENTS: usize = 5;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_contacts: i64,
    pub total_departments: usize,
    pub top_departments: Vec<DepartmentGroupSummary>,
    pub personas: Vec<Persona>,
}

/// GET /api/v1/dashboard
///
/// Personas are derived on every view from the persisted groups; they are
/// never stored, so the persona list always reflects the current contacts.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    require_user(&state, params.user_id).await?;

    let groups = department_summaries(&state, params.user_id).await?;
    let total_contacts: i64 = groups.iter().map(|g| g.contact_count).sum();
    let total_departments = groups.len();

    let rows: Vec<(String, Option<String>)> = sqlx::query_as(
        r#"
        SELECT g.name, c.job_title
        FROM contacts c
        JOIN department_groups g ON g.id = c.department_group_id
        WHERE c.user_id = $1
        ORDER BY c.created_at, c.id
        "#,
    )
    .bind(params.user_id)
    .fetch_all(&state.db)
    .await?;

    let mut department_titles: HashMap<String, Vec<String>> = HashMap::new();
    for (department, job_title) in rows {
        department_titles
            .entry(department)
            .or_default()
            .push(job_title.unwrap_or_default());
    }

    let personas = suggest_personas(&department_titles, &state.llm).await;

    Ok(Json(DashboardResponse {
        total_contacts,
        total_departments,
        top_departments: groups.into_iter().take(TOP_DEPARTMENTS).collect(),
        personas,
    }))
}

#[derive(Debug, Deserialize)]
pub struct GeneratePersonaRequest {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub company_size: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratePersonaResponse {
    pub persona: String,
}

/// POST /api/v1/personas/generate
///
/// Ad-hoc free-text persona for a single role. Unlike the pipeline call
/// sites, an upstream failure here is reported to the caller.
pub async fn handle_generate_persona(
    State(state): State<AppState>,
    Json(req): Json<GeneratePersonaRequest>,
) -> Result<Json<GeneratePersonaResponse>, AppError> {
    if req.role.trim().is_empty() {
        return Err(AppError::Validation("Role is required".to_string()));
    }

    let prompt = ADHOC_PERSONA_PROMPT_TEMPLATE
        .replace("{role}", req.role.trim())
        .replace("{industry}", req.industry.trim())
        .replace("{company_size}", req.company_size.trim());

    let response = state
        .llm
        .call(&prompt, PERSONA_SYSTEM, ADHOC_PERSONA_TEMPERATURE)
        .await
        .map_err(|e| AppError::Llm(format!("Persona generation failed: {e}")))?;

    let persona = response
        .text()
        .ok_or_else(|| AppError::Llm("Persona generation returned no text".to_string()))?
        .trim()
        .to_string();

    Ok(Json(GeneratePersonaResponse { persona }))
}
