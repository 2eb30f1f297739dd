use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::classification::grouper::group_contacts;
use crate::contacts::ingest::{classify_new_titles, parse_contacts_csv};
use crate::contacts::persist::persist_grouped_contacts;
use crate::errors::AppError;
use crate::models::contact::{ContactRow, DepartmentGroupSummary};
use crate::models::user::User;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub total_contacts: usize,
    pub total_departments: usize,
    pub ungrouped_count: usize,
}

/// POST /api/v1/contacts/upload
///
/// Multipart CSV upload. Validation failures (no file, wrong extension,
/// missing columns) abort before any classification or write; a
/// completion-API outage still completes the upload with the affected
/// titles grouped under "other" and a caveat in the message.
pub async fn handle_upload_contacts(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    require_user(&state, params.user_id).await?;

    let mut csv_data: Option<String> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(AppError::Validation("No file selected".to_string()));
        }
        if !filename.to_lowercase().ends_with(".csv") {
            return Err(AppError::Validation("Please upload a CSV file".to_string()));
        }
        let data = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read uploaded file: {e}")))?;
        csv_data = Some(data);
    }

    let csv_data = csv_data.ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;
    let records = parse_contacts_csv(&csv_data)?;

    classify_new_titles(&records, &state.title_cache, state.batch_classifier.as_ref()).await;
    debug!("Title cache holds {} entries", state.title_cache.len());

    let grouped = group_contacts(records, &state.title_cache);
    let total_contacts = grouped.total_contacts();
    let total_departments = grouped.groups.len();
    let ungrouped_count = grouped.ungrouped_titles.len();

    let outcome = persist_grouped_contacts(&state.db, params.user_id, &grouped.groups).await;
    info!(
        "Upload for user {}: {} contacts persisted across {} departments, {} departments skipped",
        params.user_id, outcome.contacts_written, outcome.departments_written, outcome.departments_skipped
    );

    let mut message = format!(
        "Successfully uploaded {total_contacts} contacts and grouped them into {total_departments} departments."
    );
    if ungrouped_count > 0 {
        message.push_str(&format!(
            " {ungrouped_count} job titles could not be grouped automatically."
        ));
    }

    Ok(Json(UploadResponse {
        message,
        total_contacts,
        total_departments,
        ungrouped_count,
    }))
}

/// GET /api/v1/contacts
pub async fn handle_list_contacts(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ContactRow>>, AppError> {
    let contacts = sqlx::query_as::<_, ContactRow>(
        "SELECT * FROM contacts WHERE user_id = $1 ORDER BY created_at, id",
    )
    .bind(params.user_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(contacts))
}

/// GET /api/v1/groups
pub async fn handle_list_groups(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<DepartmentGroupSummary>>, AppError> {
    let groups = department_summaries(&state, params.user_id).await?;
    Ok(Json(groups))
}

/// Department groups with contact counts, largest first.
pub(crate) async fn department_summaries(
    state: &AppState,
    user_id: Uuid,
) -> Result<Vec<DepartmentGroupSummary>, AppError> {
    Ok(sqlx::query_as::<_, DepartmentGroupSummary>(
        r#"
        SELECT g.id, g.name, COUNT(c.id) AS contact_count
        FROM department_groups g
        LEFT JOIN contacts c ON c.department_group_id = g.id
        WHERE g.user_id = $1
        GROUP BY g.id, g.name
        ORDER BY contact_count DESC, g.name
        "#,
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?)
}

pub(crate) async fn require_user(state: &AppState, user_id: Uuid) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}
