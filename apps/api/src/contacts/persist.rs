//! Grouped contact persistence. Each department is written in its own
//! transaction; a failure skips that department and the loop continues, so
//! one bad department never aborts the whole upload.

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use tracing::{error, info};
use uuid::Uuid;

use crate::models::contact::{ContactRecord, DepartmentGroupRow};

/// What the grouped-insert loop actually wrote.
#[derive(Debug, Default)]
pub struct PersistOutcome {
    pub departments_written: usize,
    pub contacts_written: usize,
    pub departments_skipped: usize,
}

/// Persists grouped contacts for a user: one transaction per department,
/// department groups created lazily on first use. Database errors are
/// logged and the affected department is skipped.
pub async fn persist_grouped_contacts(
    pool: &PgPool,
    user_id: Uuid,
    groups: &HashMap<String, Vec<ContactRecord>>,
) -> PersistOutcome {
    let mut outcome = PersistOutcome::default();

    for (department, contacts) in groups {
        match persist_department(pool, user_id, department, contacts).await {
            Ok(written) => {
                outcome.departments_written += 1;
                outcome.contacts_written += written;
            }
            Err(e) => {
                error!("Failed to persist department {department:?} for user {user_id}: {e}");
                outcome.departments_skipped += 1;
            }
        }
    }

    outcome
}

async fn persist_department(
    pool: &PgPool,
    user_id: Uuid,
    department: &str,
    contacts: &[ContactRecord],
) -> Result<usize, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let group_id = get_or_create_group(&mut tx, user_id, department).await?;

    let mut written = 0;
    for contact in contacts {
        sqlx::query(
            r#"
            INSERT INTO contacts (id, email, job_title, persona, user_id, department_group_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&contact.email)
        .bind(&contact.job_title)
        .bind(&contact.persona)
        .bind(user_id)
        .bind(group_id)
        .execute(&mut *tx)
        .await?;
        written += 1;
    }

    tx.commit().await?;
    Ok(written)
}

/// Returns the group id for `(user_id, name)`, creating the group lazily on
/// first use. Groups are never merged or renamed here.
async fn get_or_create_group(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    name: &str,
) -> Result<Uuid, sqlx::Error> {
    let existing: Option<DepartmentGroupRow> =
        sqlx::query_as("SELECT * FROM department_groups WHERE user_id = $1 AND name = $2")
            .bind(user_id)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await?;

    if let Some(group) = existing {
        return Ok(group.id);
    }

    let group: DepartmentGroupRow = sqlx::query_as(
        "INSERT INTO department_groups (id, name, user_id) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;

    info!("Created department group {name:?} for user {user_id}");
    Ok(group.id)
}
