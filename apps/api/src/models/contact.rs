use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A contact row. Belongs to exactly one user and at most one department
/// group.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactRow {
    pub id: Uuid,
    pub email: String,
    pub job_title: Option<String>,
    pub persona: Option<String>,
    pub user_id: Uuid,
    pub department_group_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A department group row. Created lazily on the first contact assigned to
/// it; never merged or renamed automatically.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DepartmentGroupRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A department group with its contact count, for the groups listing and
/// the dashboard's top-departments view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DepartmentGroupSummary {
    pub id: Uuid,
    pub name: String,
    pub contact_count: i64,
}

/// One parsed row of an uploaded contacts CSV. Ephemeral: rows only become
/// `ContactRow`s once grouped and persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub email: String,
    pub job_title: String,
    pub persona: String,
}
