use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Idempotent startup migrations. The trailing ALTER keeps the ad hoc
/// "add column if missing" shape used to retrofit the group link onto
/// pre-existing contact tables.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id          UUID PRIMARY KEY,
        email       TEXT NOT NULL UNIQUE,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS department_groups (
        id          UUID PRIMARY KEY,
        name        TEXT NOT NULL,
        description TEXT,
        user_id     UUID NOT NULL REFERENCES users(id),
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (user_id, name)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS contacts (
        id          UUID PRIMARY KEY,
        email       TEXT NOT NULL,
        job_title   TEXT,
        persona     TEXT,
        user_id     UUID NOT NULL REFERENCES users(id),
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_contacts_user ON contacts(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_department_groups_user ON department_groups(user_id)",
    r#"
    ALTER TABLE contacts
        ADD COLUMN IF NOT EXISTS department_group_id UUID REFERENCES department_groups(id)
    "#,
];

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database migrations complete");
    Ok(())
}
