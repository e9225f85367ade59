use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::db::scoped::ScopedQuery;
use crate::app::domain::CompanyId;

/// Non-archived job position listing.
pub const ACTIVE: ScopedQuery = ScopedQuery {
    table: "job_position",
    columns: "id, name, is_archived",
    name_column: "name",
    status_where: "is_archived = 0",
};

/// Archived job position listing. Disjoint from `ACTIVE`.
pub const ARCHIVED: ScopedQuery = ScopedQuery {
    table: "job_position",
    columns: "id, name, is_archived",
    name_column: "name",
    status_where: "is_archived = 1",
};

/// Database row for job_position table.
#[derive(Debug, FromRow, serde::Serialize)]
pub struct JobPosition {
    pub id: i64,
    pub name: String,
    pub is_archived: i64,
}

/// Insert a new job position. Returns the new row id.
pub async fn insert<'e, E>(
    executor: E,
    company_id: CompanyId,
    name: &str,
) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "INSERT INTO job_position (company_id, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
    )
    .bind(company_id.as_i64())
    .bind(name)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Tenant-scoped single-row fetch.
pub async fn find_in_company<'e, E>(
    executor: E,
    job_position_id: i64,
    company_id: CompanyId,
) -> Result<Option<JobPosition>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, JobPosition>(
        "SELECT id, name, is_archived FROM job_position WHERE id = ? AND company_id = ?",
    )
    .bind(job_position_id)
    .bind(company_id.as_i64())
    .fetch_optional(executor)
    .await
}

/// Full replace of the name, tenant-scoped.
pub async fn update<'e, E>(
    executor: E,
    job_position_id: i64,
    company_id: CompanyId,
    name: &str,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "UPDATE job_position SET name = ?, updated_at = ? WHERE id = ? AND company_id = ?",
    )
    .bind(name)
    .bind(now)
    .bind(job_position_id)
    .bind(company_id.as_i64())
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Flip the archived flag.
pub async fn set_archived<'e, E>(
    executor: E,
    job_position_id: i64,
    company_id: CompanyId,
    archived: bool,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "UPDATE job_position SET is_archived = ?, updated_at = ? WHERE id = ? AND company_id = ?",
    )
    .bind(archived as i64)
    .bind(now)
    .bind(job_position_id)
    .bind(company_id.as_i64())
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Hard delete. Job positions have no soft-delete flag; this removes the
/// row.
pub async fn delete<'e, E>(
    executor: E,
    job_position_id: i64,
    company_id: CompanyId,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM job_position WHERE id = ? AND company_id = ?")
        .bind(job_position_id)
        .bind(company_id.as_i64())
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
