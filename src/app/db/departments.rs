use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::db::scoped::ScopedQuery;
use crate::app::domain::CompanyId;

const LIST_COLUMNS: &str = "id, name, admin_id, is_archived, \
    (SELECT full_name FROM employee WHERE employee.id = department.admin_id) AS admin_name";

/// Non-archived department listing.
pub const ACTIVE: ScopedQuery = ScopedQuery {
    table: "department",
    columns: LIST_COLUMNS,
    name_column: "name",
    status_where: "is_archived = 0",
};

/// Archived department listing. Disjoint from `ACTIVE`.
pub const ARCHIVED: ScopedQuery = ScopedQuery {
    table: "department",
    columns: LIST_COLUMNS,
    name_column: "name",
    status_where: "is_archived = 1",
};

/// Database row for department table, with the admin's name resolved.
#[derive(Debug, FromRow, serde::Serialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub admin_id: Option<i64>,
    pub is_archived: i64,
    pub admin_name: Option<String>,
}

/// Insert a new department. Returns the new row id.
pub async fn insert<'e, E>(
    executor: E,
    company_id: CompanyId,
    name: &str,
    admin_id: i64,
) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "INSERT INTO department (company_id, name, admin_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(company_id.as_i64())
    .bind(name)
    .bind(admin_id)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Tenant-scoped single-row fetch.
pub async fn find_in_company<'e, E>(
    executor: E,
    department_id: i64,
    company_id: CompanyId,
) -> Result<Option<Department>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Department>(&format!(
        "SELECT {LIST_COLUMNS} FROM department WHERE id = ? AND company_id = ?"
    ))
    .bind(department_id)
    .bind(company_id.as_i64())
    .fetch_optional(executor)
    .await
}

/// Full replace of name and admin, tenant-scoped.
pub async fn update<'e, E>(
    executor: E,
    department_id: i64,
    company_id: CompanyId,
    name: &str,
    admin_id: i64,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "UPDATE department SET name = ?, admin_id = ?, updated_at = ? WHERE id = ? AND company_id = ?",
    )
    .bind(name)
    .bind(admin_id)
    .bind(now)
    .bind(department_id)
    .bind(company_id.as_i64())
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Flip the archived flag.
pub async fn set_archived<'e, E>(
    executor: E,
    department_id: i64,
    company_id: CompanyId,
    archived: bool,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "UPDATE department SET is_archived = ?, updated_at = ? WHERE id = ? AND company_id = ?",
    )
    .bind(archived as i64)
    .bind(now)
    .bind(department_id)
    .bind(company_id.as_i64())
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Hard delete. Departments have no soft-delete flag; this removes the row.
pub async fn delete<'e, E>(
    executor: E,
    department_id: i64,
    company_id: CompanyId,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM department WHERE id = ? AND company_id = ?")
        .bind(department_id)
        .bind(company_id.as_i64())
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
