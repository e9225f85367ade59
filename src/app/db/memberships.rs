use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{CompanyId, CompanyRole, UserId};

/// Database row for company_user table.
#[derive(Debug, FromRow)]
pub struct Membership {
    pub company_id: i64,
    pub user_id: i64,
    pub role: String,
    pub active: i64,
    pub created_at: i64,
}

/// Find the caller's single active company, if any.
pub async fn find_active_company<'e, E>(
    executor: E,
    user_id: UserId,
) -> Result<Option<CompanyId>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let row: Option<i64> = sqlx::query_scalar(
        "SELECT company_id FROM company_user WHERE user_id = ? AND active = 1 LIMIT 1",
    )
    .bind(user_id.as_i64())
    .fetch_optional(executor)
    .await?;

    Ok(row.map(CompanyId::new))
}

/// Find a member's role in a company. Returns None if not a member.
pub async fn find_role<'e, E>(
    executor: E,
    company_id: CompanyId,
    user_id: UserId,
) -> Result<Option<CompanyRole>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let row: Option<String> = sqlx::query_scalar(
        "SELECT role FROM company_user WHERE company_id = ? AND user_id = ?",
    )
    .bind(company_id.as_i64())
    .bind(user_id.as_i64())
    .fetch_optional(executor)
    .await?;

    Ok(row.and_then(|r| r.parse::<CompanyRole>().ok()))
}

/// Insert a membership row, inactive by default.
pub async fn insert<'e, E>(
    executor: E,
    company_id: CompanyId,
    user_id: UserId,
    role: CompanyRole,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO company_user (company_id, user_id, role, active, created_at) VALUES (?, ?, ?, 0, ?)",
    )
    .bind(company_id.as_i64())
    .bind(user_id.as_i64())
    .bind(role.to_string())
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Ensure a membership row exists, leaving an existing row untouched.
/// Invite acceptance uses this so accepting can never duplicate a membership
/// or change a role the user already holds.
pub async fn ensure<'e, E>(
    executor: E,
    company_id: CompanyId,
    user_id: UserId,
    role: CompanyRole,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO company_user (company_id, user_id, role, active, created_at) VALUES (?, ?, ?, 0, ?) \
         ON CONFLICT(company_id, user_id) DO NOTHING",
    )
    .bind(company_id.as_i64())
    .bind(user_id.as_i64())
    .bind(role.to_string())
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Insert a membership row or update the role of an existing one. Employee
/// linking supplies the role explicitly, so it wins over a stale one.
pub async fn upsert_role<'e, E>(
    executor: E,
    company_id: CompanyId,
    user_id: UserId,
    role: CompanyRole,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    sqlx::query(
        "INSERT INTO company_user (company_id, user_id, role, active, created_at) VALUES (?, ?, ?, 0, ?) \
         ON CONFLICT(company_id, user_id) DO UPDATE SET role = excluded.role",
    )
    .bind(company_id.as_i64())
    .bind(user_id.as_i64())
    .bind(role.to_string())
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}

/// Deactivate every membership the user holds. First half of the activate
/// transaction; also keeps the partial unique index on (user_id, active=1)
/// satisfied before the target row is flipped on.
pub async fn deactivate_all_for_user<'e, E>(
    executor: E,
    user_id: UserId,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("UPDATE company_user SET active = 0 WHERE user_id = ?")
        .bind(user_id.as_i64())
        .execute(executor)
        .await?;
    Ok(())
}

/// Activate the (user, company) membership. Returns the number of rows
/// updated; zero means the membership does not exist and activation failed.
pub async fn activate<'e, E>(
    executor: E,
    company_id: CompanyId,
    user_id: UserId,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE company_user SET active = 1 WHERE user_id = ? AND company_id = ?",
    )
    .bind(user_id.as_i64())
    .bind(company_id.as_i64())
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Deactivate every membership of a company. Runs when the company is
/// soft-deleted so nobody keeps a deleted tenant as their active one.
pub async fn deactivate_all_for_company<'e, E>(
    executor: E,
    company_id: CompanyId,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query("UPDATE company_user SET active = 0 WHERE company_id = ?")
        .bind(company_id.as_i64())
        .execute(executor)
        .await?;
    Ok(())
}

/// Count a user's active memberships. Test/diagnostic helper for the
/// single-active invariant.
pub async fn count_active_for_user<'e, E>(
    executor: E,
    user_id: UserId,
) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar("SELECT count(*) FROM company_user WHERE user_id = ? AND active = 1")
        .bind(user_id.as_i64())
        .fetch_one(executor)
        .await
}
