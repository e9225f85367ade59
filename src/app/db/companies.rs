use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{CompanyId, UserId};

/// Database row for company table.
#[derive(Debug, FromRow)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub owner_user_id: i64,
    pub is_deleted: i64,
    pub created_at: i64,
}

/// Company joined with the caller's membership, for the picker list.
#[derive(Debug, FromRow, serde::Serialize)]
pub struct CompanyForUser {
    pub company_id: i64,
    pub company_name: String,
    pub company_active: i64,
    pub company_role: String,
    pub is_owner: i64,
}

/// Member of a company joined with user identity, for the users listing.
#[derive(Debug, FromRow, serde::Serialize)]
pub struct CompanyMember {
    pub user_id: i64,
    pub user_name: String,
    pub user_email: String,
    pub user_role: String,
}

/// Insert a new company. Returns the new row id.
pub async fn insert<'e, E>(
    executor: E,
    name: &str,
    description: Option<&str>,
    owner: UserId,
) -> Result<CompanyId, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "INSERT INTO company (name, description, owner_user_id, is_deleted, created_at, updated_at) VALUES (?, ?, ?, 0, ?, ?)",
    )
    .bind(name)
    .bind(description)
    .bind(owner.as_i64())
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(CompanyId::new(result.last_insert_rowid()))
}

/// List the non-deleted companies the user is a member of, with their
/// membership state and ownership flag.
pub async fn list_for_user<'e, E>(
    executor: E,
    user_id: UserId,
) -> Result<Vec<CompanyForUser>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, CompanyForUser>(
        "SELECT company.id AS company_id, \
                company.name AS company_name, \
                company_user.active AS company_active, \
                company_user.role AS company_role, \
                CASE WHEN company.owner_user_id = ? THEN 1 ELSE 0 END AS is_owner \
         FROM company \
         JOIN company_user ON company_user.company_id = company.id \
         WHERE company_user.user_id = ? AND company.is_deleted = 0 \
         ORDER BY company.name COLLATE NOCASE, company.id",
    )
    .bind(user_id.as_i64())
    .bind(user_id.as_i64())
    .fetch_all(executor)
    .await
}

/// Fetch a company the user is a member of. A missing company and a company
/// the user does not belong to look the same to the caller.
pub async fn find_for_member<'e, E>(
    executor: E,
    company_id: CompanyId,
    user_id: UserId,
) -> Result<Option<Company>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Company>(
        "SELECT company.id, company.name, company.description, company.owner_user_id, \
                company.is_deleted, company.created_at \
         FROM company \
         JOIN company_user ON company_user.company_id = company.id \
         WHERE company.id = ? AND company_user.user_id = ? AND company.is_deleted = 0",
    )
    .bind(company_id.as_i64())
    .bind(user_id.as_i64())
    .fetch_optional(executor)
    .await
}

/// Check that the user owns the (non-deleted) company.
pub async fn is_owner<'e, E>(
    executor: E,
    company_id: CompanyId,
    user_id: UserId,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM company WHERE id = ? AND owner_user_id = ? AND is_deleted = 0",
    )
    .bind(company_id.as_i64())
    .bind(user_id.as_i64())
    .fetch_one(executor)
    .await?;
    Ok(count > 0)
}

/// Update name and description. Owner check happens before this call; the
/// predicate is repeated here so the write can never outrun the check.
pub async fn update<'e, E>(
    executor: E,
    company_id: CompanyId,
    owner: UserId,
    name: &str,
    description: Option<&str>,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "UPDATE company SET name = ?, description = ?, updated_at = ? WHERE id = ? AND owner_user_id = ?",
    )
    .bind(name)
    .bind(description)
    .bind(now)
    .bind(company_id.as_i64())
    .bind(owner.as_i64())
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Soft-delete a company. Physical rows stay; memberships are deactivated by
/// the caller in the same transaction.
pub async fn soft_delete<'e, E>(
    executor: E,
    company_id: CompanyId,
    owner: UserId,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "UPDATE company SET is_deleted = 1, updated_at = ? WHERE id = ? AND owner_user_id = ?",
    )
    .bind(now)
    .bind(company_id.as_i64())
    .bind(owner.as_i64())
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// All members of a company, manager first, then hr, then the rest, then
/// name. Used when the caller's role allows seeing everyone.
pub async fn list_members<'e, E>(
    executor: E,
    company_id: CompanyId,
) -> Result<Vec<CompanyMember>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, CompanyMember>(
        "SELECT users.id AS user_id, users.name AS user_name, users.email AS user_email, \
                company_user.role AS user_role \
         FROM company_user \
         JOIN users ON users.id = company_user.user_id \
         WHERE company_user.company_id = ? \
         ORDER BY CASE \
             WHEN company_user.role = 'manager' THEN 1 \
             WHEN company_user.role = 'hr' THEN 2 \
             ELSE 3 END, \
             users.name COLLATE NOCASE, users.id",
    )
    .bind(company_id.as_i64())
    .fetch_all(executor)
    .await
}

/// Just the caller's own membership row, for members without full
/// visibility.
pub async fn list_member_self<'e, E>(
    executor: E,
    company_id: CompanyId,
    user_id: UserId,
) -> Result<Vec<CompanyMember>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, CompanyMember>(
        "SELECT users.id AS user_id, users.name AS user_name, users.email AS user_email, \
                company_user.role AS user_role \
         FROM company_user \
         JOIN users ON users.id = company_user.user_id \
         WHERE company_user.company_id = ? AND company_user.user_id = ?",
    )
    .bind(company_id.as_i64())
    .bind(user_id.as_i64())
    .fetch_all(executor)
    .await
}
