use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{CompanyId, InviteStatus, UserId};

/// Database row for user_invites table.
#[derive(Debug, FromRow)]
pub struct UserInvite {
    pub id: i64,
    pub source_user_id: i64,
    pub target_user_id: i64,
    pub company_id: i64,
    pub status: i64,
    pub created_at: i64,
}

/// Invite joined with user and company names, for the inbox listing.
#[derive(Debug, FromRow, serde::Serialize)]
pub struct UserInviteView {
    pub id: i64,
    pub source_user_id: i64,
    pub target_user_id: i64,
    pub company_id: i64,
    pub status: i64,
    pub created_at: i64,
    pub source_name: String,
    pub target_name: String,
    pub source_email: String,
    pub target_email: String,
    pub company_name: String,
}

/// Bulk-insert pending invites. The caller has already filtered out
/// self-invites; an empty list is its problem, not ours.
pub async fn insert_pending<'e, E>(
    executor: E,
    source: UserId,
    targets: &[i64],
    company_id: CompanyId,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let placeholders = vec!["(?, ?, ?, ?, ?)"; targets.len()].join(", ");
    let sql = format!(
        "INSERT INTO user_invites (source_user_id, target_user_id, company_id, status, created_at) VALUES {placeholders}"
    );
    let mut query = sqlx::query(&sql);
    for target in targets {
        query = query
            .bind(source.as_i64())
            .bind(target)
            .bind(company_id.as_i64())
            .bind(InviteStatus::Pending.as_i64())
            .bind(now);
    }
    query.execute(executor).await?;
    Ok(())
}

/// Find a pending invite addressed to this user. Guard for accept/reject.
pub async fn find_pending_for_target<'e, E>(
    executor: E,
    invite_id: i64,
    target: UserId,
) -> Result<Option<UserInvite>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, UserInvite>(
        "SELECT * FROM user_invites WHERE id = ? AND target_user_id = ? AND status = ?",
    )
    .bind(invite_id)
    .bind(target.as_i64())
    .bind(InviteStatus::Pending.as_i64())
    .fetch_optional(executor)
    .await
}

/// Find an invite this user participates in (either side), any status.
pub async fn find_for_participant<'e, E>(
    executor: E,
    invite_id: i64,
    user_id: UserId,
) -> Result<Option<UserInvite>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, UserInvite>(
        "SELECT * FROM user_invites WHERE id = ? AND (source_user_id = ? OR target_user_id = ?)",
    )
    .bind(invite_id)
    .bind(user_id.as_i64())
    .bind(user_id.as_i64())
    .fetch_optional(executor)
    .await
}

/// Set an invite's status.
pub async fn set_status<'e, E>(
    executor: E,
    invite_id: i64,
    status: InviteStatus,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("UPDATE user_invites SET status = ? WHERE id = ?")
        .bind(status.as_i64())
        .bind(invite_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Hard-delete an invite.
pub async fn delete<'e, E>(executor: E, invite_id: i64) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM user_invites WHERE id = ?")
        .bind(invite_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Invites the user sent or received, newest first, with names resolved.
pub async fn list_for_user<'e, E>(
    executor: E,
    user_id: UserId,
) -> Result<Vec<UserInviteView>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, UserInviteView>(
        "SELECT i.id, i.source_user_id, i.target_user_id, i.company_id, i.status, i.created_at, \
                s.name AS source_name, t.name AS target_name, \
                s.email AS source_email, t.email AS target_email, \
                c.name AS company_name \
         FROM user_invites i \
         JOIN users s ON i.source_user_id = s.id \
         JOIN users t ON i.target_user_id = t.id \
         JOIN company c ON i.company_id = c.id \
         WHERE i.source_user_id = ? OR i.target_user_id = ? \
         ORDER BY i.created_at DESC, i.id DESC",
    )
    .bind(user_id.as_i64())
    .bind(user_id.as_i64())
    .fetch_all(executor)
    .await
}

/// Does the user already have a pending invite to this company?
pub async fn has_pending_for_company<'e, E>(
    executor: E,
    user_id: UserId,
    company_id: CompanyId,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM user_invites WHERE target_user_id = ? AND company_id = ? AND status = ?",
    )
    .bind(user_id.as_i64())
    .bind(company_id.as_i64())
    .bind(InviteStatus::Pending.as_i64())
    .fetch_one(executor)
    .await?;
    Ok(count > 0)
}

/// Does the user have any pending invites at all? Drives the inbox badge.
pub async fn has_any_pending<'e, E>(executor: E, user_id: UserId) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM user_invites WHERE target_user_id = ? AND status = ?",
    )
    .bind(user_id.as_i64())
    .bind(InviteStatus::Pending.as_i64())
    .fetch_one(executor)
    .await?;
    Ok(count > 0)
}
