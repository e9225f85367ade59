//! Authorization gate for ownership and destructive-action checks.
//!
//! Role-based row visibility lives in the queries themselves; what belongs
//! here are the checks that sit in front of a mutation.

use sqlx::SqlitePool;

use crate::app::db;
use crate::app::domain::{CompanyId, HashedPassword, Password, UserId};
use crate::app::error::AppError;

/// Is the caller the owner of the (non-deleted) company? Company update and
/// delete are owner-only.
pub async fn is_company_owner(
    pool: &SqlitePool,
    company_id: CompanyId,
    user_id: UserId,
) -> Result<bool, AppError> {
    Ok(db::companies::is_owner(pool, company_id, user_id).await?)
}

/// Verify the caller's own password against the stored hash, immediately
/// before a destructive action. This is a per-request check; there is no
/// "recently confirmed" window.
pub async fn confirm_password(
    pool: &SqlitePool,
    user_id: UserId,
    plaintext: &str,
) -> Result<bool, AppError> {
    let user = match db::users::find_by_id(pool, user_id).await? {
        Some(user) => user,
        None => return Ok(false),
    };
    let stored = HashedPassword::from_string(user.password_hash);
    let candidate = Password::for_verification(plaintext.to_string());
    Ok(stored.verify(&candidate).is_ok())
}
