use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::domain::{HashedPassword, UserId};

/// Database row for users table.
#[derive(Debug, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub theme: i64,
    pub user_lang: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Data structure for inserting a new user.
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: HashedPassword,
}

/// Theme and language preferences, as stored.
#[derive(Debug, FromRow, serde::Serialize)]
pub struct UserPreferences {
    pub theme: i64,
    pub user_lang: String,
}

/// Lightweight user hit for invite typeahead.
#[derive(Debug, FromRow, serde::Serialize)]
pub struct UserHit {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Find a user by ID.
pub async fn find_by_id<'e, E>(executor: E, user_id: UserId) -> Result<Option<User>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id.as_i64())
        .fetch_optional(executor)
        .await
}

/// Find a user by exact email address.
pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<User>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(executor)
        .await
}

/// Substring email search for the invite picker. Capped at five hits.
pub async fn search_by_email<'e, E>(
    executor: E,
    query: &str,
) -> Result<Vec<UserHit>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let like = format!("%{}%", query.trim());
    sqlx::query_as::<_, UserHit>(
        "SELECT id, name, email FROM users WHERE email LIKE ? ORDER BY email, id LIMIT 5",
    )
    .bind(like)
    .fetch_all(executor)
    .await
}

/// Insert a new user. Returns the new row id.
pub async fn insert<'e, E>(executor: E, user: &NewUser) -> Result<UserId, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "INSERT INTO users (name, email, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&user.name)
    .bind(&user.email)
    .bind(user.password_hash.as_str())
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(UserId::new(result.last_insert_rowid()))
}

/// Fetch theme and language preferences.
pub async fn get_preferences<'e, E>(
    executor: E,
    user_id: UserId,
) -> Result<Option<UserPreferences>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, UserPreferences>("SELECT theme, user_lang FROM users WHERE id = ?")
        .bind(user_id.as_i64())
        .fetch_optional(executor)
        .await
}

/// Update theme and language preferences. Returns the rows-updated count.
pub async fn update_preferences<'e, E>(
    executor: E,
    user_id: UserId,
    theme: i64,
    user_lang: &str,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query("UPDATE users SET theme = ?, user_lang = ?, updated_at = ? WHERE id = ?")
        .bind(theme)
        .bind(user_lang)
        .bind(now)
        .bind(user_id.as_i64())
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
