use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::app::{db, domain::UserId, error::AppError, AppState};

pub fn session_cookie(session_id: impl Into<String>) -> Cookie<'static> {
    Cookie::build(("session_id", session_id.into()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(("session_id", ""))
        .path("/")
        .removal()
        .into()
}

/// Extractor for the authenticated caller. Everything below the HTTP layer
/// receives this user id; credentials never travel further down.
pub struct AuthenticatedUser(pub UserId);

#[async_trait::async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session_id = jar
            .get("session_id")
            .map(|c| c.value().to_string())
            .ok_or(AppError::Unauthenticated)?;

        let session = db::sessions::find_valid(&state.db, &session_id)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        Ok(Self(UserId::new(session.user_id)))
    }
}
