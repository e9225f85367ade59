use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::app::{
    db,
    domain::{HashedPassword, Password, UserId},
    envelope::Envelope,
    error::AppError,
    session,
    AppState,
};

/// Request body for POST /api/login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub user_id: UserId,
}

/// POST /api/login: verify credentials, start a session, set the cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = match db::users::find_by_email(&state.db, request.email.trim()).await? {
        Some(user) => user,
        None => {
            return Ok((jar, Json(Envelope::<LoginData>::fail("Invalid email or password"))));
        }
    };

    let stored = HashedPassword::from_string(user.password_hash.clone());
    let candidate = Password::for_verification(request.password);
    if stored.verify(&candidate).is_err() {
        return Ok((jar, Json(Envelope::fail("Invalid email or password"))));
    }

    let user_id = UserId::new(user.id);
    let expires_at = OffsetDateTime::now_utc() + Duration::days(30);
    let session_id = db::sessions::create(&state.db, user_id, expires_at).await?;

    let jar = jar.add(session::session_cookie(session_id));
    Ok((jar, Json(Envelope::ok(LoginData { user_id }))))
}

/// POST /api/logout: drop the session and clear the cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    if let Some(cookie) = jar.get("session_id") {
        db::sessions::delete(&state.db, cookie.value()).await?;
    }
    let jar = jar.add(session::clear_session_cookie());
    Ok((jar, Json(Envelope::<()>::ok_empty())))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
}
