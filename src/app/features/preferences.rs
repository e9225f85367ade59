use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use validator::Validate;

use crate::app::{
    db,
    envelope::Envelope,
    error::AppError,
    session::AuthenticatedUser,
    AppState,
};

/// Request body for PUT /api/preferences.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePreferencesRequest {
    #[validate(range(min = 0, max = 1, message = "Theme must be 0 or 1"))]
    pub theme: i64,
    #[validate(length(equal = 2, message = "Language must be a 2-letter code"))]
    pub user_lang: String,
}

/// GET /api/preferences: the caller's theme and language.
pub async fn get_preferences(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<Envelope<db::users::UserPreferences>>, AppError> {
    let preferences = db::users::get_preferences(&state.db, user_id)
        .await?
        .ok_or(AppError::Internal)?;
    Ok(Json(Envelope::ok(preferences)))
}

/// PUT /api/preferences: update theme and language.
pub async fn update_preferences(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<UpdatePreferencesRequest>,
) -> Result<Json<Envelope<()>>, AppError> {
    if let Err(errors) = request.validate() {
        return Ok(Json(Envelope::from_validation(&errors)));
    }

    let updated =
        db::users::update_preferences(&state.db, user_id, request.theme, &request.user_lang)
            .await?;
    if updated > 0 {
        Ok(Json(Envelope::ok_empty()))
    } else {
        Ok(Json(Envelope::fail("No changes made")))
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/api/preferences",
        get(get_preferences).put(update_preferences),
    )
}
