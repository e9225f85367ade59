use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::{
    db,
    domain::{CompanyId, CompanyRole, InviteStatus},
    envelope::Envelope,
    error::AppError,
    session::AuthenticatedUser,
    AppState,
};

/// Request body for POST /api/invites.
#[derive(Debug, Deserialize, Validate)]
pub struct SendInvitesRequest {
    pub company_id: i64,
    #[validate(length(min = 1, message = "At least one user is required"))]
    pub user_ids: Vec<i64>,
}

/// Query for GET /api/users/search.
#[derive(Debug, Deserialize)]
pub struct UserSearchQuery {
    pub email: String,
    pub company_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UserSearchHit {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub has_invite: bool,
}

#[derive(Debug, Serialize)]
pub struct InviteList {
    pub invites: Vec<db::invites::UserInviteView>,
    pub current_user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct PendingFlag {
    pub has_pending_invites: bool,
}

/// POST /api/invites: bulk-invite users to a company. Self-invites are
/// dropped; if nothing is left after filtering, the operation fails.
pub async fn send(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<SendInvitesRequest>,
) -> Result<Json<Envelope<()>>, AppError> {
    if let Err(errors) = request.validate() {
        return Ok(Json(Envelope::from_validation(&errors)));
    }

    let company_id = CompanyId::new(request.company_id);
    if db::memberships::find_role(&state.db, company_id, user_id)
        .await?
        .is_none()
    {
        return Ok(Json(Envelope::fail("Access denied")));
    }

    let targets: Vec<i64> = request
        .user_ids
        .iter()
        .copied()
        .filter(|&target| target != user_id.as_i64())
        .collect();
    if targets.is_empty() {
        return Ok(Json(Envelope::fail("No users to invite")));
    }

    db::invites::insert_pending(&state.db, user_id, &targets, company_id).await?;
    Ok(Json(Envelope::ok_empty()))
}

/// GET /api/invites: invites the caller sent or received, newest first.
pub async fn list(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<Envelope<InviteList>>, AppError> {
    let invites = db::invites::list_for_user(&state.db, user_id).await?;
    Ok(Json(Envelope::ok(InviteList {
        invites,
        current_user_id: user_id.as_i64(),
    })))
}

/// POST /api/invites/:id/accept: target-only, pending-only. Marks the
/// invite accepted and ensures an inactive employee membership in the same
/// transaction; an existing membership is left untouched.
pub async fn accept(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(invite_id): Path<i64>,
) -> Result<Json<Envelope<()>>, AppError> {
    let invite = match db::invites::find_pending_for_target(&state.db, invite_id, user_id).await? {
        Some(invite) => invite,
        None => return Ok(Json(Envelope::fail("Invite not found"))),
    };

    let mut tx = state.db.begin().await?;
    db::invites::set_status(&mut *tx, invite.id, InviteStatus::Accepted).await?;
    db::memberships::ensure(
        &mut *tx,
        CompanyId::new(invite.company_id),
        user_id,
        CompanyRole::Employee,
    )
    .await?;
    tx.commit().await?;

    Ok(Json(Envelope::ok_empty()))
}

/// POST /api/invites/:id/reject: target-only, pending-only. No membership
/// side effect.
pub async fn reject(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(invite_id): Path<i64>,
) -> Result<Json<Envelope<()>>, AppError> {
    let invite = match db::invites::find_pending_for_target(&state.db, invite_id, user_id).await? {
        Some(invite) => invite,
        None => return Ok(Json(Envelope::fail("Invite not found"))),
    };

    db::invites::set_status(&state.db, invite.id, InviteStatus::Rejected).await?;
    Ok(Json(Envelope::ok_empty()))
}

/// DELETE /api/invites/:id: either participant, any status.
pub async fn remove(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(invite_id): Path<i64>,
) -> Result<Json<Envelope<()>>, AppError> {
    let invite = match db::invites::find_for_participant(&state.db, invite_id, user_id).await? {
        Some(invite) => invite,
        None => return Ok(Json(Envelope::fail("Invite not found"))),
    };

    db::invites::delete(&state.db, invite.id).await?;
    Ok(Json(Envelope::ok_empty()))
}

/// GET /api/invites/pending: does the caller have any pending invites?
/// Drives the inbox badge.
pub async fn has_pending(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<Envelope<PendingFlag>>, AppError> {
    let has_pending_invites = db::invites::has_any_pending(&state.db, user_id).await?;
    Ok(Json(Envelope::ok(PendingFlag {
        has_pending_invites,
    })))
}

/// GET /api/users/search: substring email search for the invite picker.
/// With a company_id, each hit is annotated with whether that user already
/// has a pending invite there.
pub async fn search_users(
    AuthenticatedUser(_user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<UserSearchQuery>,
) -> Result<Json<Envelope<Vec<UserSearchHit>>>, AppError> {
    let users = db::users::search_by_email(&state.db, &query.email).await?;

    let mut hits = Vec::with_capacity(users.len());
    for user in users {
        let has_invite = match query.company_id {
            Some(company_id) => {
                db::invites::has_pending_for_company(
                    &state.db,
                    crate::app::domain::UserId::new(user.id),
                    CompanyId::new(company_id),
                )
                .await?
            }
            None => false,
        };
        hits.push(UserSearchHit {
            id: user.id,
            name: user.name,
            email: user.email,
            has_invite,
        });
    }

    Ok(Json(Envelope::ok(hits)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/invites", get(list).post(send))
        .route("/api/invites/pending", get(has_pending))
        .route("/api/invites/:id/accept", post(accept))
        .route("/api/invites/:id/reject", post(reject))
        .route("/api/invites/:id", delete(remove))
        .route("/api/users/search", get(search_users))
}
