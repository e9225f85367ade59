use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::{
    authz, db,
    domain::{CompanyId, CompanyRole},
    envelope::Envelope,
    error::AppError,
    session::AuthenticatedUser,
    AppState,
};

/// Request body for creating or updating a company.
#[derive(Debug, Deserialize, Validate)]
pub struct CompanyRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description is too long"))]
    pub description: Option<String>,
}

/// Request body for deleting a company. Destructive: the caller re-enters
/// their own password.
#[derive(Debug, Deserialize)]
pub struct DeleteCompanyRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedCompany {
    pub id: CompanyId,
}

#[derive(Debug, Serialize)]
pub struct CompanyDetails {
    pub company_id: i64,
    pub company_name: String,
    pub company_description: Option<String>,
    pub owner_user_id: i64,
    pub is_owner: bool,
}

#[derive(Debug, Serialize)]
pub struct CompanyUsers {
    pub company_id: i64,
    pub company_name: String,
    pub users: Vec<db::companies::CompanyMember>,
    pub current_user_role: String,
}

/// GET /api/companies: companies the caller belongs to, with membership
/// state.
pub async fn list(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<db::companies::CompanyForUser>>>, AppError> {
    let companies = db::companies::list_for_user(&state.db, user_id).await?;
    Ok(Json(Envelope::ok(companies)))
}

/// POST /api/companies: create a company; the creator becomes owner with an
/// inactive manager membership. Both writes share one transaction.
pub async fn create(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<CompanyRequest>,
) -> Result<Json<Envelope<CreatedCompany>>, AppError> {
    if let Err(errors) = request.validate() {
        return Ok(Json(Envelope::from_validation(&errors)));
    }

    let mut tx = state.db.begin().await?;
    let company_id = db::companies::insert(
        &mut *tx,
        request.name.trim(),
        request.description.as_deref(),
        user_id,
    )
    .await?;
    db::memberships::insert(&mut *tx, company_id, user_id, CompanyRole::Manager).await?;
    tx.commit().await?;

    Ok(Json(Envelope::ok(CreatedCompany { id: company_id })))
}

/// GET /api/companies/:id: details for a company the caller belongs to.
/// Unknown id and foreign company are both "not found".
pub async fn details(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
) -> Result<Json<Envelope<CompanyDetails>>, AppError> {
    let company_id = CompanyId::new(company_id);
    let company = match db::companies::find_for_member(&state.db, company_id, user_id).await? {
        Some(company) => company,
        None => return Ok(Json(Envelope::fail("Company not found or access denied"))),
    };
    Ok(Json(Envelope::ok(CompanyDetails {
        company_id: company.id,
        company_name: company.name,
        company_description: company.description,
        owner_user_id: company.owner_user_id,
        is_owner: company.owner_user_id == user_id.as_i64(),
    })))
}

/// PUT /api/companies/:id: owner-only rename/redescribe.
pub async fn update(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    Json(request): Json<CompanyRequest>,
) -> Result<Json<Envelope<()>>, AppError> {
    if let Err(errors) = request.validate() {
        return Ok(Json(Envelope::from_validation(&errors)));
    }

    let company_id = CompanyId::new(company_id);
    if !authz::is_company_owner(&state.db, company_id, user_id).await? {
        return Ok(Json(Envelope::fail("Only the owner can update a company")));
    }

    let updated = db::companies::update(
        &state.db,
        company_id,
        user_id,
        request.name.trim(),
        request.description.as_deref(),
    )
    .await?;
    if updated > 0 {
        Ok(Json(Envelope::ok_empty()))
    } else {
        Ok(Json(Envelope::fail("Company not found or access denied")))
    }
}

/// DELETE /api/companies/:id: owner-only soft delete with password
/// re-confirmation. Deactivates every membership of the company in the same
/// transaction, including the owner's.
pub async fn remove(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    Json(request): Json<DeleteCompanyRequest>,
) -> Result<Json<Envelope<()>>, AppError> {
    if !authz::confirm_password(&state.db, user_id, &request.password).await? {
        return Ok(Json(Envelope::fail("Invalid password")));
    }

    let company_id = CompanyId::new(company_id);
    if !authz::is_company_owner(&state.db, company_id, user_id).await? {
        return Ok(Json(Envelope::fail("Only the owner can delete a company")));
    }

    let mut tx = state.db.begin().await?;
    let deleted = db::companies::soft_delete(&mut *tx, company_id, user_id).await?;
    if deleted == 0 {
        return Ok(Json(Envelope::fail("Company not found or access denied")));
    }
    db::memberships::deactivate_all_for_company(&mut *tx, company_id).await?;
    tx.commit().await?;

    Ok(Json(Envelope::ok_empty()))
}

/// POST /api/companies/:id/activate: switch the caller's active company.
/// Deactivate-all plus activate runs in one transaction so there is never a
/// window with zero or two active memberships visible.
pub async fn activate(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
) -> Result<Json<Envelope<()>>, AppError> {
    let company_id = CompanyId::new(company_id);

    let mut tx = state.db.begin().await?;
    db::memberships::deactivate_all_for_user(&mut *tx, user_id).await?;
    let activated = db::memberships::activate(&mut *tx, company_id, user_id).await?;
    if activated == 0 {
        // No membership row to activate; roll the deactivation back too.
        tx.rollback().await?;
        return Ok(Json(Envelope::fail("Company not found or access denied")));
    }
    tx.commit().await?;

    Ok(Json(Envelope::ok_empty()))
}

/// GET /api/companies/:id/users: members of a company. Managers and HR see
/// everyone (manager, then hr, then the rest); other roles see only their
/// own row.
pub async fn users(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
) -> Result<Json<Envelope<CompanyUsers>>, AppError> {
    let company_id = CompanyId::new(company_id);

    let role = match db::memberships::find_role(&state.db, company_id, user_id).await? {
        Some(role) => role,
        None => return Ok(Json(Envelope::fail("Access denied"))),
    };

    let company = match db::companies::find_for_member(&state.db, company_id, user_id).await? {
        Some(company) => company,
        None => return Ok(Json(Envelope::fail("Company not found"))),
    };

    let users = if role.sees_all_members() {
        db::companies::list_members(&state.db, company_id).await?
    } else {
        db::companies::list_member_self(&state.db, company_id, user_id).await?
    };

    Ok(Json(Envelope::ok(CompanyUsers {
        company_id: company.id,
        company_name: company.name,
        users,
        current_user_role: role.to_string(),
    })))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/companies", get(list).post(create))
        .route("/api/companies/:id", get(details).put(update).delete(remove))
        .route("/api/companies/:id/activate", post(activate))
        .route("/api/companies/:id/users", get(users))
}
