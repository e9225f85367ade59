use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::{
    db,
    domain::CatalogStatus,
    envelope::{Envelope, Page},
    error::AppError,
    features::employees::ListQuery,
    session::AuthenticatedUser,
    tenant::{RequestContext, NO_ACTIVE_COMPANY},
    AppState,
};

/// Request body for creating or updating a department. The admin must be a
/// non-deleted employee of the same company.
#[derive(Debug, Deserialize, Validate)]
pub struct DepartmentRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    pub admin_id: i64,
}

/// Request body for POST /api/departments/:id/status. `deleted` removes the
/// row; there is no soft-delete flag on this table.
#[derive(Debug, Deserialize)]
pub struct CatalogStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedDepartment {
    pub id: i64,
}

/// GET /api/departments: paged non-archived departments with admin names.
pub async fn list(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<Page<db::departments::Department>>>, AppError> {
    let context = RequestContext::resolve(&state.db, user_id).await?;
    let page = match context.active_company {
        Some(company_id) => {
            db::departments::ACTIVE
                .page(&state.db, company_id, query.page, query.per_page, &query.search)
                .await?
        }
        None => Page::empty(query.page, query.per_page),
    };
    Ok(Json(Envelope::ok(page)))
}

/// GET /api/departments/archived: same shape over the archived slice.
pub async fn list_archived(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<Page<db::departments::Department>>>, AppError> {
    let context = RequestContext::resolve(&state.db, user_id).await?;
    let page = match context.active_company {
        Some(company_id) => {
            db::departments::ARCHIVED
                .page(&state.db, company_id, query.page, query.per_page, &query.search)
                .await?
        }
        None => Page::empty(query.page, query.per_page),
    };
    Ok(Json(Envelope::ok(page)))
}

/// GET /api/departments/:id
pub async fn details(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(department_id): Path<i64>,
) -> Result<Json<Envelope<db::departments::Department>>, AppError> {
    let context = RequestContext::resolve(&state.db, user_id).await?;
    let company_id = match context.active_company {
        Some(id) => id,
        None => return Ok(Json(Envelope::fail(NO_ACTIVE_COMPANY))),
    };
    match db::departments::find_in_company(&state.db, department_id, company_id).await? {
        Some(department) => Ok(Json(Envelope::ok(department))),
        None => Ok(Json(Envelope::fail("Department not found"))),
    }
}

/// POST /api/departments: create with a same-company admin reference.
pub async fn create(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<DepartmentRequest>,
) -> Result<Json<Envelope<CreatedDepartment>>, AppError> {
    if let Err(errors) = request.validate() {
        return Ok(Json(Envelope::from_validation(&errors)));
    }

    let context = RequestContext::resolve(&state.db, user_id).await?;
    let company_id = match context.active_company {
        Some(id) => id,
        None => return Ok(Json(Envelope::fail(NO_ACTIVE_COMPANY))),
    };

    if !db::employees::exists_in_company(&state.db, request.admin_id, company_id).await? {
        return Ok(Json(Envelope::fail("Admin employee not found")));
    }

    let id = db::departments::insert(&state.db, company_id, request.name.trim(), request.admin_id)
        .await?;
    Ok(Json(Envelope::ok(CreatedDepartment { id })))
}

/// PUT /api/departments/:id: full replace of name and admin.
pub async fn update(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(department_id): Path<i64>,
    Json(request): Json<DepartmentRequest>,
) -> Result<Json<Envelope<()>>, AppError> {
    if let Err(errors) = request.validate() {
        return Ok(Json(Envelope::from_validation(&errors)));
    }

    let context = RequestContext::resolve(&state.db, user_id).await?;
    let company_id = match context.active_company {
        Some(id) => id,
        None => return Ok(Json(Envelope::fail(NO_ACTIVE_COMPANY))),
    };

    if !db::employees::exists_in_company(&state.db, request.admin_id, company_id).await? {
        return Ok(Json(Envelope::fail("Admin employee not found")));
    }

    let updated = db::departments::update(
        &state.db,
        department_id,
        company_id,
        request.name.trim(),
        request.admin_id,
    )
    .await?;
    if updated > 0 {
        Ok(Json(Envelope::ok_empty()))
    } else {
        Ok(Json(Envelope::fail("Department not found")))
    }
}

/// POST /api/departments/:id/status: active and archived flip a flag,
/// deleted hard-deletes the row.
pub async fn set_status(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(department_id): Path<i64>,
    Json(request): Json<CatalogStatusRequest>,
) -> Result<Json<Envelope<()>>, AppError> {
    let status = match request.status.parse::<CatalogStatus>() {
        Ok(status) => status,
        Err(_) => return Ok(Json(Envelope::fail("Invalid status"))),
    };

    let context = RequestContext::resolve(&state.db, user_id).await?;
    let company_id = match context.active_company {
        Some(id) => id,
        None => return Ok(Json(Envelope::fail(NO_ACTIVE_COMPANY))),
    };

    let updated = match status {
        CatalogStatus::Active => {
            db::departments::set_archived(&state.db, department_id, company_id, false).await?
        }
        CatalogStatus::Archived => {
            db::departments::set_archived(&state.db, department_id, company_id, true).await?
        }
        CatalogStatus::Deleted => {
            db::departments::delete(&state.db, department_id, company_id).await?
        }
    };
    if updated > 0 {
        Ok(Json(Envelope::ok_empty()))
    } else {
        Ok(Json(Envelope::fail("Department not found")))
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/departments", get(list).post(create))
        .route("/api/departments/archived", get(list_archived))
        .route("/api/departments/:id", get(details).put(update))
        .route("/api/departments/:id/status", post(set_status))
}
