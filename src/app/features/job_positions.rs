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

/// Request body for creating or updating a job position.
#[derive(Debug, Deserialize, Validate)]
pub struct JobPositionRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CatalogStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedJobPosition {
    pub id: i64,
}

/// GET /api/job-positions: paged non-archived job positions.
pub async fn list(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<Page<db::job_positions::JobPosition>>>, AppError> {
    let context = RequestContext::resolve(&state.db, user_id).await?;
    let page = match context.active_company {
        Some(company_id) => {
            db::job_positions::ACTIVE
                .page(&state.db, company_id, query.page, query.per_page, &query.search)
                .await?
        }
        None => Page::empty(query.page, query.per_page),
    };
    Ok(Json(Envelope::ok(page)))
}

/// GET /api/job-positions/archived: same shape over the archived slice.
pub async fn list_archived(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<Page<db::job_positions::JobPosition>>>, AppError> {
    let context = RequestContext::resolve(&state.db, user_id).await?;
    let page = match context.active_company {
        Some(company_id) => {
            db::job_positions::ARCHIVED
                .page(&state.db, company_id, query.page, query.per_page, &query.search)
                .await?
        }
        None => Page::empty(query.page, query.per_page),
    };
    Ok(Json(Envelope::ok(page)))
}

/// GET /api/job-positions/:id
pub async fn details(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(job_position_id): Path<i64>,
) -> Result<Json<Envelope<db::job_positions::JobPosition>>, AppError> {
    let context = RequestContext::resolve(&state.db, user_id).await?;
    let company_id = match context.active_company {
        Some(id) => id,
        None => return Ok(Json(Envelope::fail(NO_ACTIVE_COMPANY))),
    };
    match db::job_positions::find_in_company(&state.db, job_position_id, company_id).await? {
        Some(position) => Ok(Json(Envelope::ok(position))),
        None => Ok(Json(Envelope::fail("Job position not found"))),
    }
}

/// POST /api/job-positions
pub async fn create(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<JobPositionRequest>,
) -> Result<Json<Envelope<CreatedJobPosition>>, AppError> {
    if let Err(errors) = request.validate() {
        return Ok(Json(Envelope::from_validation(&errors)));
    }

    let context = RequestContext::resolve(&state.db, user_id).await?;
    let company_id = match context.active_company {
        Some(id) => id,
        None => return Ok(Json(Envelope::fail(NO_ACTIVE_COMPANY))),
    };

    let id = db::job_positions::insert(&state.db, company_id, request.name.trim()).await?;
    Ok(Json(Envelope::ok(CreatedJobPosition { id })))
}

/// PUT /api/job-positions/:id: full replace of the name.
pub async fn update(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(job_position_id): Path<i64>,
    Json(request): Json<JobPositionRequest>,
) -> Result<Json<Envelope<()>>, AppError> {
    if let Err(errors) = request.validate() {
        return Ok(Json(Envelope::from_validation(&errors)));
    }

    let context = RequestContext::resolve(&state.db, user_id).await?;
    let company_id = match context.active_company {
        Some(id) => id,
        None => return Ok(Json(Envelope::fail(NO_ACTIVE_COMPANY))),
    };

    let updated =
        db::job_positions::update(&state.db, job_position_id, company_id, request.name.trim())
            .await?;
    if updated > 0 {
        Ok(Json(Envelope::ok_empty()))
    } else {
        Ok(Json(Envelope::fail("Job position not found")))
    }
}

/// POST /api/job-positions/:id/status: active and archived flip a flag,
/// deleted hard-deletes the row.
pub async fn set_status(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(job_position_id): Path<i64>,
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
            db::job_positions::set_archived(&state.db, job_position_id, company_id, false).await?
        }
        CatalogStatus::Archived => {
            db::job_positions::set_archived(&state.db, job_position_id, company_id, true).await?
        }
        CatalogStatus::Deleted => {
            db::job_positions::delete(&state.db, job_position_id, company_id).await?
        }
    };
    if updated > 0 {
        Ok(Json(Envelope::ok_empty()))
    } else {
        Ok(Json(Envelope::fail("Job position not found")))
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/job-positions", get(list).post(create))
        .route("/api/job-positions/archived", get(list_archived))
        .route("/api/job-positions/:id", get(details).put(update))
        .route("/api/job-positions/:id/status", post(set_status))
}
