use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

use crate::app::{
    authz, db,
    db::employees::EmployeeFields,
    domain::{employee_code, CompanyRole, EmployeeStatus, UserId},
    envelope::{Envelope, Page},
    error::AppError,
    session::AuthenticatedUser,
    tenant::{RequestContext, NO_ACTIVE_COMPANY},
    AppState,
};

/// Listing query string: 1-based page, clamped per_page, optional substring
/// search.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
    #[serde(default)]
    pub search: String,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    15
}

#[derive(Debug, Deserialize)]
pub struct TypeaheadQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_typeahead_limit")]
    pub limit: i64,
}

fn default_typeahead_limit() -> i64 {
    10
}

/// Full employee payload for create and update. Update is a full replace of
/// these fields, not a patch.
#[derive(Debug, Deserialize, Validate)]
pub struct EmployeeRequest {
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Email is invalid"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, max = 50, message = "National id is required"))]
    pub national_id: String,
    #[validate(length(max = 255, message = "Job title is too long"))]
    pub job_title: Option<String>,
    pub department_id: Option<i64>,
    pub manager_id: Option<i64>,
    #[validate(length(min = 1, max = 32, message = "Hire date is required"))]
    pub hire_date: String,
    pub work_location: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    #[validate(range(min = 0.0, message = "Salary must not be negative"))]
    pub salary: f64,
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub iban: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub nationality: Option<String>,
    pub emergency_contact: Option<String>,
    pub picture_url: Option<String>,
}

impl EmployeeRequest {
    fn into_fields(self) -> EmployeeFields {
        EmployeeFields {
            full_name: self.full_name.trim().to_string(),
            email: self.email,
            phone: self.phone,
            national_id: self.national_id,
            job_title: self.job_title,
            department_id: self.department_id,
            manager_id: self.manager_id,
            hire_date: self.hire_date,
            work_location: self.work_location,
            address: self.address,
            country: self.country,
            city: self.city,
            salary: self.salary,
            currency: self.currency,
            bank_name: self.bank_name,
            bank_account_number: self.bank_account_number,
            iban: self.iban,
            birth_date: self.birth_date,
            gender: self.gender,
            marital_status: self.marital_status,
            nationality: self.nationality,
            emergency_contact: self.emergency_contact,
            picture_url: self.picture_url,
        }
    }
}

/// Request body for POST /api/employees/:id/status. `deleted` is destructive
/// and requires the caller's own password.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
    pub password: Option<String>,
}

/// Request body for POST /api/employees/:id/link.
#[derive(Debug, Deserialize)]
pub struct LinkRequest {
    pub user_id: i64,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct CreatedEmployee {
    pub id: i64,
    pub employee_code: String,
}

/// Unique columns an employee write can collide on, mapped to per-field
/// conflict messages.
const UNIQUE_FIELDS: &[&str] = &["email", "national_id", "employee_code"];

/// Same-company checks for the references a payload may carry. A reference
/// into another tenant reads as "not found".
async fn validate_references(
    state: &AppState,
    context: &RequestContext,
    fields: &EmployeeFields,
) -> Result<Option<Envelope<CreatedEmployee>>, AppError> {
    let company_id = match context.active_company {
        Some(id) => id,
        None => return Ok(Some(Envelope::fail(NO_ACTIVE_COMPANY))),
    };
    if let Some(department_id) = fields.department_id {
        if db::departments::find_in_company(&state.db, department_id, company_id)
            .await?
            .is_none()
        {
            return Ok(Some(Envelope::fail("Department not found")));
        }
    }
    if let Some(manager_id) = fields.manager_id {
        if !db::employees::exists_in_company(&state.db, manager_id, company_id).await? {
            return Ok(Some(Envelope::fail("Manager not found")));
        }
    }
    Ok(None)
}

/// GET /api/employees: paged active employees of the active company. With no
/// active company this is an empty page, not a failure.
pub async fn list(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<Page<db::employees::EmployeeListItem>>>, AppError> {
    let context = RequestContext::resolve(&state.db, user_id).await?;
    let page = match context.active_company {
        Some(company_id) => {
            db::employees::ACTIVE
                .page(&state.db, company_id, query.page, query.per_page, &query.search)
                .await?
        }
        None => Page::empty(query.page, query.per_page),
    };
    Ok(Json(Envelope::ok(page)))
}

/// GET /api/employees/archived: same shape over the archived slice.
pub async fn list_archived(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<Page<db::employees::EmployeeListItem>>>, AppError> {
    let context = RequestContext::resolve(&state.db, user_id).await?;
    let page = match context.active_company {
        Some(company_id) => {
            db::employees::ARCHIVED
                .page(&state.db, company_id, query.page, query.per_page, &query.search)
                .await?
        }
        None => Page::empty(query.page, query.per_page),
    };
    Ok(Json(Envelope::ok(page)))
}

/// GET /api/employees/search: typeahead over non-deleted employees.
pub async fn search(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<TypeaheadQuery>,
) -> Result<Json<Envelope<Vec<db::employees::EmployeeHit>>>, AppError> {
    let context = RequestContext::resolve(&state.db, user_id).await?;
    let hits = match context.active_company {
        Some(company_id) => {
            db::employees::SEARCH
                .typeahead(&state.db, company_id, &query.q, query.limit)
                .await?
        }
        None => Vec::new(),
    };
    Ok(Json(Envelope::ok(hits)))
}

/// GET /api/employees/:id: full record, tenant-scoped.
pub async fn details(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
) -> Result<Json<Envelope<db::employees::Employee>>, AppError> {
    let context = RequestContext::resolve(&state.db, user_id).await?;
    let company_id = match context.active_company {
        Some(id) => id,
        None => return Ok(Json(Envelope::fail(NO_ACTIVE_COMPANY))),
    };
    match db::employees::find_in_company(&state.db, employee_id, company_id).await? {
        Some(employee) => Ok(Json(Envelope::ok(employee))),
        None => Ok(Json(Envelope::fail("Employee not found"))),
    }
}

/// POST /api/employees: create with a generated employee code. Code
/// uniqueness is enforced only by the database constraint; a collision comes
/// back as a duplicate-value conflict.
pub async fn create(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Json(request): Json<EmployeeRequest>,
) -> Result<Json<Envelope<CreatedEmployee>>, AppError> {
    if let Err(errors) = request.validate() {
        return Ok(Json(Envelope::from_validation(&errors)));
    }

    let context = RequestContext::resolve(&state.db, user_id).await?;
    let company_id = match context.active_company {
        Some(id) => id,
        None => return Ok(Json(Envelope::fail(NO_ACTIVE_COMPANY))),
    };

    let fields = request.into_fields();
    if let Some(envelope) = validate_references(&state, &context, &fields).await? {
        return Ok(Json(envelope));
    }

    let code = employee_code::generate(company_id, &fields.full_name, OffsetDateTime::now_utc());
    match db::employees::insert(&state.db, company_id, &code, &fields).await {
        Ok(id) => Ok(Json(Envelope::ok(CreatedEmployee {
            id,
            employee_code: code,
        }))),
        Err(err) => match db::unique_violation(&err, UNIQUE_FIELDS) {
            Some(fields) => Ok(Json(Envelope::conflict(&fields))),
            None => Err(err.into()),
        },
    }
}

/// PUT /api/employees/:id: full replace of the mutable fields. When the
/// picture URL changes, the replaced object is deleted after the write; when
/// the write fails, the newly stored object is deleted instead so nothing is
/// left orphaned.
pub async fn update(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    Json(request): Json<EmployeeRequest>,
) -> Result<Json<Envelope<CreatedEmployee>>, AppError> {
    if let Err(errors) = request.validate() {
        return Ok(Json(Envelope::from_validation(&errors)));
    }

    let context = RequestContext::resolve(&state.db, user_id).await?;
    let company_id = match context.active_company {
        Some(id) => id,
        None => return Ok(Json(Envelope::fail(NO_ACTIVE_COMPANY))),
    };

    let existing = match db::employees::find_in_company(&state.db, employee_id, company_id).await? {
        Some(employee) => employee,
        None => return Ok(Json(Envelope::fail("Employee not found"))),
    };

    let fields = request.into_fields();
    if let Some(envelope) = validate_references(&state, &context, &fields).await? {
        return Ok(Json(envelope));
    }

    let new_picture = fields.picture_url.clone();
    let old_picture = existing.picture_url.clone();
    let picture_changed = new_picture != old_picture;

    match db::employees::update(&state.db, employee_id, company_id, &fields).await {
        Ok(updated) if updated > 0 => {
            if picture_changed {
                if let Some(old) = old_picture {
                    delete_stored_object(&state, &old).await;
                }
            }
            Ok(Json(Envelope::ok_empty()))
        }
        Ok(_) => Ok(Json(Envelope::fail("Employee not found"))),
        Err(err) => {
            // The write failed after the caller stored a new object; clean it
            // up so the store holds no unreferenced picture.
            if picture_changed {
                if let Some(new) = new_picture {
                    delete_stored_object(&state, &new).await;
                }
            }
            match db::unique_violation(&err, UNIQUE_FIELDS) {
                Some(fields) => Ok(Json(Envelope::conflict(&fields))),
                None => Err(err.into()),
            }
        }
    }
}

/// Storage deletion never aborts the surrounding operation; failures are
/// logged and the orphaned object stays behind.
async fn delete_stored_object(state: &AppState, key: &str) {
    if let Err(err) = state.storage.delete_object(key).await {
        tracing::warn!(key, error = %err, "failed to delete stored object");
    }
}

/// POST /api/employees/:id/status: overwrite the four exclusive lifecycle
/// flags. `deleted` requires password re-confirmation.
pub async fn set_status(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<Envelope<()>>, AppError> {
    let status = match request.status.parse::<EmployeeStatus>() {
        Ok(status) => status,
        Err(_) => return Ok(Json(Envelope::fail("Invalid status"))),
    };

    let context = RequestContext::resolve(&state.db, user_id).await?;
    let company_id = match context.active_company {
        Some(id) => id,
        None => return Ok(Json(Envelope::fail(NO_ACTIVE_COMPANY))),
    };

    if status == EmployeeStatus::Deleted {
        let password = request.password.as_deref().unwrap_or("");
        if !authz::confirm_password(&state.db, user_id, password).await? {
            return Ok(Json(Envelope::fail("Invalid password")));
        }
    }

    let updated = db::employees::set_status(&state.db, employee_id, company_id, status).await?;
    if updated > 0 {
        Ok(Json(Envelope::ok_empty()))
    } else {
        Ok(Json(Envelope::fail("Employee not found")))
    }
}

/// POST /api/employees/:id/link: point the employee record at a user
/// account and upsert that user's membership with the supplied role. An
/// employee already linked elsewhere answers with ALREADY_LINKED unless the
/// caller forces the repoint.
pub async fn link(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<AppState>,
    Path(employee_id): Path<i64>,
    Json(request): Json<LinkRequest>,
) -> Result<Json<Envelope<()>>, AppError> {
    let context = RequestContext::resolve(&state.db, user_id).await?;
    let company_id = match context.active_company {
        Some(id) => id,
        None => return Ok(Json(Envelope::fail(NO_ACTIVE_COMPANY))),
    };

    let target = UserId::new(request.user_id);
    if db::users::find_by_id(&state.db, target).await?.is_none() {
        return Ok(Json(Envelope::fail("User not found")));
    }

    let employee = match db::employees::find_in_company(&state.db, employee_id, company_id).await? {
        Some(employee) => employee,
        None => return Ok(Json(Envelope::fail("Employee not found"))),
    };

    if let Some(linked) = employee.user_id {
        if linked != target.as_i64() && !request.force {
            return Ok(Json(Envelope::fail_with_code(
                "Employee is already linked to another user",
                "ALREADY_LINKED",
            )));
        }
    }

    // Unknown role strings degrade to employee rather than failing the link.
    let role = CompanyRole::parse_or_employee(&request.role);

    let mut tx = state.db.begin().await?;
    db::employees::set_linked_user(&mut *tx, employee_id, company_id, target).await?;
    db::memberships::upsert_role(&mut *tx, company_id, target, role).await?;
    tx.commit().await?;

    Ok(Json(Envelope::ok_empty()))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/employees", get(list).post(create))
        .route("/api/employees/archived", get(list_archived))
        .route("/api/employees/search", get(search))
        .route("/api/employees/:id", get(details).put(update))
        .route("/api/employees/:id/status", post(set_status))
        .route("/api/employees/:id/link", post(link))
}
