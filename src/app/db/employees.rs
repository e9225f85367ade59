use sqlx::{FromRow, SqliteExecutor};
use time::OffsetDateTime;

use crate::app::db::scoped::ScopedQuery;
use crate::app::domain::{CompanyId, EmployeeStatus, UserId};

/// Active (non-archived, non-deleted) employee listing.
pub const ACTIVE: ScopedQuery = ScopedQuery {
    table: "employee",
    columns: "id, full_name, email, phone, job_title, department_id, manager_id, hire_date, is_active",
    name_column: "full_name",
    status_where: "is_deleted = 0 AND is_archived = 0",
};

/// Archived employee listing. Disjoint from `ACTIVE`.
pub const ARCHIVED: ScopedQuery = ScopedQuery {
    table: "employee",
    columns: "id, full_name, email, phone, job_title, department_id, manager_id, hire_date, is_active",
    name_column: "full_name",
    status_where: "is_deleted = 0 AND is_archived = 1",
};

/// Typeahead over non-deleted employees.
pub const SEARCH: ScopedQuery = ScopedQuery {
    table: "employee",
    columns: "id, full_name",
    name_column: "full_name",
    status_where: "is_deleted = 0",
};

/// Listing row for employee tables.
#[derive(Debug, FromRow, serde::Serialize)]
pub struct EmployeeListItem {
    pub id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub job_title: Option<String>,
    pub department_id: Option<i64>,
    pub manager_id: Option<i64>,
    pub hire_date: String,
    pub is_active: i64,
}

/// Typeahead hit.
#[derive(Debug, FromRow, serde::Serialize)]
pub struct EmployeeHit {
    pub id: i64,
    pub full_name: String,
}

/// Full database row for employee table.
#[derive(Debug, FromRow, serde::Serialize)]
pub struct Employee {
    pub id: i64,
    pub company_id: i64,
    pub user_id: Option<i64>,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub national_id: String,
    pub employee_code: String,
    pub job_title: Option<String>,
    pub department_id: Option<i64>,
    pub manager_id: Option<i64>,
    pub hire_date: String,
    pub work_location: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub salary: f64,
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
    pub is_active: i64,
    pub is_suspended: i64,
    pub is_archived: i64,
    pub is_deleted: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Mutable employee fields, written whole on create and update (full
/// replace, not a patch).
#[derive(Debug, Clone)]
pub struct EmployeeFields {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub national_id: String,
    pub job_title: Option<String>,
    pub department_id: Option<i64>,
    pub manager_id: Option<i64>,
    pub hire_date: String,
    pub work_location: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub salary: f64,
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

/// Insert a new employee. Returns the new row id.
pub async fn insert<'e, E>(
    executor: E,
    company_id: CompanyId,
    employee_code: &str,
    fields: &EmployeeFields,
) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "INSERT INTO employee ( \
            company_id, employee_code, full_name, email, phone, national_id, \
            job_title, department_id, manager_id, hire_date, \
            work_location, address, country, city, \
            salary, currency, bank_name, bank_account_number, iban, \
            birth_date, gender, marital_status, nationality, emergency_contact, \
            picture_url, created_at, updated_at \
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(company_id.as_i64())
    .bind(employee_code)
    .bind(&fields.full_name)
    .bind(&fields.email)
    .bind(&fields.phone)
    .bind(&fields.national_id)
    .bind(&fields.job_title)
    .bind(fields.department_id)
    .bind(fields.manager_id)
    .bind(&fields.hire_date)
    .bind(&fields.work_location)
    .bind(&fields.address)
    .bind(&fields.country)
    .bind(&fields.city)
    .bind(fields.salary)
    .bind(&fields.currency)
    .bind(&fields.bank_name)
    .bind(&fields.bank_account_number)
    .bind(&fields.iban)
    .bind(&fields.birth_date)
    .bind(&fields.gender)
    .bind(&fields.marital_status)
    .bind(&fields.nationality)
    .bind(&fields.emergency_contact)
    .bind(&fields.picture_url)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Full replace of the mutable fields, tenant-scoped.
pub async fn update<'e, E>(
    executor: E,
    employee_id: i64,
    company_id: CompanyId,
    fields: &EmployeeFields,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "UPDATE employee SET \
            full_name = ?, email = ?, phone = ?, national_id = ?, \
            job_title = ?, department_id = ?, manager_id = ?, hire_date = ?, \
            work_location = ?, address = ?, country = ?, city = ?, \
            salary = ?, currency = ?, bank_name = ?, bank_account_number = ?, iban = ?, \
            birth_date = ?, gender = ?, marital_status = ?, nationality = ?, emergency_contact = ?, \
            picture_url = ?, updated_at = ? \
         WHERE id = ? AND company_id = ?",
    )
    .bind(&fields.full_name)
    .bind(&fields.email)
    .bind(&fields.phone)
    .bind(&fields.national_id)
    .bind(&fields.job_title)
    .bind(fields.department_id)
    .bind(fields.manager_id)
    .bind(&fields.hire_date)
    .bind(&fields.work_location)
    .bind(&fields.address)
    .bind(&fields.country)
    .bind(&fields.city)
    .bind(fields.salary)
    .bind(&fields.currency)
    .bind(&fields.bank_name)
    .bind(&fields.bank_account_number)
    .bind(&fields.iban)
    .bind(&fields.birth_date)
    .bind(&fields.gender)
    .bind(&fields.marital_status)
    .bind(&fields.nationality)
    .bind(&fields.emergency_contact)
    .bind(&fields.picture_url)
    .bind(now)
    .bind(employee_id)
    .bind(company_id.as_i64())
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Tenant-scoped single-row fetch. A missing row and a row in another
/// company are indistinguishable here.
pub async fn find_in_company<'e, E>(
    executor: E,
    employee_id: i64,
    company_id: CompanyId,
) -> Result<Option<Employee>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Employee>("SELECT * FROM employee WHERE id = ? AND company_id = ?")
        .bind(employee_id)
        .bind(company_id.as_i64())
        .fetch_optional(executor)
        .await
}

/// Does a non-deleted employee with this id exist in the company? Used to
/// validate manager/admin references before a write.
pub async fn exists_in_company<'e, E>(
    executor: E,
    employee_id: i64,
    company_id: CompanyId,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let count: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM employee WHERE id = ? AND company_id = ? AND is_deleted = 0",
    )
    .bind(employee_id)
    .bind(company_id.as_i64())
    .fetch_one(executor)
    .await?;
    Ok(count > 0)
}

/// Overwrite all four status flags at once. Idempotent: the requested status
/// fully determines the row's flag state.
pub async fn set_status<'e, E>(
    executor: E,
    employee_id: i64,
    company_id: CompanyId,
    status: EmployeeStatus,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let (active, suspended, archived, deleted) = status.flags();
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "UPDATE employee SET is_active = ?, is_suspended = ?, is_archived = ?, is_deleted = ?, updated_at = ? \
         WHERE id = ? AND company_id = ?",
    )
    .bind(active)
    .bind(suspended)
    .bind(archived)
    .bind(deleted)
    .bind(now)
    .bind(employee_id)
    .bind(company_id.as_i64())
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Point the employee's one-to-one user link at the given user.
pub async fn set_linked_user<'e, E>(
    executor: E,
    employee_id: i64,
    company_id: CompanyId,
    user_id: UserId,
) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let result = sqlx::query(
        "UPDATE employee SET user_id = ?, updated_at = ? WHERE id = ? AND company_id = ?",
    )
    .bind(user_id.as_i64())
    .bind(now)
    .bind(employee_id)
    .bind(company_id.as_i64())
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}
