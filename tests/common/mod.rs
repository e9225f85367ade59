#![allow(dead_code)]

use axum::body::Body;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use staffdesk::app::db;
use staffdesk::app::domain::{CompanyId, CompanyRole, HashedPassword, Password, UserId};
use staffdesk::create_router;
use tower::ServiceExt;

pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

pub fn test_router(pool: SqlitePool) -> axum::Router {
    let state = staffdesk::app::AppState {
        db: pool,
        storage: std::sync::Arc::new(staffdesk::app::storage::ConsoleStorage),
        config: staffdesk::app::config::Config::for_tests(),
    };
    create_router(state)
}

/// Create a user directly in the database. Returns the new user id.
pub async fn create_user(pool: &SqlitePool, name: &str, email: &str, password: &str) -> UserId {
    let password = Password::new(password.to_string()).unwrap();
    let password_hash = HashedPassword::from_password(&password).unwrap();
    let new_user = db::users::NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password_hash,
    };
    db::users::insert(pool, &new_user).await.unwrap()
}

pub fn extract_session_id_from_cookie(set_cookie_header: &str) -> Option<&str> {
    set_cookie_header
        .split(';')
        .next()?
        .strip_prefix("session_id=")
}

/// Create a user, log in through the API, return a cookie header for
/// authenticated requests.
pub async fn authenticated_cookie(
    pool: &SqlitePool,
    app: &axum::Router,
    email: &str,
    password: &str,
) -> String {
    create_user(pool, "Test User", email, password).await;
    login_cookie(app, email, password).await
}

/// Log an existing user in through the API and return the cookie header.
pub async fn login_cookie(app: &axum::Router, email: &str, password: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/login", None, &body))
        .await
        .unwrap();
    assert_eq!(response.status(), http::StatusCode::OK);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap();
    let session_id = extract_session_id_from_cookie(set_cookie).unwrap();
    format!("session_id={}", session_id)
}

/// Build a JSON request, optionally with a session cookie.
pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: &Value,
) -> http::Request<Body> {
    let mut builder = http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Build a bodyless request, optionally with a session cookie.
pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> http::Request<Body> {
    let mut builder = http::Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Send a request and parse the JSON response body.
pub async fn send(app: &axum::Router, request: http::Request<Body>) -> (http::StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Create a company through the API and activate it. Returns the company id.
pub async fn create_and_activate_company(
    app: &axum::Router,
    cookie: &str,
    name: &str,
) -> i64 {
    let body = serde_json::json!({ "name": name, "description": null });
    let (status, json) = send(app, json_request("POST", "/api/companies", Some(cookie), &body)).await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(json["success"], true, "create company failed: {json}");
    let company_id = json["data"]["id"].as_i64().unwrap();

    let (status, json) = send(
        app,
        empty_request("POST", &format!("/api/companies/{company_id}/activate"), Some(cookie)),
    )
    .await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(json["success"], true, "activate company failed: {json}");

    company_id
}

/// Insert a membership row directly and activate it, bypassing the invite
/// flow, for tests that need a member in a company fast.
pub async fn add_active_member(
    pool: &SqlitePool,
    company_id: i64,
    user_id: UserId,
    role: CompanyRole,
) {
    let company_id = CompanyId::new(company_id);
    db::memberships::insert(pool, company_id, user_id, role)
        .await
        .unwrap();
    db::memberships::deactivate_all_for_user(pool, user_id)
        .await
        .unwrap();
    db::memberships::activate(pool, company_id, user_id)
        .await
        .unwrap();
}

/// Minimal valid employee payload; tests override fields as needed.
pub fn employee_body(full_name: &str, national_id: &str) -> Value {
    serde_json::json!({
        "full_name": full_name,
        "email": null,
        "phone": "555-0100",
        "national_id": national_id,
        "job_title": null,
        "department_id": null,
        "manager_id": null,
        "hire_date": "2026-01-15",
        "work_location": null,
        "address": null,
        "country": null,
        "city": null,
        "salary": 1000.0,
        "currency": "USD",
        "bank_name": null,
        "bank_account_number": null,
        "iban": null,
        "birth_date": null,
        "gender": null,
        "marital_status": null,
        "nationality": null,
        "emergency_contact": null,
        "picture_url": null
    })
}
