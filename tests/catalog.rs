//! Integration tests for the department and job position catalogs.

use staffdesk::app::db;
use staffdesk::app::domain::CompanyId;

mod common;

use crate::common::*;

async fn create_employee(app: &axum::Router, cookie: &str, name: &str, nid: &str) -> i64 {
    let (_, json) = send(
        app,
        json_request("POST", "/api/employees", Some(cookie), &employee_body(name, nid)),
    )
    .await;
    assert_eq!(json["success"], true, "create employee failed: {json}");
    json["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn department_admin_must_be_an_employee_of_the_company() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let cookie = authenticated_cookie(&pool, &app, "owner@example.com", "Password123").await;
    let _first = create_and_activate_company(&app, &cookie, "First").await;
    let foreign_admin = create_employee(&app, &cookie, "Ann", "N-1").await;

    let _second = create_and_activate_company(&app, &cookie, "Second").await;
    let body = serde_json::json!({ "name": "Engineering", "admin_id": foreign_admin });
    let (_, json) = send(&app, json_request("POST", "/api/departments", Some(&cookie), &body)).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Admin employee not found");
}

#[tokio::test]
async fn department_listing_resolves_admin_name() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let cookie = authenticated_cookie(&pool, &app, "owner@example.com", "Password123").await;
    create_and_activate_company(&app, &cookie, "Acme").await;
    let admin_id = create_employee(&app, &cookie, "Ann Admin", "N-1").await;

    let body = serde_json::json!({ "name": "Engineering", "admin_id": admin_id });
    let (_, json) = send(&app, json_request("POST", "/api/departments", Some(&cookie), &body)).await;
    assert_eq!(json["success"], true);
    let department_id = json["data"]["id"].as_i64().unwrap();

    let (_, json) = send(&app, empty_request("GET", "/api/departments", Some(&cookie))).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["data"][0]["admin_name"], "Ann Admin");

    let (_, json) = send(
        &app,
        empty_request("GET", &format!("/api/departments/{department_id}"), Some(&cookie)),
    )
    .await;
    assert_eq!(json["data"]["name"], "Engineering");
    assert_eq!(json["data"]["admin_name"], "Ann Admin");
}

#[tokio::test]
async fn department_archive_and_hard_delete() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let cookie = authenticated_cookie(&pool, &app, "owner@example.com", "Password123").await;
    let company_id = create_and_activate_company(&app, &cookie, "Acme").await;
    let admin_id = create_employee(&app, &cookie, "Ann", "N-1").await;

    let body = serde_json::json!({ "name": "Engineering", "admin_id": admin_id });
    let (_, json) = send(&app, json_request("POST", "/api/departments", Some(&cookie), &body)).await;
    let department_id = json["data"]["id"].as_i64().unwrap();

    // Archive moves the row to the archived slice.
    let body = serde_json::json!({ "status": "archived" });
    let (_, json) = send(
        &app,
        json_request("POST", &format!("/api/departments/{department_id}/status"), Some(&cookie), &body),
    )
    .await;
    assert_eq!(json["success"], true);
    let (_, json) = send(&app, empty_request("GET", "/api/departments", Some(&cookie))).await;
    assert_eq!(json["data"]["total"], 0);
    let (_, json) = send(&app, empty_request("GET", "/api/departments/archived", Some(&cookie))).await;
    assert_eq!(json["data"]["total"], 1);

    // Deleted removes the row outright; there is no soft-delete flag here.
    let body = serde_json::json!({ "status": "deleted" });
    let (_, json) = send(
        &app,
        json_request("POST", &format!("/api/departments/{department_id}/status"), Some(&cookie), &body),
    )
    .await;
    assert_eq!(json["success"], true);
    let row = db::departments::find_in_company(&pool, department_id, CompanyId::new(company_id))
        .await
        .unwrap();
    assert!(row.is_none());
}

#[tokio::test]
async fn job_position_lifecycle() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let cookie = authenticated_cookie(&pool, &app, "owner@example.com", "Password123").await;
    let company_id = create_and_activate_company(&app, &cookie, "Acme").await;

    let body = serde_json::json!({ "name": "Backend Engineer" });
    let (_, json) = send(&app, json_request("POST", "/api/job-positions", Some(&cookie), &body)).await;
    assert_eq!(json["success"], true);
    let position_id = json["data"]["id"].as_i64().unwrap();

    let body = serde_json::json!({ "name": "Senior Backend Engineer" });
    let (_, json) = send(
        &app,
        json_request("PUT", &format!("/api/job-positions/{position_id}"), Some(&cookie), &body),
    )
    .await;
    assert_eq!(json["success"], true);

    let (_, json) = send(
        &app,
        empty_request("GET", &format!("/api/job-positions/{position_id}"), Some(&cookie)),
    )
    .await;
    assert_eq!(json["data"]["name"], "Senior Backend Engineer");

    let body = serde_json::json!({ "status": "archived" });
    send(
        &app,
        json_request("POST", &format!("/api/job-positions/{position_id}/status"), Some(&cookie), &body),
    )
    .await;
    let (_, json) = send(&app, empty_request("GET", "/api/job-positions", Some(&cookie))).await;
    assert_eq!(json["data"]["total"], 0);
    let (_, json) = send(&app, empty_request("GET", "/api/job-positions/archived", Some(&cookie))).await;
    assert_eq!(json["data"]["total"], 1);

    // Reactivate, then hard delete.
    let body = serde_json::json!({ "status": "active" });
    send(
        &app,
        json_request("POST", &format!("/api/job-positions/{position_id}/status"), Some(&cookie), &body),
    )
    .await;
    let body = serde_json::json!({ "status": "deleted" });
    let (_, json) = send(
        &app,
        json_request("POST", &format!("/api/job-positions/{position_id}/status"), Some(&cookie), &body),
    )
    .await;
    assert_eq!(json["success"], true);
    let row = db::job_positions::find_in_company(&pool, position_id, CompanyId::new(company_id))
        .await
        .unwrap();
    assert!(row.is_none());
}

#[tokio::test]
async fn catalogs_are_tenant_isolated() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let cookie = authenticated_cookie(&pool, &app, "owner@example.com", "Password123").await;
    let _first = create_and_activate_company(&app, &cookie, "First").await;
    let admin_id = create_employee(&app, &cookie, "Ann", "N-1").await;

    let body = serde_json::json!({ "name": "Engineering", "admin_id": admin_id });
    send(&app, json_request("POST", "/api/departments", Some(&cookie), &body)).await;
    let body = serde_json::json!({ "name": "Backend Engineer" });
    send(&app, json_request("POST", "/api/job-positions", Some(&cookie), &body)).await;

    let _second = create_and_activate_company(&app, &cookie, "Second").await;
    let (_, json) = send(&app, empty_request("GET", "/api/departments", Some(&cookie))).await;
    assert_eq!(json["data"]["total"], 0);
    let (_, json) = send(&app, empty_request("GET", "/api/job-positions", Some(&cookie))).await;
    assert_eq!(json["data"]["total"], 0);
}

#[tokio::test]
async fn employee_typeahead_matches_substring_and_clamps_limit() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let cookie = authenticated_cookie(&pool, &app, "owner@example.com", "Password123").await;
    create_and_activate_company(&app, &cookie, "Acme").await;
    create_employee(&app, &cookie, "Alice Carter", "N-1").await;
    create_employee(&app, &cookie, "Bob Carver", "N-2").await;
    create_employee(&app, &cookie, "Cid Drum", "N-3").await;

    let (_, json) = send(
        &app,
        empty_request("GET", "/api/employees/search?q=car&limit=500", Some(&cookie)),
    )
    .await;
    assert_eq!(json["success"], true);
    let hits = json["data"].as_array().unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["full_name"], "Alice Carter");
    assert_eq!(hits[1]["full_name"], "Bob Carver");

    // An out-of-range limit is clamped, never an error.
    let (_, json) = send(
        &app,
        empty_request("GET", "/api/employees/search?q=&limit=0", Some(&cookie)),
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}
