//! Integration tests for company lifecycle and membership activation.

use staffdesk::app::db;
use staffdesk::app::domain::{CompanyId, CompanyRole, UserId};

mod common;

use crate::common::*;

#[tokio::test]
async fn company_list_requires_authentication() {
    let pool = test_pool().await;
    let app = test_router(pool);

    let (status, _) = send(&app, empty_request("GET", "/api/companies", None)).await;
    assert_eq!(status, http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_lists_and_shows_company_with_ownership() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let cookie = authenticated_cookie(&pool, &app, "owner@example.com", "Password123").await;

    let body = serde_json::json!({ "name": "Acme", "description": "Widgets" });
    let (status, json) =
        send(&app, json_request("POST", "/api/companies", Some(&cookie), &body)).await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(json["success"], true);
    let company_id = json["data"]["id"].as_i64().unwrap();

    let (_, json) = send(&app, empty_request("GET", "/api/companies", Some(&cookie))).await;
    assert_eq!(json["success"], true);
    let companies = json["data"].as_array().unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0]["company_name"], "Acme");
    assert_eq!(companies[0]["company_role"], "manager");

    let (_, json) = send(
        &app,
        empty_request("GET", &format!("/api/companies/{company_id}"), Some(&cookie)),
    )
    .await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["is_owner"], true);
    assert_eq!(json["data"]["company_description"], "Widgets");
}

#[tokio::test]
async fn foreign_company_details_read_as_not_found() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let owner = authenticated_cookie(&pool, &app, "owner@example.com", "Password123").await;
    let stranger = authenticated_cookie(&pool, &app, "other@example.com", "Password123").await;

    let company_id = create_and_activate_company(&app, &owner, "Acme").await;

    let (status, json) = send(
        &app,
        empty_request("GET", &format!("/api/companies/{company_id}"), Some(&stranger)),
    )
    .await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn only_owner_can_update() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let owner = authenticated_cookie(&pool, &app, "owner@example.com", "Password123").await;
    let company_id = create_and_activate_company(&app, &owner, "Acme").await;

    let member_id = create_user(&pool, "Member", "member@example.com", "Password123").await;
    add_active_member(&pool, company_id, member_id, CompanyRole::Hr).await;
    let member = login_cookie(&app, "member@example.com", "Password123").await;

    let body = serde_json::json!({ "name": "Acme Renamed", "description": null });
    let (_, json) = send(
        &app,
        json_request("PUT", &format!("/api/companies/{company_id}"), Some(&member), &body),
    )
    .await;
    assert_eq!(json["success"], false);

    let (_, json) = send(
        &app,
        json_request("PUT", &format!("/api/companies/{company_id}"), Some(&owner), &body),
    )
    .await;
    assert_eq!(json["success"], true);
}

#[tokio::test]
async fn delete_requires_correct_password_and_deactivates_memberships() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let owner = authenticated_cookie(&pool, &app, "owner@example.com", "Password123").await;
    let company_id = create_and_activate_company(&app, &owner, "Acme").await;
    let owner_id = db::users::find_by_email(&pool, "owner@example.com")
        .await
        .unwrap()
        .unwrap()
        .id;

    let body = serde_json::json!({ "password": "WrongPassword" });
    let (_, json) = send(
        &app,
        json_request("DELETE", &format!("/api/companies/{company_id}"), Some(&owner), &body),
    )
    .await;
    assert_eq!(json["success"], false);

    let body = serde_json::json!({ "password": "Password123" });
    let (_, json) = send(
        &app,
        json_request("DELETE", &format!("/api/companies/{company_id}"), Some(&owner), &body),
    )
    .await;
    assert_eq!(json["success"], true);

    let active = db::memberships::count_active_for_user(&pool, UserId::new(owner_id))
        .await
        .unwrap();
    assert_eq!(active, 0);

    let (_, json) = send(&app, empty_request("GET", "/api/companies", Some(&owner))).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn activation_keeps_exactly_one_active_membership() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let cookie = authenticated_cookie(&pool, &app, "switcher@example.com", "Password123").await;
    let user_id = db::users::find_by_email(&pool, "switcher@example.com")
        .await
        .unwrap()
        .unwrap()
        .id;

    let first = create_and_activate_company(&app, &cookie, "First").await;
    let second = create_and_activate_company(&app, &cookie, "Second").await;

    let user_id = UserId::new(user_id);
    assert_eq!(db::memberships::count_active_for_user(&pool, user_id).await.unwrap(), 1);
    assert_eq!(
        db::memberships::find_active_company(&pool, user_id).await.unwrap(),
        Some(CompanyId::new(second))
    );

    let (_, json) = send(
        &app,
        empty_request("POST", &format!("/api/companies/{first}/activate"), Some(&cookie)),
    )
    .await;
    assert_eq!(json["success"], true);
    assert_eq!(db::memberships::count_active_for_user(&pool, user_id).await.unwrap(), 1);
    assert_eq!(
        db::memberships::find_active_company(&pool, user_id).await.unwrap(),
        Some(CompanyId::new(first))
    );
}

#[tokio::test]
async fn activating_a_company_without_membership_fails() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let owner = authenticated_cookie(&pool, &app, "owner@example.com", "Password123").await;
    let company_id = create_and_activate_company(&app, &owner, "Acme").await;

    let stranger = authenticated_cookie(&pool, &app, "other@example.com", "Password123").await;
    let (_, json) = send(
        &app,
        empty_request("POST", &format!("/api/companies/{company_id}/activate"), Some(&stranger)),
    )
    .await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn member_listing_is_role_gated() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let owner = authenticated_cookie(&pool, &app, "owner@example.com", "Password123").await;
    let company_id = create_and_activate_company(&app, &owner, "Acme").await;

    let hr_id = create_user(&pool, "Harriet", "hr@example.com", "Password123").await;
    add_active_member(&pool, company_id, hr_id, CompanyRole::Hr).await;
    let plain_id = create_user(&pool, "Pat", "plain@example.com", "Password123").await;
    add_active_member(&pool, company_id, plain_id, CompanyRole::Employee).await;

    // Manager sees everyone, ordered manager, hr, then the rest.
    let (_, json) = send(
        &app,
        empty_request("GET", &format!("/api/companies/{company_id}/users"), Some(&owner)),
    )
    .await;
    assert_eq!(json["success"], true);
    let users = json["data"]["users"].as_array().unwrap();
    assert_eq!(users.len(), 3);
    assert_eq!(users[0]["user_role"], "manager");
    assert_eq!(users[1]["user_role"], "hr");
    assert_eq!(users[2]["user_role"], "employee");

    // A plain employee sees only their own row.
    let plain = login_cookie(&app, "plain@example.com", "Password123").await;
    let (_, json) = send(
        &app,
        empty_request("GET", &format!("/api/companies/{company_id}/users"), Some(&plain)),
    )
    .await;
    let users = json["data"]["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["user_email"], "plain@example.com");
    assert_eq!(json["data"]["current_user_role"], "employee");
}
