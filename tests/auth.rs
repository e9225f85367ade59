//! Integration tests for login, logout and user preferences.

mod common;

use crate::common::*;

#[tokio::test]
async fn login_with_wrong_password_fails_without_a_cookie() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    create_user(&pool, "Test User", "user@example.com", "Password123").await;

    let body = serde_json::json!({ "email": "user@example.com", "password": "WrongPassword" });
    let response = tower::ServiceExt::oneshot(
        app.clone(),
        json_request("POST", "/api/login", None, &body),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), http::StatusCode::OK);
    assert!(response.headers().get("set-cookie").is_none());
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let cookie = authenticated_cookie(&pool, &app, "user@example.com", "Password123").await;

    let (status, _) = send(&app, empty_request("GET", "/api/companies", Some(&cookie))).await;
    assert_eq!(status, http::StatusCode::OK);

    let (status, _) = send(&app, empty_request("POST", "/api/logout", Some(&cookie))).await;
    assert_eq!(status, http::StatusCode::OK);

    let (status, _) = send(&app, empty_request("GET", "/api/companies", Some(&cookie))).await;
    assert_eq!(status, http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn preferences_round_trip_with_validation() {
    let pool = test_pool().await;
    let app = test_router(pool.clone());
    let cookie = authenticated_cookie(&pool, &app, "user@example.com", "Password123").await;

    let (_, json) = send(&app, empty_request("GET", "/api/preferences", Some(&cookie))).await;
    assert_eq!(json["data"]["theme"], 0);
    assert_eq!(json["data"]["user_lang"], "en");

    let body = serde_json::json!({ "theme": 1, "user_lang": "de" });
    let (_, json) = send(&app, json_request("PUT", "/api/preferences", Some(&cookie), &body)).await;
    assert_eq!(json["success"], true);

    let (_, json) = send(&app, empty_request("GET", "/api/preferences", Some(&cookie))).await;
    assert_eq!(json["data"]["theme"], 1);
    assert_eq!(json["data"]["user_lang"], "de");

    let body = serde_json::json!({ "theme": 5, "user_lang": "german" });
    let (_, json) = send(&app, json_request("PUT", "/api/preferences", Some(&cookie), &body)).await;
    assert_eq!(json["success"], false);
    assert!(json["errors"]["theme"][0].is_string());
    assert!(json["errors"]["user_lang"][0].is_string());
}
