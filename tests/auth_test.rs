//! Integration tests for registration and bearer-token sessions.

mod common;

use axum::http::{Method, StatusCode};
use common::{TestClient, TEST_PASSWORD};
use serde_json::json;

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let client = TestClient::new();

    let (status, body) = client.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");

    let (status, body) = client.request(Method::GET, "/api/v1/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let client = TestClient::new();
    let (status, body) = client.request(Method::GET, "/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("/nope"));
}

#[tokio::test]
async fn test_register_hides_password() {
    let client = TestClient::new();
    let (status, body) = client.register("Ada", "+15550001").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["firstName"], "Ada");
    assert_eq!(body["phoneNumber"], "+15550001");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_duplicate_phone_number_conflicts() {
    let client = TestClient::new();
    client.register("Ada", "+15550001").await;
    let (status, _) = client.register("Imposter", "+15550001").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validates_input() {
    let client = TestClient::new();
    let (status, _) = client
        .request(
            Method::POST,
            "/api/v1/users",
            None,
            Some(json!({
                "firstName": "Ada",
                "lastName": "Tester",
                "phoneNumber": "+15550001",
                "password": "short",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = client
        .request(
            Method::POST,
            "/api/v1/users",
            None,
            Some(json!({ "firstName": "Ada" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_wrong_password_fails() {
    let client = TestClient::new();
    client.register("Ada", "+15550001").await;

    let (status, _) = client.login("+15550001", "wrong password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = client.login("+15559999", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_identifies_user() {
    let client = TestClient::new();
    let token = client.register_and_login("Ada", "+15550001").await;

    let (status, body) = client.get("/api/v1/users/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstName"], "Ada");
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let client = TestClient::new();
    let token = client.register_and_login("Ada", "+15550001").await;

    let (status, _) = client.delete("/api/v1/tokens/current", &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = client.get("/api/v1/users/me", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_token_is_rejected() {
    let client = TestClient::new();
    let (status, _) = client.get("/api/v1/users/me", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let client = TestClient::with_expired_sessions();
    client.register("Ada", "+15550001").await;

    let (status, body) = client.login("+15550001", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();

    let (status, _) = client.get("/api/v1/users/me", token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_oversized_session_ttl_is_capped() {
    let client = TestClient::with_session_ttl_hours(i64::MAX);
    client.register("Ada", "+15550001").await;

    let (status, body) = client.login("+15550001", TEST_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    // Clock reads 2024-06-10T12:00:00Z; the cap is one year.
    assert_eq!(body["expiresAt"], "2025-06-10T12:00:00Z");

    let token = body["token"].as_str().unwrap();
    let (status, _) = client.get("/api/v1/users/me", token).await;
    assert_eq!(status, StatusCode::OK);
}
