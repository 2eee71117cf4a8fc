//! Shared test utilities for integration tests.
//!
//! `TestClient` drives the full router (auth middleware included) against a
//! fresh in-memory database with the clock pinned to 2024-06-10.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use budgeteer::clock::{Clock, FixedClock};
use budgeteer::config::Config;
use budgeteer::db::{create_in_memory_pool, migrations, DbPool};
use budgeteer::server;
use budgeteer::state::AppState;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "correct horse battery";

pub struct TestClient {
    state: AppState,
}

impl TestClient {
    /// A client whose clock reads 2024-06-10.
    pub fn new() -> Self {
        Self::with_clock(FixedClock::on(2024, 6, 10).unwrap())
    }

    pub fn with_clock(clock: FixedClock) -> Self {
        Self::build(clock, 24)
    }

    /// A client whose sessions expire the moment they are issued.
    pub fn with_expired_sessions() -> Self {
        Self::with_session_ttl_hours(0)
    }

    pub fn with_session_ttl_hours(hours: i64) -> Self {
        Self::build(FixedClock::on(2024, 6, 10).unwrap(), hours)
    }

    fn build(clock: FixedClock, session_ttl_hours: i64) -> Self {
        let pool = create_in_memory_pool().expect("Failed to create in-memory pool");
        {
            let conn = pool.get().expect("Failed to get connection");
            migrations::run_migrations(&conn, Path::new("migrations"))
                .expect("Failed to run migrations");
        }

        let config = Config {
            host: "127.0.0.1".into(),
            port: 7070,
            database_path: PathBuf::from(":memory:"),
            migrations_path: PathBuf::from("migrations"),
            session_ttl_hours,
        };

        let clock: Arc<dyn Clock> = Arc::new(clock);
        Self {
            state: AppState::new(pool, config, clock),
        }
    }

    pub fn router(&self) -> Router {
        server::router(self.state.clone())
    }

    pub fn db(&self) -> &DbPool {
        &self.state.db
    }

    /// Send a request and return status and the body parsed as JSON
    /// (`Value::Null` for an empty body).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).to_string())
            })
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn register(&self, first_name: &str, phone_number: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/api/v1/users",
            None,
            Some(json!({
                "firstName": first_name,
                "lastName": "Tester",
                "phoneNumber": phone_number,
                "password": TEST_PASSWORD,
            })),
        )
        .await
    }

    pub async fn login(&self, phone_number: &str, password: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/api/v1/tokens",
            None,
            Some(json!({ "phoneNumber": phone_number, "password": password })),
        )
        .await
    }

    /// Register a user and return a bearer token for them.
    pub async fn register_and_login(&self, first_name: &str, phone_number: &str) -> String {
        let (status, _) = self.register(first_name, phone_number).await;
        assert_eq!(status, StatusCode::CREATED, "registration failed");

        let (status, body) = self.login(phone_number, TEST_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn save_settings(
        &self,
        token: &str,
        income: f64,
        percentages: (f64, f64, f64),
        effective_at: &str,
    ) -> (StatusCode, Value) {
        self.post(
            "/api/v1/settings",
            token,
            json!({
                "income": income,
                "needsPercentage": percentages.0,
                "wantsPercentage": percentages.1,
                "savingsPercentage": percentages.2,
                "effectiveAt": effective_at,
            }),
        )
        .await
    }

    /// Create one transaction and return its id.
    pub async fn create_transaction(
        &self,
        token: &str,
        name: &str,
        category: &str,
        price: f64,
        created_at: &str,
    ) -> i64 {
        let (status, body) = self
            .post(
                "/api/v1/transactions",
                token,
                json!({ "transactions": [{
                    "name": name,
                    "category": category,
                    "price": price,
                    "createdAt": created_at,
                }]}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create transaction failed: {body}");
        body["transactions"][0]["id"].as_i64().unwrap()
    }

    /// Create one recurring transaction and return its id.
    pub async fn create_recurring(
        &self,
        token: &str,
        name: &str,
        category: &str,
        price: f64,
        effective_at: &str,
    ) -> i64 {
        let (status, body) = self
            .post(
                "/api/v1/recurring-transactions",
                token,
                json!({ "transactions": [{
                    "name": name,
                    "category": category,
                    "price": price,
                    "effectiveAt": effective_at,
                }]}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create recurring failed: {body}");
        body["recurringTransactions"][0]["id"].as_i64().unwrap()
    }
}
