pub mod overview;
pub mod recurring_transactions;
pub mod settings;
pub mod transactions;
pub mod users;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::middleware;
use axum::response::Json;
use axum::routing::{delete, get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth;
use crate::error::AppError;
use crate::state::AppState;

/// `Json` extractor whose rejections use the API's error format.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// `Query` extractor whose rejections use the API's error format.
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Optional `?date=YYYY-MM` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
    pub date: Option<String>,
}

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/api/v1/", get(api_index))
        .route("/api/v1/users", post(users::register))
        .route("/api/v1/tokens", post(auth::issue_token))
        .route("/health", get(health));

    let protected = Router::new()
        .route("/api/v1/tokens/current", delete(auth::revoke_token))
        .route("/api/v1/users/me", get(users::me))
        // Budget settings
        .route(
            "/api/v1/settings",
            get(settings::show).post(settings::create),
        )
        .route("/api/v1/settings/history", get(settings::history))
        // One-time transactions
        .route(
            "/api/v1/transactions",
            get(transactions::index).post(transactions::create),
        )
        .route(
            "/api/v1/transactions/:id",
            get(transactions::show)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        // Recurring transactions
        .route(
            "/api/v1/recurring-transactions",
            get(recurring_transactions::index).post(recurring_transactions::create),
        )
        .route(
            "/api/v1/recurring-transactions/:id",
            get(recurring_transactions::show)
                .put(recurring_transactions::update)
                .delete(recurring_transactions::delete),
        )
        // Overview
        .route("/api/v1/overview", get(overview::show))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    public.merge(protected)
}

async fn health() -> &'static str {
    "OK"
}

async fn api_index() -> Json<Value> {
    Json(json!({ "message": "success" }))
}
