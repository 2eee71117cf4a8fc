//! Bearer-token authentication.
//!
//! Users log in with their phone number and password and receive a random
//! token. Tokens live in a server-side session store with an expiry and are
//! invalidated on logout or server restart. Passwords are stored as Argon2
//! hashes.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::async_trait;
use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::queries::users;
use crate::error::{AppError, AppResult};
use crate::handlers::JsonBody;
use crate::models::User;
use crate::state::AppState;

/// The authenticated user, placed in request extensions by [`auth_middleware`].
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Reject requests without a valid bearer token and attach the user to the rest.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        debug!(path = %request.uri().path(), "Request without bearer token");
        return AppError::Unauthorized.into_response();
    };

    let Some(user_id) = state.session_user(token) else {
        warn!(path = %request.uri().path(), "Rejected unknown or expired token");
        return AppError::Unauthorized.into_response();
    };

    let user = match load_user(&state, user_id) {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(user_id, "Session refers to a missing user");
            return AppError::Unauthorized.into_response();
        }
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(CurrentUser(user));
    next.run(request).await
}

fn load_user(state: &AppState, user_id: i64) -> AppResult<Option<User>> {
    let conn = state.db.get()?;
    Ok(users::get_user(&conn, user_id)?)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub phone_number: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Exchange a phone number and password for a bearer token.
pub async fn issue_token(
    State(state): State<AppState>,
    JsonBody(login): JsonBody<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let conn = state.db.get()?;
    let user = users::get_user_by_phone(&conn, login.phone_number.trim())?;

    let Some(user) = user.filter(|u| verify_password(&login.password, &u.password_hash)) else {
        warn!("Failed login attempt");
        return Err(AppError::Unauthorized);
    };

    let token = Uuid::new_v4().to_string();
    let session = state.open_session(user.id, token.clone());
    info!(user_id = user.id, "Issued session token");

    Ok(Json(TokenResponse {
        token,
        expires_at: session.expires_at,
    }))
}

/// Invalidate the token the request was made with.
pub async fn revoke_token(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        if state.close_session(token) {
            info!("Revoked session token");
        }
    }
    StatusCode::NO_CONTENT
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| AppError::Internal(format!("Salt error: {}", e)))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing error: {}", e)))
}

/// Verify a password against an Argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        tracing::error!("Invalid password hash format in users table");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
