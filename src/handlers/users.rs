use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use tracing::{debug, info};

use crate::auth::{hash_password, CurrentUser};
use crate::db::queries::users;
use crate::error::{AppError, AppResult};
use crate::handlers::JsonBody;
use crate::models::{NewUser, User};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

impl NewUser {
    fn validate(&self) -> AppResult<()> {
        for (field, value) in [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("phoneNumber", &self.phone_number),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{} is required", field)));
            }
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(new_user): JsonBody<NewUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    new_user.validate()?;
    let phone_number = new_user.phone_number.trim();
    debug!("Registering user");

    let mut conn = state.db.get()?;
    let tx = conn.transaction()?;

    if users::get_user_by_phone(&tx, phone_number)?.is_some() {
        return Err(AppError::Conflict(
            "A user with this phone number already exists".into(),
        ));
    }

    let password_hash = hash_password(&new_user.password)?;
    let id = users::create_user(
        &tx,
        new_user.first_name.trim(),
        new_user.last_name.trim(),
        phone_number,
        &password_hash,
    )?;
    let user = users::get_user(&tx, id)?
        .ok_or_else(|| AppError::Internal(format!("User {} vanished after insert", id)))?;

    tx.commit()?;
    info!(user_id = id, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
