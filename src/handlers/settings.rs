use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::CurrentUser;
use crate::date_utils::{Month, MonthParseError};
use crate::db::queries::settings;
use crate::error::{AppError, AppResult};
use crate::handlers::{DateParams, JsonBody, QueryParams};
use crate::models::money;
use crate::models::{BudgetSettings, NewBudgetSettings};
use crate::services::overview::{resolve_settings, OverviewRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsInput {
    pub income: f64,
    pub needs_percentage: f64,
    pub wants_percentage: f64,
    pub savings_percentage: f64,
    /// `YYYY-MM`
    pub effective_at: String,
}

impl SettingsInput {
    fn to_new_settings(&self) -> AppResult<NewBudgetSettings> {
        let income_cents = money::to_cents(self.income)
            .ok_or_else(|| AppError::Validation("Invalid income".into()))?;

        for (field, value) in [
            ("needsPercentage", self.needs_percentage),
            ("wantsPercentage", self.wants_percentage),
            ("savingsPercentage", self.savings_percentage),
        ] {
            if !value.is_finite() {
                return Err(AppError::Validation(format!("Invalid {}", field)));
            }
        }

        let effective_at: Month = self
            .effective_at
            .trim()
            .parse()
            .map_err(|e: MonthParseError| AppError::Validation(e.to_string()))?;

        Ok(NewBudgetSettings {
            income_cents,
            needs_percentage: self.needs_percentage,
            wants_percentage: self.wants_percentage,
            savings_percentage: self.savings_percentage,
            effective_at,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    /// `null` when no version is effective for the requested month.
    pub settings: Option<BudgetSettings>,
}

/// The settings version effective in `?date=YYYY-MM` (default: current month).
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    QueryParams(params): QueryParams<DateParams>,
) -> AppResult<Json<SettingsResponse>> {
    let request = OverviewRequest::parse(params.date.as_deref(), state.clock.today())?;
    let conn = state.db.get()?;

    let resolved = resolve_settings(&*conn, user.id, request.month)?;
    debug!(user_id = user.id, month = %request.month, "Loaded budget settings");

    Ok(Json(SettingsResponse {
        settings: resolved.into_option(),
    }))
}

#[derive(Debug, Serialize)]
pub struct SettingsHistory {
    pub settings: Vec<BudgetSettings>,
}

/// Every settings version of the user, oldest first.
pub async fn history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<SettingsHistory>> {
    let conn = state.db.get()?;
    let versions = settings::list_settings(&conn, user.id)?;
    Ok(Json(SettingsHistory { settings: versions }))
}

/// Add a settings version. An existing version for the same month is replaced.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(input): JsonBody<SettingsInput>,
) -> AppResult<(StatusCode, Json<SettingsResponse>)> {
    let new_settings = input.to_new_settings()?;

    let mut conn = state.db.get()?;
    let tx = conn.transaction()?;
    let id = settings::replace_settings(&tx, user.id, &new_settings)?;
    let stored = settings::get_settings_effective_in(&tx, user.id, new_settings.effective_at)?;
    tx.commit()?;

    info!(
        user_id = user.id,
        settings_id = id,
        month = %new_settings.effective_at,
        "Budget settings saved"
    );
    Ok((StatusCode::CREATED, Json(SettingsResponse { settings: stored })))
}
