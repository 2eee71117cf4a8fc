use axum::extract::State;
use axum::response::Json;

use crate::auth::CurrentUser;
use crate::error::AppResult;
use crate::handlers::{DateParams, QueryParams};
use crate::models::Overview;
use crate::services::compute_overview;
use crate::state::AppState;

/// Budget overview for `?date=YYYY-MM`, defaulting to the current month.
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    QueryParams(params): QueryParams<DateParams>,
) -> AppResult<Json<Overview>> {
    let mut conn = state.db.get()?;
    // One read transaction so settings and both transaction sets come from
    // the same snapshot.
    let tx = conn.transaction()?;
    let overview = compute_overview(&*tx, state.clock.as_ref(), &user, params.date.as_deref())?;
    tx.commit()?;

    Ok(Json(overview))
}
