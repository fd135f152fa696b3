use axum::extract::{Path, State};
use axum::response::Json;

use crate::db::queries::recurring;
use crate::error::AppResult;
use crate::models::{Installment, Subscription};
use crate::state::AppState;

pub async fn subscriptions(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Subscription>>> {
    let conn = state.db.get()?;
    Ok(Json(recurring::list_subscriptions(&conn, user_id)?))
}

pub async fn installments(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Installment>>> {
    let conn = state.db.get()?;
    Ok(Json(recurring::list_installments(&conn, user_id)?))
}
