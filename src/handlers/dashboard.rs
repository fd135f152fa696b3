use axum::extract::{Path, State};
use axum::response::Json;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::error;

use crate::date_utils::ReportWindow;
use crate::db::queries::transactions::{self, TransactionFilter};
use crate::error::AppResult;
use crate::models::{TransactionKind, TransactionWithCategory};
use crate::services::report::{assemble_dashboard, DashboardReport};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(flatten)]
    pub dashboard: DashboardReport,
    pub recent_incomes: Vec<TransactionWithCategory>,
    pub recent_expenses: Vec<TransactionWithCategory>,
    pub recent_degraded: bool,
}

/// The latest incomes and expenses, newest first. The pooled connection is
/// released before returning.
fn recent_transactions(
    state: &AppState,
    user_id: i64,
) -> AppResult<(Vec<TransactionWithCategory>, Vec<TransactionWithCategory>)> {
    let conn = state.db.get()?;
    let recent = |kind| TransactionFilter {
        kind: Some(kind),
        limit: Some(state.config.recent_limit),
        ..TransactionFilter::for_user(user_id)
    };
    Ok((
        transactions::list_transactions(&conn, &recent(TransactionKind::Income))?,
        transactions::list_transactions(&conn, &recent(TransactionKind::Expense))?,
    ))
}

pub async fn index(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Json<DashboardResponse> {
    let today = state.today();
    let days = state.config.dashboard_days;

    let (recent_incomes, recent_expenses, recent_degraded) =
        match recent_transactions(&state, user_id) {
            Ok((incomes, expenses)) => (incomes, expenses, false),
            Err(e) => {
                error!(user_id, error = %e, "Recent transactions failed, serving empty lists");
                (Vec::new(), Vec::new(), true)
            }
        };

    let bounds = ReportWindow::rolling_days(days, today).inclusive_bounds();
    let dashboard = assemble_dashboard(&state.source(), user_id, today, days);

    Json(DashboardResponse {
        from: bounds.map(|(from, _)| from),
        to: bounds.map(|(_, to)| to),
        dashboard,
        recent_incomes,
        recent_expenses,
        recent_degraded,
    })
}
