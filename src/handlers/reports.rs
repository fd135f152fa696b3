use axum::extract::{Path, Query, State};
use axum::response::Json;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::date_utils::{ReportWindow, WindowPolicy, WindowRequest};
use crate::services::report::{assemble_period_report, PeriodReport};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<i32>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(flatten)]
    pub report: PeriodReport,
}

impl ReportResponse {
    fn new(window: ReportWindow, report: PeriodReport) -> Self {
        let (year, month) = match window {
            ReportWindow::Month { year, month } => (Some(year), Some(month)),
            ReportWindow::Range { .. } => (None, None),
        };
        let bounds = window.inclusive_bounds();
        Self {
            year,
            month,
            from: bounds.map(|(from, _)| from),
            to: bounds.map(|(_, to)| to),
            report,
        }
    }
}

/// Report for one month (or an explicit date range). Never fails on bad
/// period input; a broken store shows up as `degraded: true`.
///
/// The query is taken as raw pairs so repeated keys cannot fail extraction.
pub async fn show(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<Vec<(String, String)>>,
) -> Json<ReportResponse> {
    let window =
        WindowRequest::from_query(&query).resolve(WindowPolicy::CurrentMonth, state.today());
    debug!(user_id, ?window, "Building report");

    let report = assemble_period_report(&state.source(), user_id, &window);
    Json(ReportResponse::new(window, report))
}
