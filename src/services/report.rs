//! Composes the aggregations into the payloads served to report and
//! dashboard views.
//!
//! Reporting is best-effort: a failing transaction source never surfaces as
//! an error here. The failure is logged and the caller receives an empty
//! payload flagged as degraded, so "nothing happened in this window" and
//! "the store could not be read" stay distinguishable.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, error};

use crate::date_utils::ReportWindow;
use crate::error::AppResult;
use crate::models::{
    PeriodComparison, PeriodTotals, ReportOutcome, ReportPayload, TransactionKind,
};
use crate::services::balance_series::build_balance_series;
use crate::services::comparison::{compare, normalize_totals, period_totals};
use crate::services::distribution::category_distribution;
use crate::services::flow_graph::build_flow_edges;
use crate::source::TransactionSource;

/// A report payload plus the totals of the preceding window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodReport {
    #[serde(flatten)]
    pub outcome: ReportOutcome,
    pub comparison: PeriodComparison,
}

/// Totals for one day against the day before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub comparison: PeriodComparison,
    pub degraded: bool,
}

/// Income and expense for the calendar month containing today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub year: i32,
    pub month: u32,
    #[serde(flatten)]
    pub totals: PeriodTotals,
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub report: ReportOutcome,
    pub daily_summary: DailySummary,
    pub current_month: MonthTotals,
}

/// Builds the full payload for `user_id` over `window`.
pub fn assemble<S>(source: &S, user_id: i64, window: &ReportWindow) -> ReportOutcome
where
    S: TransactionSource + ?Sized,
{
    match try_assemble(source, user_id, window) {
        Ok(payload) => {
            debug!(
                user_id,
                categories = payload.category_distribution.len(),
                balance_points = payload.balance_series.len(),
                flow_edges = payload.flow_edges.len(),
                "Report assembled"
            );
            ReportOutcome::complete(payload)
        }
        Err(e) => {
            error!(user_id, ?window, error = %e, "Report aggregation failed, serving empty report");
            ReportOutcome::degraded()
        }
    }
}

fn try_assemble<S>(source: &S, user_id: i64, window: &ReportWindow) -> AppResult<ReportPayload>
where
    S: TransactionSource + ?Sized,
{
    let income_totals = source.sum_by_category(user_id, TransactionKind::Income, window)?;
    let expense_totals = source.sum_by_category(user_id, TransactionKind::Expense, window)?;
    let net_changes = source.net_change_by_date(user_id, window)?;
    let totals = source.totals(user_id, window)?;

    Ok(ReportPayload {
        category_distribution: category_distribution(expense_totals.clone()),
        balance_series: build_balance_series(net_changes),
        period_totals: normalize_totals(totals),
        flow_edges: build_flow_edges(income_totals, expense_totals),
    })
}

/// [`assemble`] plus a comparison with the preceding window of the same
/// granularity. A failure on either side degrades the whole report.
pub fn assemble_period_report<S>(source: &S, user_id: i64, window: &ReportWindow) -> PeriodReport
where
    S: TransactionSource + ?Sized,
{
    let outcome = assemble(source, user_id, window);
    if outcome.degraded {
        return PeriodReport {
            outcome,
            comparison: PeriodComparison::default(),
        };
    }

    match period_totals(source, user_id, &window.previous()) {
        Ok(previous) => PeriodReport {
            comparison: PeriodComparison {
                current: outcome.payload.period_totals,
                previous,
            },
            outcome,
        },
        Err(e) => {
            error!(user_id, ?window, error = %e, "Previous period totals failed, serving empty report");
            PeriodReport {
                outcome: ReportOutcome::degraded(),
                comparison: PeriodComparison::default(),
            }
        }
    }
}

/// Dashboard view: the report over the last `days` days up to `today`, the
/// daily summary for `today` against yesterday, and the totals of the
/// current calendar month. Each part degrades on its own.
pub fn assemble_dashboard<S>(source: &S, user_id: i64, today: NaiveDate, days: i64) -> DashboardReport
where
    S: TransactionSource + ?Sized,
{
    let window = ReportWindow::rolling_days(days, today);
    let report = assemble(source, user_id, &window);

    let daily_summary = match compare(source, user_id, &ReportWindow::single_day(today)) {
        Ok(comparison) => DailySummary {
            date: today,
            comparison,
            degraded: false,
        },
        Err(e) => {
            error!(user_id, %today, error = %e, "Daily summary failed, serving zero totals");
            DailySummary {
                date: today,
                comparison: PeriodComparison::default(),
                degraded: true,
            }
        }
    };

    let (totals, degraded) = match period_totals(source, user_id, &ReportWindow::month_of(today)) {
        Ok(totals) => (totals, false),
        Err(e) => {
            error!(user_id, %today, error = %e, "Current month totals failed, serving zero totals");
            (PeriodTotals::default(), true)
        }
    };
    let current_month = MonthTotals {
        year: today.year(),
        month: today.month(),
        totals,
        degraded,
    };

    DashboardReport {
        report,
        daily_summary,
        current_month,
    }
}
