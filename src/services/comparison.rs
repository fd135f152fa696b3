use crate::date_utils::ReportWindow;
use crate::error::AppResult;
use crate::models::{PeriodComparison, PeriodTotals};
use crate::source::TransactionSource;

/// Clamps totals at zero; amounts are recorded positive, so a negative sum
/// can only come from a misbehaving source.
pub fn normalize_totals(totals: PeriodTotals) -> PeriodTotals {
    PeriodTotals {
        income_cents: totals.income_cents.max(0),
        expense_cents: totals.expense_cents.max(0),
    }
}

pub fn period_totals<S>(source: &S, user_id: i64, window: &ReportWindow) -> AppResult<PeriodTotals>
where
    S: TransactionSource + ?Sized,
{
    source.totals(user_id, window).map(normalize_totals)
}

/// Totals of `window` against the window immediately before it: month
/// against month, day against day.
pub fn compare<S>(source: &S, user_id: i64, window: &ReportWindow) -> AppResult<PeriodComparison>
where
    S: TransactionSource + ?Sized,
{
    Ok(PeriodComparison {
        current: period_totals(source, user_id, window)?,
        previous: period_totals(source, user_id, &window.previous())?,
    })
}
