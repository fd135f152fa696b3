//! The query contract the reporting engine reads through.
//!
//! Aggregation code only sees [`TransactionSource`], so the SQLite store can
//! be replaced by an in-memory double in tests.

use crate::date_utils::ReportWindow;
use crate::db::queries::reports;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{CategoryTotal, DailyNetChange, PeriodTotals, TransactionKind};

pub trait TransactionSource {
    /// Per-category totals of one kind within the window.
    fn sum_by_category(
        &self,
        user_id: i64,
        kind: TransactionKind,
        window: &ReportWindow,
    ) -> AppResult<Vec<CategoryTotal>>;

    /// Net change (income − expense) per day with activity in the window.
    fn net_change_by_date(
        &self,
        user_id: i64,
        window: &ReportWindow,
    ) -> AppResult<Vec<DailyNetChange>>;

    fn totals(&self, user_id: i64, window: &ReportWindow) -> AppResult<PeriodTotals>;
}

/// [`TransactionSource`] over the application's SQLite pool. Each query
/// checks out its own connection and releases it before returning.
#[derive(Clone)]
pub struct SqliteSource {
    pool: DbPool,
}

impl SqliteSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl TransactionSource for SqliteSource {
    fn sum_by_category(
        &self,
        user_id: i64,
        kind: TransactionKind,
        window: &ReportWindow,
    ) -> AppResult<Vec<CategoryTotal>> {
        let Some((start, end)) = window.bounds() else {
            return Ok(Vec::new());
        };
        let conn = self.pool.get()?;
        Ok(reports::sum_by_category(&conn, user_id, kind, start, end)?)
    }

    fn net_change_by_date(
        &self,
        user_id: i64,
        window: &ReportWindow,
    ) -> AppResult<Vec<DailyNetChange>> {
        let Some((start, end)) = window.bounds() else {
            return Ok(Vec::new());
        };
        let conn = self.pool.get()?;
        Ok(reports::net_change_by_date(&conn, user_id, start, end)?)
    }

    fn totals(&self, user_id: i64, window: &ReportWindow) -> AppResult<PeriodTotals> {
        let Some((start, end)) = window.bounds() else {
            return Ok(PeriodTotals::default());
        };
        let conn = self.pool.get()?;
        Ok(reports::totals(&conn, user_id, start, end)?)
    }
}
