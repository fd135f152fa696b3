//! Aggregate queries behind the reporting engine. Every query is scoped to
//! one user and a half-open `[start, end)` date interval.

use crate::models::{CategoryTotal, DailyNetChange, PeriodTotals, TransactionKind};
use chrono::NaiveDate;
use rusqlite::{params, Connection};

/// Per-category sums for one kind, largest first. Transactions whose
/// category no longer resolves fall out through the inner join.
pub fn sum_by_category(
    conn: &Connection,
    user_id: i64,
    kind: TransactionKind,
    start: NaiveDate,
    end: NaiveDate,
) -> rusqlite::Result<Vec<CategoryTotal>> {
    let mut stmt = conn.prepare(
        "SELECT c.name, SUM(t.amount_cents) AS total
         FROM transactions t
         JOIN categories c ON t.category_id = c.id
         WHERE t.user_id = ? AND t.kind = ? AND t.date >= ? AND t.date < ?
         GROUP BY c.name
         ORDER BY total DESC, c.name ASC",
    )?;

    let rows = stmt
        .query_map(params![user_id, kind, start, end], |row| {
            Ok(CategoryTotal {
                category_name: row.get(0)?,
                total_cents: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Income minus expense per day, ascending, only for days with activity.
pub fn net_change_by_date(
    conn: &Connection,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> rusqlite::Result<Vec<DailyNetChange>> {
    let mut stmt = conn.prepare(
        "SELECT date,
                SUM(CASE WHEN kind = 'income' THEN amount_cents ELSE -amount_cents END)
         FROM transactions
         WHERE user_id = ? AND date >= ? AND date < ?
         GROUP BY date
         ORDER BY date ASC",
    )?;

    let rows = stmt
        .query_map(params![user_id, start, end], |row| {
            Ok(DailyNetChange {
                date: row.get(0)?,
                net_cents: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

pub fn totals(
    conn: &Connection,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> rusqlite::Result<PeriodTotals> {
    conn.query_row(
        "SELECT COALESCE(SUM(CASE WHEN kind = 'income' THEN amount_cents END), 0),
                COALESCE(SUM(CASE WHEN kind = 'expense' THEN amount_cents END), 0)
         FROM transactions
         WHERE user_id = ? AND date >= ? AND date < ?",
        params![user_id, start, end],
        |row| {
            Ok(PeriodTotals {
                income_cents: row.get(0)?,
                expense_cents: row.get(1)?,
            })
        },
    )
}
