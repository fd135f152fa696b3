use crate::models::{NewTransaction, Transaction, TransactionKind, TransactionWithCategory};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, trace};

pub struct TransactionFilter {
    pub user_id: i64,
    pub kind: Option<TransactionKind>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub limit: Option<i64>,
}

impl TransactionFilter {
    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id,
            kind: None,
            from_date: None,
            to_date: None,
            limit: None,
        }
    }
}

const SELECT_WITH_CATEGORY: &str =
    "SELECT t.id, t.user_id, t.category_id, t.kind, t.amount_cents, t.date,
            t.description, t.created_at, c.name
     FROM transactions t
     JOIN categories c ON t.category_id = c.id";

fn map_row(row: &Row<'_>) -> rusqlite::Result<TransactionWithCategory> {
    Ok(TransactionWithCategory {
        transaction: Transaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            category_id: row.get(2)?,
            kind: row.get(3)?,
            amount_cents: row.get(4)?,
            date: row.get(5)?,
            description: row.get(6)?,
            created_at: row.get(7)?,
        },
        category_name: row.get(8)?,
    })
}

/// Lists a user's transactions, newest first. `to_date` is inclusive.
pub fn list_transactions(
    conn: &Connection,
    filter: &TransactionFilter,
) -> rusqlite::Result<Vec<TransactionWithCategory>> {
    let mut sql = format!("{SELECT_WITH_CATEGORY} WHERE t.user_id = ?");
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(filter.user_id)];

    if let Some(kind) = filter.kind {
        sql.push_str(" AND t.kind = ?");
        params_vec.push(Box::new(kind));
    }
    if let Some(from_date) = filter.from_date {
        sql.push_str(" AND t.date >= ?");
        params_vec.push(Box::new(from_date));
    }
    if let Some(to_date) = filter.to_date {
        sql.push_str(" AND t.date <= ?");
        params_vec.push(Box::new(to_date));
    }

    sql.push_str(" ORDER BY t.date DESC, t.created_at DESC, t.id DESC");

    if let Some(limit) = filter.limit {
        sql.push_str(" LIMIT ?");
        params_vec.push(Box::new(limit));
    }

    let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let transactions = stmt
        .query_map(params_refs.as_slice(), map_row)?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        user_id = filter.user_id,
        count = transactions.len(),
        "Listed transactions"
    );
    Ok(transactions)
}

pub fn get_transaction(
    conn: &Connection,
    user_id: i64,
    id: i64,
) -> rusqlite::Result<Option<TransactionWithCategory>> {
    trace!(user_id, transaction_id = id, "Fetching transaction");
    conn.query_row(
        &format!("{SELECT_WITH_CATEGORY} WHERE t.id = ? AND t.user_id = ?"),
        params![id, user_id],
        map_row,
    )
    .optional()
}

pub fn create_transaction(conn: &Connection, transaction: &NewTransaction) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO transactions (user_id, category_id, kind, amount_cents, date, description)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            transaction.user_id,
            transaction.category_id,
            transaction.kind,
            transaction.amount_cents,
            transaction.date,
            transaction.description,
        ],
    )?;

    let id = conn.last_insert_rowid();
    debug!(
        transaction_id = id,
        user_id = transaction.user_id,
        kind = %transaction.kind,
        amount_cents = transaction.amount_cents,
        "Created transaction"
    );
    Ok(id)
}

/// Rewrites a transaction in place. The kind never changes; an income stays
/// an income. Returns false when the user owns no such transaction.
pub fn update_transaction(
    conn: &Connection,
    id: i64,
    transaction: &NewTransaction,
) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE transactions
         SET category_id = ?, amount_cents = ?, date = ?, description = ?,
             updated_at = datetime('now')
         WHERE id = ? AND user_id = ? AND kind = ?",
        params![
            transaction.category_id,
            transaction.amount_cents,
            transaction.date,
            transaction.description,
            id,
            transaction.user_id,
            transaction.kind,
        ],
    )?;
    if rows > 0 {
        debug!(transaction_id = id, "Updated transaction");
    }
    Ok(rows > 0)
}

pub fn delete_transaction(conn: &Connection, user_id: i64, id: i64) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "DELETE FROM transactions WHERE id = ? AND user_id = ?",
        params![id, user_id],
    )?;
    if rows > 0 {
        debug!(transaction_id = id, user_id, "Deleted transaction");
    }
    Ok(rows > 0)
}
