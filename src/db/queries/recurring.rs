use crate::models::{Installment, NewInstallment, NewSubscription, Subscription};
use rusqlite::{params, Connection};
use tracing::debug;

pub fn create_subscription(
    conn: &Connection,
    subscription: &NewSubscription,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO subscriptions (user_id, transaction_id, name, amount_cents, cycle, next_payment_date)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            subscription.user_id,
            subscription.transaction_id,
            subscription.name,
            subscription.amount_cents,
            subscription.cycle,
            subscription.next_payment_date,
        ],
    )?;

    let id = conn.last_insert_rowid();
    debug!(
        subscription_id = id,
        transaction_id = subscription.transaction_id,
        cycle = %subscription.cycle,
        next_payment_date = %subscription.next_payment_date,
        "Created subscription"
    );
    Ok(id)
}

/// A user's subscriptions, soonest payment first.
pub fn list_subscriptions(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Subscription>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, transaction_id, name, amount_cents, cycle, next_payment_date, created_at
         FROM subscriptions
         WHERE user_id = ?
         ORDER BY next_payment_date ASC, id ASC",
    )?;

    let subscriptions = stmt
        .query_map([user_id], |row| {
            Ok(Subscription {
                id: row.get(0)?,
                user_id: row.get(1)?,
                transaction_id: row.get(2)?,
                name: row.get(3)?,
                amount_cents: row.get(4)?,
                cycle: row.get(5)?,
                next_payment_date: row.get(6)?,
                created_at: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(subscriptions)
}

pub fn create_installment(conn: &Connection, installment: &NewInstallment) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO installments (user_id, transaction_id, product_name, total_amount_cents,
                                   monthly_amount_cents, total_installments, remaining_installments)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            installment.user_id,
            installment.transaction_id,
            installment.product_name,
            installment.total_amount_cents,
            installment.monthly_amount_cents,
            installment.total_installments,
            installment.remaining_installments,
        ],
    )?;

    let id = conn.last_insert_rowid();
    debug!(
        installment_id = id,
        transaction_id = installment.transaction_id,
        remaining = installment.remaining_installments,
        "Created installment plan"
    );
    Ok(id)
}

pub fn list_installments(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Installment>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, transaction_id, product_name, total_amount_cents,
                monthly_amount_cents, total_installments, remaining_installments, created_at
         FROM installments
         WHERE user_id = ?
         ORDER BY id ASC",
    )?;

    let installments = stmt
        .query_map([user_id], |row| {
            Ok(Installment {
                id: row.get(0)?,
                user_id: row.get(1)?,
                transaction_id: row.get(2)?,
                product_name: row.get(3)?,
                total_amount_cents: row.get(4)?,
                monthly_amount_cents: row.get(5)?,
                total_installments: row.get(6)?,
                remaining_installments: row.get(7)?,
                created_at: row.get(8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(installments)
}
