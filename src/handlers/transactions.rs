use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Form;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Deserialize;
use tracing::{debug, info};

use crate::db::queries::{categories, recurring, transactions};
use crate::error::{AppError, AppResult};
use crate::form_utils::parse_leading_int;
use crate::models::money::parse_amount_cents;
use crate::models::{
    BillingCycle, NewInstallment, NewSubscription, NewTransaction, TransactionKind,
    TransactionWithCategory,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TransactionFormData {
    pub amount: String,
    pub category_id: String,
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_subscription: Option<String>,
    #[serde(default)]
    pub sub_cycle: Option<String>,
    #[serde(default)]
    pub is_installment: Option<String>,
    #[serde(default)]
    pub total_installments: Option<String>,
    #[serde(default)]
    pub current_installment: Option<String>,
}

/// Checkbox-style flag: `true`, `on` or `1`.
fn is_checked(flag: &Option<String>) -> bool {
    matches!(
        flag.as_deref().map(str::trim),
        Some("true" | "on" | "1")
    )
}

fn require_expense(transaction: &NewTransaction, what: &str) -> AppResult<()> {
    if transaction.kind != TransactionKind::Expense {
        return Err(AppError::Validation(format!(
            "Only expenses can carry {}",
            what
        )));
    }
    Ok(())
}

fn required_count(value: &Option<String>, field: &str) -> AppResult<i64> {
    value
        .as_deref()
        .and_then(parse_leading_int)
        .map(i64::from)
        .ok_or_else(|| AppError::Validation(format!("Invalid {}", field)))
}

impl TransactionFormData {
    /// The subscription requested alongside an edit, due one cycle after
    /// the expense date.
    fn subscription(
        &self,
        transaction_id: i64,
        transaction: &NewTransaction,
    ) -> AppResult<Option<NewSubscription>> {
        if !is_checked(&self.is_subscription) {
            return Ok(None);
        }
        require_expense(transaction, "a subscription")?;

        let cycle: BillingCycle = self
            .sub_cycle
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(AppError::Validation)?;
        let next_payment_date = cycle
            .next_payment_date(transaction.date)
            .ok_or_else(|| AppError::Validation("Next payment date is out of range".into()))?;

        Ok(Some(NewSubscription {
            user_id: transaction.user_id,
            transaction_id,
            name: transaction.description.clone(),
            amount_cents: transaction.amount_cents,
            cycle,
            next_payment_date,
        }))
    }

    /// The installment plan requested alongside an edit. The expense amount
    /// is the monthly payment.
    fn installment(
        &self,
        transaction_id: i64,
        transaction: &NewTransaction,
    ) -> AppResult<Option<NewInstallment>> {
        if !is_checked(&self.is_installment) {
            return Ok(None);
        }
        require_expense(transaction, "an installment plan")?;

        let total = required_count(&self.total_installments, "installment count")?;
        let current = required_count(&self.current_installment, "current installment")?;
        NewInstallment::plan(
            transaction.user_id,
            transaction_id,
            transaction.description.clone(),
            transaction.amount_cents,
            total,
            current,
        )
        .map(Some)
        .map_err(AppError::Validation)
    }

    fn to_new_transaction(
        &self,
        conn: &Connection,
        user_id: i64,
        kind: TransactionKind,
    ) -> AppResult<NewTransaction> {
        let amount_cents = parse_amount_cents(&self.amount)
            .filter(|cents| *cents > 0)
            .ok_or_else(|| AppError::Validation("Amount must be a positive number".into()))?;

        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::Validation(format!("Invalid date: {}", self.date)))?;

        let category_id: i64 = self
            .category_id
            .trim()
            .parse()
            .map_err(|_| AppError::Validation("Invalid category".into()))?;
        let category = categories::get_category(conn, category_id)?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", category_id)))?;
        if !category.category_type.accepts(kind) {
            return Err(AppError::Validation(format!(
                "Category {} cannot hold {} entries",
                category.name, kind
            )));
        }

        Ok(NewTransaction {
            user_id,
            category_id,
            kind,
            amount_cents,
            date,
            description: self.description.trim().to_string(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionListParams {
    pub kind: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::form_utils::deserialize_optional_date"
    )]
    pub from_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "crate::form_utils::deserialize_optional_date"
    )]
    pub to_date: Option<NaiveDate>,
    pub limit: Option<i64>,
}

pub async fn index(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(params): Query<TransactionListParams>,
) -> AppResult<Json<Vec<TransactionWithCategory>>> {
    let kind = params
        .kind
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .map(str::parse::<TransactionKind>)
        .transpose()
        .map_err(AppError::Validation)?;

    let filter = transactions::TransactionFilter {
        kind,
        from_date: params.from_date,
        to_date: params.to_date,
        limit: params.limit.filter(|l| *l >= 0),
        ..transactions::TransactionFilter::for_user(user_id)
    };

    let conn = state.db.get()?;
    Ok(Json(transactions::list_transactions(&conn, &filter)?))
}

pub async fn create_income(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Form(form): Form<TransactionFormData>,
) -> AppResult<(StatusCode, Json<TransactionWithCategory>)> {
    create(state, user_id, TransactionKind::Income, form)
}

pub async fn create_expense(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Form(form): Form<TransactionFormData>,
) -> AppResult<(StatusCode, Json<TransactionWithCategory>)> {
    create(state, user_id, TransactionKind::Expense, form)
}

fn create(
    state: AppState,
    user_id: i64,
    kind: TransactionKind,
    form: TransactionFormData,
) -> AppResult<(StatusCode, Json<TransactionWithCategory>)> {
    debug!(user_id, %kind, amount = %form.amount, "Recording transaction");
    let mut conn = state.db.get()?;
    let tx = conn.transaction()?;

    let new_transaction = form.to_new_transaction(&tx, user_id, kind)?;
    let id = transactions::create_transaction(&tx, &new_transaction)?;
    let created = transactions::get_transaction(&tx, user_id, id)?
        .ok_or_else(|| AppError::Internal(format!("Transaction {} vanished after insert", id)))?;

    tx.commit()?;
    info!(transaction_id = id, user_id, %kind, "Transaction recorded");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(i64, i64)>,
    Form(form): Form<TransactionFormData>,
) -> AppResult<Json<TransactionWithCategory>> {
    debug!(user_id, transaction_id = id, "Updating transaction");
    let mut conn = state.db.get()?;
    let tx = conn.transaction()?;

    let existing = transactions::get_transaction(&tx, user_id, id)?
        .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", id)))?;
    let kind = existing.transaction.kind;

    let new_transaction = form.to_new_transaction(&tx, user_id, kind)?;
    let subscription = form.subscription(id, &new_transaction)?;
    let installment = form.installment(id, &new_transaction)?;

    transactions::update_transaction(&tx, id, &new_transaction)?;
    if let Some(subscription) = &subscription {
        recurring::create_subscription(&tx, subscription)?;
    }
    if let Some(installment) = &installment {
        recurring::create_installment(&tx, installment)?;
    }
    let updated = transactions::get_transaction(&tx, user_id, id)?
        .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", id)))?;

    tx.commit()?;
    info!(transaction_id = id, user_id, "Transaction updated");
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(i64, i64)>,
) -> AppResult<StatusCode> {
    info!(user_id, transaction_id = id, "Deleting transaction");
    let conn = state.db.get()?;

    if !transactions::delete_transaction(&conn, user_id, id)? {
        return Err(AppError::NotFound(format!("Transaction {} not found", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
