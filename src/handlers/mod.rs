pub mod categories;
pub mod dashboard;
pub mod recurring;
pub mod reports;
pub mod transactions;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Reports
        .route("/api/users/:user_id/reports", get(reports::show))
        .route("/api/users/:user_id/dashboard", get(dashboard::index))
        // Transactions
        .route(
            "/api/users/:user_id/transactions",
            get(transactions::index),
        )
        .route(
            "/api/users/:user_id/incomes",
            post(transactions::create_income),
        )
        .route(
            "/api/users/:user_id/expenses",
            post(transactions::create_expense),
        )
        .route(
            "/api/users/:user_id/transactions/:id",
            put(transactions::update).delete(transactions::delete),
        )
        // Subscriptions and installment plans
        .route(
            "/api/users/:user_id/subscriptions",
            get(recurring::subscriptions),
        )
        .route(
            "/api/users/:user_id/installments",
            get(recurring::installments),
        )
        // Categories
        .route("/api/categories", get(categories::index))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
