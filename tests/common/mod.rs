//! Shared test utilities for integration tests.
//!
//! `TestClient` drives the router against a fresh in-memory database with
//! all migrations applied, so every test starts from the seeded categories
//! and no transactions.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use ledgerlens::config::Config;
use ledgerlens::db::{create_in_memory_pool, migrations};
use ledgerlens::handlers;
use ledgerlens::state::AppState;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;

/// Seeded category ids (see migrations/002_seed_categories.sql).
pub const SALARY: i64 = 1;
pub const FREELANCE: i64 = 2;
pub const GIFTS: i64 = 4;
pub const FOOD: i64 = 5;
pub const RENT: i64 = 6;
pub const TRANSPORT: i64 = 7;

/// The fixed "today" every `TestClient` reports against.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

pub fn fmt(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub struct TestClient {
    state: AppState,
}

impl TestClient {
    pub fn new() -> Self {
        let pool = create_in_memory_pool().expect("Failed to create in-memory pool");
        {
            let mut conn = pool.get().expect("Failed to get connection");
            migrations::run_migrations(&mut conn, Path::new("migrations"))
                .expect("Failed to run migrations");
        }

        let config = Config {
            host: "127.0.0.1".into(),
            database_path: PathBuf::from(":memory:"),
            ..Config::default()
        };

        Self {
            state: AppState::with_clock(pool, config, Arc::new(today)),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        handlers::routes().with_state(self.state.clone())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router().oneshot(request).await.unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Get JSON from an endpoint and parse it.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.get(uri).await;
        let parsed = serde_json::from_str(&body)
            .unwrap_or_else(|e| panic!("Invalid JSON from {}: {} ({})", uri, e, body));
        (status, parsed)
    }

    /// Send form data with the given method and return status and body.
    pub async fn send_form(
        &self,
        method: &str,
        uri: &str,
        form_data: &[(&str, &str)],
    ) -> (StatusCode, String) {
        let body = form_data
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn post_form(&self, uri: &str, form_data: &[(&str, &str)]) -> (StatusCode, String) {
        self.send_form("POST", uri, form_data).await
    }

    pub async fn put_form(&self, uri: &str, form_data: &[(&str, &str)]) -> (StatusCode, String) {
        self.send_form("PUT", uri, form_data).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, String) {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    // =========================================================================
    // Helper methods for recording entries through the API
    // =========================================================================

    /// Record an income and return the created transaction id.
    pub async fn create_income(&self, user_id: i64, category_id: i64, amount: &str, date: &str) -> i64 {
        self.create(user_id, "incomes", category_id, amount, date).await
    }

    /// Record an expense and return the created transaction id.
    pub async fn create_expense(&self, user_id: i64, category_id: i64, amount: &str, date: &str) -> i64 {
        self.create(user_id, "expenses", category_id, amount, date).await
    }

    async fn create(&self, user_id: i64, kind: &str, category_id: i64, amount: &str, date: &str) -> i64 {
        let category = category_id.to_string();
        let (status, body) = self
            .post_form(
                &format!("/api/users/{}/{}", user_id, kind),
                &[
                    ("amount", amount),
                    ("category_id", category.as_str()),
                    ("date", date),
                    ("description", "test entry"),
                ],
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create {} failed: {}", kind, body);

        let created: serde_json::Value = serde_json::from_str(&body).unwrap();
        created["id"].as_i64().unwrap()
    }
}
