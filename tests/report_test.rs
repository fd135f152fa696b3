mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Duration};
use common::{fmt, today, TestClient, FOOD, FREELANCE, GIFTS, RENT, SALARY, TRANSPORT};
use serde_json::{json, Value};

fn money(value: &Value) -> f64 {
    value.as_f64().unwrap_or_else(|| panic!("not a number: {}", value))
}

async fn january_client() -> TestClient {
    let client = TestClient::new();
    client.create_expense(1, FOOD, "50", "2024-01-05").await;
    client.create_income(1, SALARY, "200", "2024-01-01").await;
    client
}

#[tokio::test]
async fn test_january_report() {
    let client = january_client().await;

    let (status, report) = client
        .get_json("/api/users/1/reports?year=2024&month=1")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["year"], 2024);
    assert_eq!(report["month"], 1);
    assert_eq!(report["from"], "2024-01-01");
    assert_eq!(report["to"], "2024-01-31");
    assert_eq!(report["degraded"], false);
    assert_eq!(
        report["categoryDistribution"],
        json!([{"categoryName": "Food", "total": 50.0}])
    );
    assert_eq!(
        report["balanceSeries"],
        json!([
            {"date": "2024-01-01", "runningBalance": 200.0},
            {"date": "2024-01-05", "runningBalance": 150.0},
        ])
    );
    assert_eq!(
        report["periodTotals"],
        json!({"income": 200.0, "expense": 50.0})
    );
    assert_eq!(
        report["flowEdges"],
        json!([
            {"from": "Salary", "to": "Pool", "amount": 200.0},
            {"from": "Pool", "to": "Food", "amount": 50.0},
        ])
    );
}

#[tokio::test]
async fn test_empty_month_is_not_degraded() {
    let client = january_client().await;

    let (status, report) = client
        .get_json("/api/users/1/reports?year=2024&month=2")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["degraded"], false);
    assert_eq!(report["categoryDistribution"], json!([]));
    assert_eq!(report["balanceSeries"], json!([]));
    assert_eq!(report["flowEdges"], json!([]));
    assert_eq!(money(&report["periodTotals"]["income"]), 0.0);
    assert_eq!(money(&report["periodTotals"]["expense"]), 0.0);
    assert_eq!(money(&report["comparison"]["previous"]["income"]), 200.0);
}

#[tokio::test]
async fn test_unparsable_month_falls_back_to_current_month() {
    let client = TestClient::new();

    let (status, report) = client
        .get_json("/api/users/1/reports?year=2023&month=abc")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["year"], 2023);
    assert_eq!(report["month"], today().month());
    assert_eq!(report["degraded"], false);
}

#[tokio::test]
async fn test_repeated_month_keys_are_joined() {
    let client = january_client().await;

    // "abc,1" has no leading integer, so the current month is used.
    let (status, report) = client
        .get_json("/api/users/1/reports?year=2024&month=abc&month=1")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["year"], 2024);
    assert_eq!(report["month"], today().month());
    assert_eq!(money(&report["periodTotals"]["expense"]), 0.0);

    // "1,abc" reads as month 1.
    let (status, report) = client
        .get_json("/api/users/1/reports?month=1&month=abc&year=2024")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["month"], 1);
    assert_eq!(money(&report["periodTotals"]["expense"]), 50.0);
}

#[tokio::test]
async fn test_repeated_year_keys_are_joined() {
    let client = january_client().await;

    let (status, report) = client
        .get_json("/api/users/1/reports?year=2024&year=1999&month=1")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["year"], 2024);
    assert_eq!(report["month"], 1);
    assert_eq!(money(&report["periodTotals"]["income"]), 200.0);
}

#[tokio::test]
async fn test_no_period_defaults_to_current_month() {
    let client = TestClient::new();
    client.create_expense(1, FOOD, "12.5", &fmt(today())).await;

    let (_, report) = client.get_json("/api/users/1/reports").await;

    assert_eq!(report["year"], 2024);
    assert_eq!(report["month"], 3);
    assert_eq!(money(&report["periodTotals"]["expense"]), 12.5);
}

#[tokio::test]
async fn test_out_of_range_month_yields_empty_report() {
    let client = january_client().await;

    let (status, report) = client
        .get_json("/api/users/1/reports?year=2024&month=13")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["month"], 13);
    assert_eq!(report["from"], Value::Null);
    assert_eq!(report["degraded"], false);
    assert_eq!(report["balanceSeries"], json!([]));
    assert_eq!(money(&report["periodTotals"]["income"]), 0.0);
}

#[tokio::test]
async fn test_explicit_date_range() {
    let client = january_client().await;
    client.create_income(1, FREELANCE, "80", "2023-12-30").await;

    let (_, report) = client
        .get_json("/api/users/1/reports?from_date=2024-01-01&to_date=2024-01-03&year=1999")
        .await;

    assert!(report.get("year").is_none());
    assert_eq!(report["from"], "2024-01-01");
    assert_eq!(report["to"], "2024-01-03");
    assert_eq!(
        report["periodTotals"],
        json!({"income": 200.0, "expense": 0.0})
    );
    assert_eq!(money(&report["comparison"]["previous"]["income"]), 80.0);
}

#[tokio::test]
async fn test_inverted_range_is_ignored() {
    let client = january_client().await;

    let (_, report) = client
        .get_json("/api/users/1/reports?from_date=2024-01-31&to_date=2024-01-01&year=2024&month=1")
        .await;

    assert_eq!(report["month"], 1);
    assert_eq!(money(&report["periodTotals"]["income"]), 200.0);
}

#[tokio::test]
async fn test_report_is_scoped_to_user() {
    let client = january_client().await;
    client.create_expense(2, RENT, "900", "2024-01-02").await;

    let (_, mine) = client
        .get_json("/api/users/1/reports?year=2024&month=1")
        .await;
    let (_, theirs) = client
        .get_json("/api/users/2/reports?year=2024&month=1")
        .await;

    assert_eq!(money(&mine["periodTotals"]["expense"]), 50.0);
    assert_eq!(money(&theirs["periodTotals"]["expense"]), 900.0);
    assert_eq!(money(&theirs["periodTotals"]["income"]), 0.0);
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let client = january_client().await;
    client.create_expense(1, TRANSPORT, "50", "2024-01-09").await;
    client.create_income(1, GIFTS, "25", "2024-01-09").await;
    client.create_expense(1, GIFTS, "10", "2024-01-10").await;

    let uri = "/api/users/1/reports?year=2024&month=1";
    let (_, first) = client.get(uri).await;
    let (_, second) = client.get(uri).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_report_properties() {
    let client = january_client().await;
    client.create_expense(1, FOOD, "19.99", "2024-01-05").await;
    client.create_expense(1, RENT, "700", "2024-01-02").await;
    client.create_income(1, GIFTS, "40", "2024-01-20").await;
    client.create_expense(1, GIFTS, "15", "2024-01-21").await;

    let (_, report) = client
        .get_json("/api/users/1/reports?year=2024&month=1")
        .await;

    let series = report["balanceSeries"].as_array().unwrap();
    let dates: Vec<&str> = series.iter().map(|p| p["date"].as_str().unwrap()).collect();
    assert!(dates.windows(2).all(|w| w[0] < w[1]));

    let income = money(&report["periodTotals"]["income"]);
    let expense = money(&report["periodTotals"]["expense"]);
    let last = money(&series.last().unwrap()["runningBalance"]);
    assert!((last - (income - expense)).abs() < 1e-9);

    let distribution = report["categoryDistribution"].as_array().unwrap();
    assert!(distribution.iter().all(|c| money(&c["total"]) > 0.0));
    assert_eq!(distribution[0]["categoryName"], "Rent");

    let edges = report["flowEdges"].as_array().unwrap();
    assert!(edges.iter().all(|e| money(&e["amount"]) > 0.0));
    assert!(edges
        .iter()
        .any(|e| e["from"] == "Gifts" && e["to"] == "Pool"));
    assert!(edges
        .iter()
        .any(|e| e["from"] == "Pool" && e["to"] == "Gifts"));
}

#[tokio::test]
async fn test_storage_failure_degrades_report() {
    let client = january_client().await;
    {
        let conn = client.state().db.get().unwrap();
        conn.execute_batch("DROP TABLE transactions").unwrap();
    }

    let (status, report) = client
        .get_json("/api/users/1/reports?year=2024&month=1")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["degraded"], true);
    assert_eq!(report["categoryDistribution"], json!([]));
    assert_eq!(report["balanceSeries"], json!([]));
    assert_eq!(report["flowEdges"], json!([]));
    assert_eq!(money(&report["periodTotals"]["income"]), 0.0);
}

#[tokio::test]
async fn test_dashboard() {
    let client = TestClient::new();
    let today = today();
    let yesterday = today - Duration::days(1);

    client.create_expense(1, FOOD, "15", &fmt(today)).await;
    client.create_expense(1, FOOD, "9", &fmt(yesterday)).await;
    client.create_income(1, SALARY, "3000", &fmt(today - Duration::days(30))).await;
    client.create_income(1, SALARY, "2900", &fmt(today - Duration::days(31))).await;
    // Later this month, so outside the rolling window.
    client.create_income(1, FREELANCE, "50", "2024-03-31").await;

    let (status, dashboard) = client.get_json("/api/users/1/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["from"], "2024-02-14");
    assert_eq!(dashboard["to"], "2024-03-15");
    assert_eq!(dashboard["recentDegraded"], false);

    let report = &dashboard["report"];
    assert_eq!(report["degraded"], false);
    assert_eq!(
        report["periodTotals"],
        json!({"income": 3000.0, "expense": 24.0})
    );

    let summary = &dashboard["dailySummary"];
    assert_eq!(summary["date"], fmt(today));
    assert_eq!(summary["degraded"], false);
    assert_eq!(money(&summary["current"]["expense"]), 15.0);
    assert_eq!(money(&summary["previous"]["expense"]), 9.0);

    assert_eq!(
        dashboard["currentMonth"],
        json!({"year": 2024, "month": 3, "income": 50.0, "expense": 24.0, "degraded": false})
    );

    assert_eq!(dashboard["recentIncomes"].as_array().unwrap().len(), 3);
    let expenses = dashboard["recentExpenses"].as_array().unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0]["date"], fmt(today));
}

#[tokio::test]
async fn test_dashboard_recent_lists_are_limited() {
    let client = TestClient::new();
    for day in 0..8 {
        let date = fmt(today() - Duration::days(day));
        client.create_expense(1, FOOD, "1", &date).await;
    }

    let (_, dashboard) = client.get_json("/api/users/1/dashboard").await;

    let limit = client.state().config.recent_limit as usize;
    assert_eq!(dashboard["recentExpenses"].as_array().unwrap().len(), limit);
    assert_eq!(money(&dashboard["report"]["periodTotals"]["expense"]), 8.0);
}

#[tokio::test]
async fn test_dashboard_survives_storage_failure() {
    let client = TestClient::new();
    client.create_expense(1, FOOD, "15", &fmt(today())).await;
    {
        let conn = client.state().db.get().unwrap();
        conn.execute_batch("DROP TABLE transactions").unwrap();
    }

    let (status, dashboard) = client.get_json("/api/users/1/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["recentDegraded"], true);
    assert_eq!(dashboard["recentIncomes"], json!([]));
    assert_eq!(dashboard["recentExpenses"], json!([]));
    assert_eq!(dashboard["report"]["degraded"], true);
    assert_eq!(dashboard["dailySummary"]["degraded"], true);
    assert_eq!(dashboard["currentMonth"]["degraded"], true);
    assert_eq!(dashboard["currentMonth"]["month"], 3);
}
