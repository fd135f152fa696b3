use chrono::NaiveDate;
use serde::Serialize;

use crate::models::money::serialize_cents;

/// Sentinel flow-graph node standing for the user's undifferentiated funds.
pub const POOL_NODE: &str = "Pool";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category_name: String,
    #[serde(rename = "total", serialize_with = "serialize_cents")]
    pub total_cents: i64,
}

impl CategoryTotal {
    pub fn new(category_name: impl Into<String>, total_cents: i64) -> Self {
        Self {
            category_name: category_name.into(),
            total_cents,
        }
    }
}

/// Income minus expense for a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyNetChange {
    pub date: NaiveDate,
    #[serde(rename = "netAmount", serialize_with = "serialize_cents")]
    pub net_cents: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancePoint {
    pub date: NaiveDate,
    #[serde(rename = "runningBalance", serialize_with = "serialize_cents")]
    pub running_balance_cents: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    #[serde(rename = "income", serialize_with = "serialize_cents")]
    pub income_cents: i64,
    #[serde(rename = "expense", serialize_with = "serialize_cents")]
    pub expense_cents: i64,
}

impl PeriodTotals {
    pub fn net_cents(&self) -> i64 {
        self.income_cents - self.expense_cents
    }
}

/// Totals for a window next to the totals of the window right before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodComparison {
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowEdge {
    pub from: String,
    pub to: String,
    #[serde(rename = "amount", serialize_with = "serialize_cents")]
    pub amount_cents: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub category_distribution: Vec<CategoryTotal>,
    pub balance_series: Vec<BalancePoint>,
    pub period_totals: PeriodTotals,
    pub flow_edges: Vec<FlowEdge>,
}

impl ReportPayload {
    pub fn is_empty(&self) -> bool {
        self.category_distribution.is_empty()
            && self.balance_series.is_empty()
            && self.flow_edges.is_empty()
            && self.period_totals == PeriodTotals::default()
    }
}

/// A report together with whether it had to be degraded to an empty
/// payload because the transaction source failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportOutcome {
    #[serde(flatten)]
    pub payload: ReportPayload,
    pub degraded: bool,
}

impl ReportOutcome {
    pub fn complete(payload: ReportPayload) -> Self {
        Self {
            payload,
            degraded: false,
        }
    }

    pub fn degraded() -> Self {
        Self {
            payload: ReportPayload::default(),
            degraded: true,
        }
    }
}
