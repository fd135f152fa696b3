use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::money::serialize_cents;

/// Direction of a ledger entry. Amounts are always stored positive; the kind
/// decides whether they add to or subtract from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Sign applied to the amount when folding into a net change.
    #[cfg(test)]
    pub(crate) fn sign(&self) -> i64 {
        match self {
            Self::Income => 1,
            Self::Expense => -1,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "incomes" => Ok(Self::Income),
            "expense" | "expenses" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub kind: TransactionKind,
    #[serde(rename = "amount", serialize_with = "serialize_cents")]
    pub amount_cents: i64,
    pub date: NaiveDate,
    pub description: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionWithCategory {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub category_name: String,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: i64,
    pub category_id: i64,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub date: NaiveDate,
    pub description: String,
}
