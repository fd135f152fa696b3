use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::transaction::TransactionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
    Both,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Both => "both",
        }
    }

    pub fn accepts(&self, kind: TransactionKind) -> bool {
        matches!(
            (self, kind),
            (Self::Both, _)
                | (Self::Income, TransactionKind::Income)
                | (Self::Expense, TransactionKind::Expense)
        )
    }
}

impl FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "both" => Ok(Self::Both),
            _ => Err(format!("Unknown category type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub category_type: CategoryType,
}
