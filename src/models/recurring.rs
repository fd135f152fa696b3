//! Subscriptions and installment plans attached to a recorded expense.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::money::serialize_cents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// The payment date one cycle after `date`. A day that does not exist in
    /// the target month clamps to that month's last day.
    pub fn next_payment_date(&self, date: NaiveDate) -> Option<NaiveDate> {
        let months = match self {
            Self::Monthly => 1,
            Self::Yearly => 12,
        };
        date.checked_add_months(Months::new(months))
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MONTHLY" => Ok(Self::Monthly),
            "YEARLY" => Ok(Self::Yearly),
            _ => Err(format!("Unknown billing cycle: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub transaction_id: i64,
    pub name: String,
    #[serde(rename = "amount", serialize_with = "serialize_cents")]
    pub amount_cents: i64,
    pub cycle: BillingCycle,
    pub next_payment_date: NaiveDate,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub user_id: i64,
    pub transaction_id: i64,
    pub name: String,
    pub amount_cents: i64,
    pub cycle: BillingCycle,
    pub next_payment_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Installment {
    pub id: i64,
    pub user_id: i64,
    pub transaction_id: i64,
    pub product_name: String,
    #[serde(rename = "total_amount", serialize_with = "serialize_cents")]
    pub total_amount_cents: i64,
    #[serde(rename = "monthly_amount", serialize_with = "serialize_cents")]
    pub monthly_amount_cents: i64,
    pub total_installments: i64,
    pub remaining_installments: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInstallment {
    pub user_id: i64,
    pub transaction_id: i64,
    pub product_name: String,
    pub total_amount_cents: i64,
    pub monthly_amount_cents: i64,
    pub total_installments: i64,
    pub remaining_installments: i64,
}

impl NewInstallment {
    /// A plan of `total_installments` payments of `monthly_amount_cents`, of
    /// which `current_installment` are already paid.
    pub fn plan(
        user_id: i64,
        transaction_id: i64,
        product_name: impl Into<String>,
        monthly_amount_cents: i64,
        total_installments: i64,
        current_installment: i64,
    ) -> Result<Self, String> {
        if total_installments < 1 {
            return Err("Installment count must be at least 1".into());
        }
        if !(0..=total_installments).contains(&current_installment) {
            return Err(format!(
                "Current installment must be between 0 and {}",
                total_installments
            ));
        }
        let total_amount_cents = monthly_amount_cents
            .checked_mul(total_installments)
            .ok_or_else(|| "Installment total is too large".to_string())?;

        Ok(Self {
            user_id,
            transaction_id,
            product_name: product_name.into(),
            total_amount_cents,
            monthly_amount_cents,
            total_installments,
            remaining_installments: total_installments - current_installment,
        })
    }
}
