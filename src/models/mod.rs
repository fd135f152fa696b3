pub mod category;
pub mod money;
pub mod recurring;
pub mod report;
pub mod transaction;

pub use category::{Category, CategoryType};
pub use recurring::{BillingCycle, Installment, NewInstallment, NewSubscription, Subscription};
pub use report::{
    BalancePoint, CategoryTotal, DailyNetChange, FlowEdge, PeriodComparison, PeriodTotals,
    ReportOutcome, ReportPayload, POOL_NODE,
};
pub use transaction::{NewTransaction, Transaction, TransactionKind, TransactionWithCategory};
