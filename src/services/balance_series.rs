use crate::models::{BalancePoint, DailyNetChange};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Folds per-day net changes into a running balance.
///
/// Entries are coalesced per date and visited in ascending date order; days
/// without activity are skipped rather than zero-filled. The balance starts
/// at the first day's net change, so it is relative to the window start and
/// not a lifetime account balance.
pub fn build_balance_series(changes: Vec<DailyNetChange>) -> Vec<BalancePoint> {
    let mut by_date: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for change in changes {
        let entry = by_date.entry(change.date).or_insert(0);
        *entry = entry.saturating_add(change.net_cents);
    }

    by_date
        .into_iter()
        .scan(0i64, |running, (date, net_cents)| {
            *running = running.saturating_add(net_cents);
            Some(BalancePoint {
                date,
                running_balance_cents: *running,
            })
        })
        .collect()
}
