use crate::models::CategoryTotal;
use std::collections::HashMap;

/// Expense distribution across categories for a window.
///
/// Rows sharing a category name are summed into one entry, categories whose
/// total is not strictly positive are dropped, and the result is ordered by
/// total (largest first) with ties broken by name.
pub fn category_distribution(expense_totals: Vec<CategoryTotal>) -> Vec<CategoryTotal> {
    merge_positive_totals(expense_totals)
}

/// Groups totals by category name and keeps only positive sums.
pub(crate) fn merge_positive_totals(totals: Vec<CategoryTotal>) -> Vec<CategoryTotal> {
    let mut by_name: HashMap<String, i64> = HashMap::new();
    for total in totals {
        let entry = by_name.entry(total.category_name).or_insert(0);
        *entry = entry.saturating_add(total.total_cents);
    }

    let mut result: Vec<CategoryTotal> = by_name
        .into_iter()
        .filter(|(_, total_cents)| *total_cents > 0)
        .map(|(category_name, total_cents)| CategoryTotal {
            category_name,
            total_cents,
        })
        .collect();

    result.sort_by(|a, b| {
        b.total_cents
            .cmp(&a.total_cents)
            .then_with(|| a.category_name.cmp(&b.category_name))
    });
    result
}
