use crate::models::{CategoryTotal, FlowEdge, POOL_NODE};
use crate::services::distribution::merge_positive_totals;

/// Builds the money-flow graph `income category → Pool → expense category`.
///
/// Only categories with a strictly positive total produce an edge. A name
/// present on both sides yields two separate edges, one into the pool and
/// one out of it. Income edges come first, then expense edges, each ordered
/// by amount (largest first).
pub fn build_flow_edges(
    income_totals: Vec<CategoryTotal>,
    expense_totals: Vec<CategoryTotal>,
) -> Vec<FlowEdge> {
    let incoming = merge_positive_totals(income_totals)
        .into_iter()
        .map(|t| FlowEdge {
            from: t.category_name,
            to: POOL_NODE.to_string(),
            amount_cents: t.total_cents,
        });

    let outgoing = merge_positive_totals(expense_totals)
        .into_iter()
        .map(|t| FlowEdge {
            from: POOL_NODE.to_string(),
            to: t.category_name,
            amount_cents: t.total_cents,
        });

    incoming.chain(outgoing).collect()
}
