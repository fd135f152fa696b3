pub mod balance_series;
pub mod comparison;
pub mod distribution;
pub mod flow_graph;
pub mod report;
