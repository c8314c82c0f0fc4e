pub mod details;
pub mod force_graph;
pub mod legend;
