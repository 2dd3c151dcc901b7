//! Path line rendering of tours and committed edges
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use reduction_tsp_core::{CostMatrix, Edge, Tour};

use super::format_cost;

/// `0 --[9]--> 3 --[6]--> 1 ... --> 0 = 30`
///
/// Edges without a cost in `matrix` are labelled `?`.
pub fn render_tour(matrix: &CostMatrix, tour: &Tour, precision: usize) -> String {
    let mut line = match tour.edges.first() {
        Some(edge) => edge.src.to_string(),
        None => return String::new(),
    };
    for edge in &tour.edges {
        let cost = matrix
            .cost(edge.src.as_usize(), edge.dst.as_usize())
            .unwrap_or(f64::NAN);
        line.push_str(&format!(" --[{}]--> {}", format_cost(cost, precision), edge.dst));
    }
    line.push_str(&format!(" = {}", format_cost(tour.total_cost, precision)));
    line
}

/// Comma separated edges in commitment order
pub fn render_edges(edges: &[Edge]) -> String {
    edges
        .iter()
        .map(Edge::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
