//! Text views over engine output
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod grid_view;
pub mod tour_view;

pub use self::grid_view::{GridView, GridViewConfig};
pub use self::tour_view::{render_edges, render_tour};

/// Formats a cost with at most `precision` fractional digits
///
/// Trailing zeros are trimmed. NaN renders as `?` and infinities as `∞`/`-∞`.
pub fn format_cost(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "?".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let mut text = format!("{value:.precision$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text.remove(0);
    }
    text
}
