//! Textual rendering of reduction snapshots and tours
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod sink;
pub mod view;

pub use sink::TableSink;
pub use view::{format_cost, render_edges, render_tour, GridView, GridViewConfig};
