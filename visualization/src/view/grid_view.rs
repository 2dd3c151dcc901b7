//! Grid table view of reduction snapshots
//!
//! Renders the active sub-matrix as a box-drawn text table: a header row of
//! original column indices, one line per active row labelled with its
//! original index, and optionally the row and column penalties as a trailing
//! column and row. Every cell is right-aligned to a common width.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use reduction_tsp_core::MatrixSnapshot;

use super::format_cost;

const TERM_LABEL: &str = "term";

/// Configuration for grid rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridViewConfig {
    /// Maximum fractional digits of a cost
    pub precision: usize,

    /// Print the phase line above the table
    pub show_phase: bool,

    /// Append the row and column penalties
    pub show_terms: bool,

    /// Text of a forbidden or no-edge cell
    pub blocked_marker: String,

    /// Text of an undefined penalty
    pub undefined_marker: String,
}

impl Default for GridViewConfig {
    fn default() -> Self {
        Self {
            precision: 6,
            show_phase: true,
            show_terms: true,
            blocked_marker: "M".to_string(),
            undefined_marker: "-".to_string(),
        }
    }
}

/// Text grid renderer
#[derive(Debug, Clone, Default)]
pub struct GridView {
    config: GridViewConfig,
}

impl GridView {
    /// Create a new grid view
    pub fn new(config: GridViewConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GridViewConfig {
        &self.config
    }

    /// Renders `snapshot` into a new string
    pub fn render(&self, snapshot: &MatrixSnapshot) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.render_to(snapshot, &mut out);
        out
    }

    /// Renders `snapshot` into any formatter sink
    pub fn render_to<W: Write>(&self, snapshot: &MatrixSnapshot, out: &mut W) -> fmt::Result {
        let table = self.build_table(snapshot);
        let width = table
            .iter()
            .flatten()
            .map(|cell| cell.chars().count())
            .max()
            .unwrap_or(0);

        if self.config.show_phase {
            writeln!(out, "[{}]", snapshot.phase)?;
        }

        let mut lines = table.iter().map(|line| aligned(line, width));
        if let Some(header) = lines.next() {
            out.write_str(&header)?;
            let columns = table.first().map_or(0, Vec::len);
            write!(out, "\n{}", separator(columns, width))?;
        }
        let body_rows = snapshot.rows.len();
        for (index, line) in lines.enumerate() {
            if self.config.show_terms && index == body_rows {
                let columns = table.first().map_or(0, Vec::len);
                write!(out, "\n{}", separator(columns, width))?;
            }
            write!(out, "\n{line}")?;
        }
        Ok(())
    }

    /// Table of unpadded cell texts, header first
    fn build_table(&self, snapshot: &MatrixSnapshot) -> Vec<Vec<String>> {
        let mut header = vec![String::new()];
        header.extend(snapshot.columns.iter().map(|stat| stat.index.to_string()));
        if self.config.show_terms {
            header.push(TERM_LABEL.to_string());
        }

        let mut table = Vec::with_capacity(snapshot.rows.len() + 2);
        table.push(header);
        for (stat, cells) in snapshot.rows.iter().zip(&snapshot.cells) {
            let mut line = vec![stat.index.to_string()];
            line.extend(cells.iter().map(|cell| match cell {
                Some(value) => format_cost(*value, self.config.precision),
                None => self.config.blocked_marker.clone(),
            }));
            if self.config.show_terms {
                line.push(self.term(stat.term));
            }
            table.push(line);
        }

        if self.config.show_terms {
            let mut line = vec![TERM_LABEL.to_string()];
            line.extend(snapshot.columns.iter().map(|stat| self.term(stat.term)));
            line.push(String::new());
            table.push(line);
        }
        table
    }

    fn term(&self, term: Option<f64>) -> String {
        term.map_or_else(
            || self.config.undefined_marker.clone(),
            |value| format_cost(value, self.config.precision),
        )
    }
}

fn aligned(cells: &[String], width: usize) -> String {
    cells
        .iter()
        .map(|cell| format!("{cell:>width$}"))
        .collect::<Vec<_>>()
        .join(" │ ")
}

fn separator(columns: usize, width: usize) -> String {
    vec!["─".repeat(width); columns].join("─┼─")
}
