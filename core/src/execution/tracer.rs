//! Observation hooks for the reduction engine
//!
//! A [`LogSink`] receives a [`MatrixSnapshot`] of the active sub-matrix and
//! its per-row and per-column statistics at fixed points of every solve. Sinks
//! are purely observational: the engine computes identical results whether a
//! sink is attached or not. [`NullSink`] is the default and reports itself
//! disabled, so snapshots are never materialised for it.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::{self, Display};

use log::Level;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::Edge;

/// Point of the solve at which a snapshot was taken
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SnapshotPhase {
    /// Before the first iteration
    Initial,
    /// Penalties computed, selection pending
    Reduced { iteration: usize },
    /// Edge committed and statistics cleared
    Committed { iteration: usize, edge: Edge },
}

impl Display for SnapshotPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::Reduced { iteration } => write!(f, "iteration {iteration}: reduced"),
            Self::Committed { iteration, edge } => {
                write!(f, "iteration {iteration}: committed {edge}")
            }
        }
    }
}

/// Statistics of one active row or column, keyed by original index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisStat {
    pub index: usize,
    pub min: Option<f64>,
    pub second_min: Option<f64>,
    pub min_count: usize,
    pub term: Option<f64>,
}

/// Active sub-matrix with rows and columns in ascending original order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixSnapshot {
    pub phase: SnapshotPhase,
    pub rows: Vec<AxisStat>,
    pub columns: Vec<AxisStat>,
    /// `cells[r][c]` is the cost of `rows[r] -> columns[c]`; `None` when the
    /// edge is forbidden or absent
    pub cells: Vec<Vec<Option<f64>>>,
}

impl MatrixSnapshot {
    /// Cost cell addressed by original indices
    pub fn cell(&self, src: usize, dst: usize) -> Option<f64> {
        let row = self.rows.iter().position(|stat| stat.index == src)?;
        let column = self.columns.iter().position(|stat| stat.index == dst)?;
        self.cells[row][column]
    }

    pub fn row_terms(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|stat| stat.term).collect()
    }

    pub fn column_terms(&self) -> Vec<Option<f64>> {
        self.columns.iter().map(|stat| stat.term).collect()
    }
}

impl Display for MatrixSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.phase)?;
        for (stat, row) in self.rows.iter().zip(&self.cells) {
            write!(f, "\n{}:", stat.index)?;
            for cell in row {
                match cell {
                    Some(value) => write!(f, " {value}")?,
                    None => write!(f, " M")?,
                }
            }
        }
        Ok(())
    }
}

/// Receiver of engine snapshots
pub trait LogSink {
    /// Whether snapshots should be built for this sink at all
    fn is_enabled(&self) -> bool {
        true
    }

    fn record(&mut self, snapshot: &MatrixSnapshot);
}

impl<S: LogSink + ?Sized> LogSink for &mut S {
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    fn record(&mut self, snapshot: &MatrixSnapshot) {
        (**self).record(snapshot);
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn is_enabled(&self) -> bool {
        false
    }

    fn record(&mut self, _snapshot: &MatrixSnapshot) {}
}

/// Sink forwarding snapshots to the `log` facade
#[derive(Debug, Clone, Copy)]
pub struct LogCrateSink {
    level: Level,
}

impl LogCrateSink {
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Default for LogCrateSink {
    fn default() -> Self {
        Self::new(Level::Trace)
    }
}

impl LogSink for LogCrateSink {
    fn is_enabled(&self) -> bool {
        log::log_enabled!(self.level)
    }

    fn record(&mut self, snapshot: &MatrixSnapshot) {
        log::log!(self.level, "{snapshot}");
    }
}

/// Sink keeping every snapshot in memory
#[derive(Debug, Clone, Default)]
pub struct SnapshotRecorder {
    snapshots: Vec<MatrixSnapshot>,
}

impl SnapshotRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> &[MatrixSnapshot] {
        &self.snapshots
    }

    pub fn into_inner(self) -> Vec<MatrixSnapshot> {
        self.snapshots
    }
}

impl LogSink for SnapshotRecorder {
    fn record(&mut self, snapshot: &MatrixSnapshot) {
        self.snapshots.push(snapshot.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(index: usize, term: Option<f64>) -> AxisStat {
        AxisStat {
            index,
            min: None,
            second_min: None,
            min_count: 0,
            term,
        }
    }

    fn sample() -> MatrixSnapshot {
        MatrixSnapshot {
            phase: SnapshotPhase::Committed {
                iteration: 1,
                edge: Edge::new(3, 1),
            },
            rows: vec![stat(0, None), stat(2, Some(1.5))],
            columns: vec![stat(1, None), stat(3, None)],
            cells: vec![vec![Some(5.0), Some(9.0)], vec![None, Some(8.0)]],
        }
    }

    #[test]
    fn test_cell_lookup_by_original_index() {
        let snapshot = sample();
        assert_eq!(snapshot.cell(0, 3), Some(9.0));
        assert_eq!(snapshot.cell(2, 1), None);
        assert_eq!(snapshot.cell(1, 1), None);
        assert_eq!(snapshot.row_terms(), vec![None, Some(1.5)]);
    }

    #[test]
    fn test_display_marks_blocked_cells() {
        assert_eq!(
            sample().to_string(),
            "[iteration 1: committed 3 -> 1]\n0: 5 9\n2: M 8"
        );
    }

    #[test]
    fn test_snapshot_serializes_phase_tag() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["phase"]["phase"], "committed");
        assert_eq!(json["phase"]["iteration"], 1);
        assert!(json["cells"][1][0].is_null());
    }

    #[test]
    fn test_recorder_and_null_sink() {
        let mut recorder = SnapshotRecorder::new();
        let mut null = NullSink;
        assert!(recorder.is_enabled());
        assert!(!null.is_enabled());

        recorder.record(&sample());
        null.record(&sample());
        assert_eq!(recorder.into_inner().len(), 1);
    }
}
