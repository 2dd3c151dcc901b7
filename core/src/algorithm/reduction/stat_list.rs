//! Active-index map with per-slot reduction statistics
//!
//! Rows and columns still in play occupy the compacted slot ranges
//! `[0, row_count)` and `[0, column_count)`. Each slot remembers which
//! original matrix index it currently stands for, so retiring a slot is a
//! swap with the last active slot followed by a shrink; the cost matrix is
//! never touched. The forbidden-edge matrix lives alongside and is keyed by
//! original indices.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};

use super::zero_cells::CellCoords;
use crate::algorithm::traits::Edge;
use crate::data_structures::bool_matrix::BoolMatrix;

/// Rule deciding when a committed row or column slot leaves the active set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompactionPolicy {
    /// Retire a slot only if its scan met at least one blocked cell
    #[default]
    WhenBlocked,
    /// Retire both slots on every commit
    Always,
}

/// Reduction statistics of one row or column slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotStat {
    /// Original matrix index this slot maps to
    pub mx_index: usize,
    pub min: Option<f64>,
    pub second_min: Option<f64>,
    /// Cells tying `min` within epsilon
    pub min_count: usize,
    /// Penalty for not using the cheapest cell; `None` while undefined
    pub term: Option<f64>,
    /// Forbidden or no-edge cells met during the current scan
    pub blocked_cells: usize,
}

impl SlotStat {
    fn new(mx_index: usize) -> Self {
        Self {
            mx_index,
            min: None,
            second_min: None,
            min_count: 0,
            term: None,
            blocked_cells: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.mx_index);
    }

    /// Folds a reduced value into the running minimum statistics
    ///
    /// Any value below `epsilon` is stored as exactly 0, not only the first
    /// value the slot sees, so a later near-zero minimum still selects the
    /// zero-minimum column branch.
    pub fn observe(&mut self, value: f64, epsilon: f64) {
        let value = if value < epsilon { 0.0 } else { value };
        match self.min {
            None => {
                self.min = Some(value);
                self.min_count = 1;
            }
            Some(min) if (value - min).abs() < epsilon => self.min_count += 1,
            Some(min) if value < min => {
                self.second_min = Some(min);
                self.min = Some(value);
                self.min_count = 1;
            }
            Some(_) => {
                if self.second_min.map_or(true, |second| value < second) {
                    self.second_min = Some(value);
                }
            }
        }
    }

    /// Penalty from the current statistics: zero when the minimum is shared
    pub fn penalty(&self) -> Option<f64> {
        if self.min_count > 1 {
            Some(0.0)
        } else {
            self.second_min.zip(self.min).map(|(second, min)| second - min)
        }
    }

    #[inline]
    pub fn has_zero_min(&self) -> bool {
        self.min == Some(0.0)
    }
}

/// Slots retired by one commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitOutcome {
    pub row_compacted: bool,
    pub column_compacted: bool,
}

#[derive(Debug, Clone)]
pub struct StatList {
    rows: Vec<SlotStat>,
    columns: Vec<SlotStat>,
    row_count: usize,
    column_count: usize,
    forbidden: BoolMatrix,
    policy: CompactionPolicy,
}

impl StatList {
    pub fn new(size: usize, policy: CompactionPolicy) -> Self {
        Self {
            rows: (0..size).map(SlotStat::new).collect(),
            columns: (0..size).map(SlotStat::new).collect(),
            row_count: size,
            column_count: size,
            forbidden: BoolMatrix::with_diagonal(size),
            policy,
        }
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    #[inline]
    pub fn row(&self, row: usize) -> &SlotStat {
        &self.rows[row]
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut SlotStat {
        &mut self.rows[row]
    }

    #[inline]
    pub fn column(&self, column: usize) -> &SlotStat {
        &self.columns[column]
    }

    #[inline]
    pub fn column_mut(&mut self, column: usize) -> &mut SlotStat {
        &mut self.columns[column]
    }

    /// Disjoint mutable access to a row slot and a column slot
    pub fn row_and_column_mut(
        &mut self,
        row: usize,
        column: usize,
    ) -> (&mut SlotStat, &mut SlotStat) {
        (&mut self.rows[row], &mut self.columns[column])
    }

    pub fn active_rows(&self) -> &[SlotStat] {
        &self.rows[..self.row_count]
    }

    pub fn active_columns(&self) -> &[SlotStat] {
        &self.columns[..self.column_count]
    }

    /// Whether `src -> dst`, in original indices, may no longer be committed
    #[inline]
    pub fn is_forbidden(&self, src: usize, dst: usize) -> bool {
        self.forbidden.get(src, dst)
    }

    /// Clears the statistics of every active slot
    pub fn reset(&mut self) {
        self.rows[..self.row_count].iter_mut().for_each(SlotStat::reset);
        self.columns[..self.column_count]
            .iter_mut()
            .for_each(SlotStat::reset);
    }

    /// Combined row and column penalty of a candidate cell
    pub fn sum(&self, coords: CellCoords) -> Option<f64> {
        let row = self.rows[coords.row].term?;
        let column = self.columns[coords.column].term?;
        Some(row + column)
    }

    /// Commits the edge behind `coords`
    ///
    /// Forbids the edge and its reverse, then retires the row and column
    /// slots according to the compaction policy.
    pub fn commit_edge(&mut self, coords: CellCoords) -> (Edge, CommitOutcome) {
        let row = self.rows[coords.row];
        let column = self.columns[coords.column];
        let (src, dst) = (row.mx_index, column.mx_index);
        self.forbidden.set(src, dst, true);
        self.forbidden.set(dst, src, true);

        let mut outcome = CommitOutcome::default();
        if self.should_compact(&row) {
            self.row_count -= 1;
            self.rows.swap(coords.row, self.row_count);
            outcome.row_compacted = true;
        }
        if self.should_compact(&column) {
            self.column_count -= 1;
            self.columns.swap(coords.column, self.column_count);
            outcome.column_compacted = true;
        }

        (Edge::new(src, dst), outcome)
    }

    fn should_compact(&self, slot: &SlotStat) -> bool {
        match self.policy {
            CompactionPolicy::Always => true,
            CompactionPolicy::WhenBlocked => slot.blocked_cells > 0,
        }
    }
}
