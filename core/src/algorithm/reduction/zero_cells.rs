//! Candidate zero-cell collection
//!
//! Cells are recorded in tie groups: one group per scanned row (a column
//! set) or per re-scanned column (a row set). Only the most recent group may
//! be discarded, which happens when a row scan meets a strictly smaller value
//! after ties were already recorded. Insertion order is preserved because
//! selection breaks equal penalties in favour of the earliest cell.

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::TspError;

/// Cell coordinates in compacted (active slot) index space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoords {
    pub row: usize,
    pub column: usize,
}

impl CellCoords {
    #[inline]
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenSet {
    Closed,
    /// Columns of the given row are being collected
    Columns(usize),
    /// Rows of the given column are being collected
    Rows(usize),
}

#[derive(Debug, Clone)]
pub struct CandidateSet {
    cells: Vec<CellCoords>,
    open: OpenSet,
    set_start: usize,
}

impl Default for CandidateSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateSet {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            open: OpenSet::Closed,
            set_start: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Opens a group collecting columns of `row`
    pub fn start_column_set(&mut self, row: usize) {
        self.open = OpenSet::Columns(row);
        self.set_start = self.cells.len();
    }

    pub fn add_column(&mut self, column: usize) -> Result<(), TspError> {
        match self.open {
            OpenSet::Columns(row) => {
                self.cells.push(CellCoords::new(row, column));
                Ok(())
            }
            OpenSet::Rows(_) => Err(TspError::InvalidOperation(
                "A column may not be added to a row set".to_string(),
            )),
            OpenSet::Closed => Err(TspError::InvalidOperation(
                "A column set is not started".to_string(),
            )),
        }
    }

    /// Opens a group collecting rows of `column`
    pub fn start_row_set(&mut self, column: usize) {
        self.open = OpenSet::Rows(column);
        self.set_start = self.cells.len();
    }

    pub fn add_row(&mut self, row: usize) -> Result<(), TspError> {
        match self.open {
            OpenSet::Rows(column) => {
                self.cells.push(CellCoords::new(row, column));
                Ok(())
            }
            OpenSet::Columns(_) => Err(TspError::InvalidOperation(
                "A row may not be added to a column set".to_string(),
            )),
            OpenSet::Closed => Err(TspError::InvalidOperation(
                "A row set is not started".to_string(),
            )),
        }
    }

    /// Drops the cells of the most recent group; the group stays open
    pub fn clear_last_set(&mut self) {
        self.cells.truncate(self.set_start);
    }

    /// Number of cells in the most recent group
    #[inline]
    pub fn last_set_len(&self) -> usize {
        self.cells.len() - self.set_start
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.open = OpenSet::Closed;
        self.set_start = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[CellCoords] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = CellCoords> + '_ {
        self.cells.iter().copied()
    }
}
