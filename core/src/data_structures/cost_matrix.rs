//! Square edge-cost matrix
//!
//! Read-only view over the costs of every directed edge. A NaN cell marks a
//! disallowed edge; the diagonal is never eligible regardless of its stored
//! value. Reduction never writes back into the matrix, so one instance may be
//! shared by any number of concurrent solves.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use crate::algorithm::traits::TspError;

/// Smallest matrix the reduction engine accepts
pub const MIN_SIZE: usize = 2;

/// Row-major square matrix of edge costs
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl CostMatrix {
    /// Builds a matrix from rows, `f64::NAN` marking a no-edge cell
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, TspError> {
        let size = rows.len();
        if size < MIN_SIZE {
            return Err(too_small(size));
        }
        let mut cells = Vec::with_capacity(size * size);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(TspError::InvalidInput(format!(
                    "The distance matrix must be square: row {index} has {} columns, expected {size}",
                    row.len()
                )));
            }
            cells.extend(row);
        }
        Ok(Self { size, cells })
    }

    /// Builds a matrix from `size * size` row-major cells
    pub fn from_flat(size: usize, cells: Vec<f64>) -> Result<Self, TspError> {
        if size < MIN_SIZE {
            return Err(too_small(size));
        }
        if size.checked_mul(size) != Some(cells.len()) {
            return Err(TspError::InvalidInput(format!(
                "The distance matrix must be square: {} cells cannot form a {size}x{size} matrix",
                cells.len()
            )));
        }
        Ok(Self { size, cells })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw stored value, NaN for a no-edge cell
    #[inline]
    pub fn raw(&self, src: usize, dst: usize) -> f64 {
        self.cells[src * self.size + dst]
    }

    /// Cost of edge `src -> dst`, `None` when the edge does not exist
    #[inline]
    pub fn cost(&self, src: usize, dst: usize) -> Option<f64> {
        let value = self.raw(src, dst);
        if src == dst || value.is_nan() {
            None
        } else {
            Some(value)
        }
    }

    /// Row `src` as a slice of raw values
    #[inline]
    pub fn row(&self, src: usize) -> &[f64] {
        let start = src * self.size;
        &self.cells[start..start + self.size]
    }

    /// Rows with `None` in place of every no-edge cell
    pub fn to_rows(&self) -> Vec<Vec<Option<f64>>> {
        (0..self.size)
            .map(|src| (0..self.size).map(|dst| self.cost(src, dst)).collect())
            .collect()
    }
}

impl TryFrom<Vec<Vec<Option<f64>>>> for CostMatrix {
    type Error = TspError;

    fn try_from(rows: Vec<Vec<Option<f64>>>) -> Result<Self, Self::Error> {
        Self::from_rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(|cell| cell.unwrap_or(f64::NAN)).collect())
                .collect(),
        )
    }
}

fn too_small(size: usize) -> TspError {
    TspError::InvalidInput(format!(
        "The size of the distance matrix must be at least {MIN_SIZE}, got {size}"
    ))
}
