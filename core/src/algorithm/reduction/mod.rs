//! Reduced cost-matrix edge selection
//!
//! A greedy member of the Little's-algorithm family: each iteration reduces
//! the active sub-matrix, scores every zero cell by the penalty of leaving it
//! out and commits the highest scoring edge without ever branching.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod solver;
pub mod stat_list;
pub mod zero_cells;

pub use self::solver::{ReductionSolver, SolverConfig, DEFAULT_EPSILON};
pub use self::stat_list::{CommitOutcome, CompactionPolicy, SlotStat, StatList};
pub use self::zero_cells::{CandidateSet, CellCoords};

use crate::algorithm::traits::{PathConsumer, SolveStats, TspError};
use crate::data_structures::cost_matrix::CostMatrix;

/// Solves `matrix` with the default configuration
pub fn solve<C>(matrix: &CostMatrix, consumer: &mut C) -> Result<SolveStats, TspError>
where
    C: PathConsumer + ?Sized,
{
    ReductionSolver::default().solve(matrix, consumer)
}

/// Validates `rows` as a cost matrix, then solves it with the default configuration
pub fn solve_rows<C>(rows: Vec<Vec<f64>>, consumer: &mut C) -> Result<SolveStats, TspError>
where
    C: PathConsumer + ?Sized,
{
    let matrix = CostMatrix::from_rows(rows)?;
    solve(&matrix, consumer)
}
