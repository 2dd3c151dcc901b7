//! Parallel solving of independent matrices
//!
//! Every solve owns its statistics, candidate set and forbidden matrix while
//! the cost matrices are only read, so the work splits across the rayon pool
//! without synchronisation.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::info;
use rayon::prelude::*;

use crate::algorithm::reduction::{ReductionSolver, SolverConfig};
use crate::algorithm::traits::{Edge, TspError};
use crate::data_structures::cost_matrix::CostMatrix;

/// Solves every matrix, returning the committed edges in input order
pub fn solve_all(
    matrices: &[CostMatrix],
    config: &SolverConfig,
) -> Vec<Result<Vec<Edge>, TspError>> {
    let solver = ReductionSolver::new(*config);
    let results: Vec<Result<Vec<Edge>, TspError>> = matrices
        .par_iter()
        .map(|matrix| {
            let mut edges = Vec::with_capacity(matrix.size());
            solver.solve(matrix, &mut edges).map(|_| edges)
        })
        .collect();

    let failed = results.iter().filter(|result| result.is_err()).count();
    info!(
        "Solved {} matrices in parallel ({failed} failed)",
        matrices.len()
    );
    results
}
