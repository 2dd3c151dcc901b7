//! Reduced cost-matrix edge selection for the Traveling Salesman Problem
//!
//! The engine repeatedly reduces the active sub-matrix of a square cost
//! matrix, ranks the zero cells by the penalty of excluding them and commits
//! the best one, streaming `n - 1` directed edges to a [`PathConsumer`]. It is
//! a greedy heuristic: there is no branching, no bound and no subtour
//! elimination beyond forbidding the reverse of each committed edge.
//!
//! ```no_run
//! use reduction_tsp_core::{CostMatrix, TourBuilder, ReductionSolver};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let m = f64::NAN;
//! let matrix = CostMatrix::from_rows(vec![
//!     vec![m, 5.0, 11.0, 9.0],
//!     vec![10.0, m, 8.0, 7.0],
//!     vec![7.0, 14.0, m, 8.0],
//!     vec![12.0, 6.0, 15.0, m],
//! ])?;
//! let mut builder = TourBuilder::new(&matrix);
//! ReductionSolver::default().solve(&matrix, &mut builder)?;
//! let tour = builder.finish()?;
//! assert_eq!(tour.total_cost, 30.0);
//! # Ok(())
//! # }
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod data_structures;
pub mod execution;

pub use algorithm::reduction::{
    solve, solve_rows, CompactionPolicy, ReductionSolver, SolverConfig, DEFAULT_EPSILON,
};
pub use algorithm::traits::{
    AlgorithmComplexity, Edge, NodeId, PathConsumer, SolveStats, TspError, TspHeuristic,
};
pub use data_structures::cost_matrix::CostMatrix;
pub use execution::batch::solve_all;
pub use execution::tour::{assemble, Tour, TourBuilder, TourError};
pub use execution::tracer::{
    AxisStat, LogCrateSink, LogSink, MatrixSnapshot, NullSink, SnapshotPhase, SnapshotRecorder,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
