//! Tour construction algorithms
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod reduction;
pub mod traits;

pub use self::reduction::{ReductionSolver, SolverConfig};
pub use self::traits::*;
