//! Matrix storage used by the reduction engine
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod bool_matrix;
pub mod cost_matrix;

pub use self::bool_matrix::BoolMatrix;
pub use self::cost_matrix::CostMatrix;
