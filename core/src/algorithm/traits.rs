//! Core trait definitions for tour construction heuristics
//!
//! This module establishes the vocabulary shared by every heuristic in the
//! crate: node and edge identifiers expressed in original matrix index space,
//! the error taxonomy, the path consumer contract that receives committed
//! edges, and per-run execution statistics.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::{self, Display};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data_structures::cost_matrix::CostMatrix;

/// Node identifier in original matrix index space
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Directed tour edge committed by a heuristic
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub src: NodeId,
    pub dst: NodeId,
}

impl Edge {
    #[inline]
    pub fn new(src: usize, dst: usize) -> Self {
        Self {
            src: NodeId(src),
            dst: NodeId(dst),
        }
    }

    /// The same edge travelled in the opposite direction
    #[inline]
    pub fn reversed(self) -> Self {
        Self {
            src: self.dst,
            dst: self.src,
        }
    }
}

impl From<(usize, usize)> for Edge {
    fn from((src, dst): (usize, usize)) -> Self {
        Self::new(src, dst)
    }
}

impl Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.src, self.dst)
    }
}

/// Error taxonomy for the reduction engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TspError {
    /// Malformed matrix or configuration, raised before any iteration
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal misuse of an engine data structure
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Every active cell was forbidden, so no edge could be committed
    #[error("No candidate cell remained at iteration {iteration}")]
    NoCandidate { iteration: usize },
}

/// Receiver of committed edges
///
/// Invoked exactly `n - 1` times per solve, in commitment order. The
/// consumer owns the responsibility of closing the cycle with the final
/// edge.
pub trait PathConsumer {
    fn accept(&mut self, edge: Edge);
}

impl PathConsumer for Vec<Edge> {
    fn accept(&mut self, edge: Edge) {
        self.push(edge);
    }
}

impl<C: PathConsumer + ?Sized> PathConsumer for &mut C {
    fn accept(&mut self, edge: Edge) {
        (**self).accept(edge);
    }
}

/// Asymptotic complexity descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmComplexity {
    pub time_complexity: String,
    pub space_complexity: String,
}

/// Execution statistics collected over one solve
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveStats {
    /// Number of committed edges
    pub iterations: usize,
    /// Candidate cells ranked across all iterations
    pub candidates_evaluated: usize,
    pub rows_compacted: usize,
    pub columns_compacted: usize,
    pub elapsed: Duration,
}

/// Tour construction heuristic over a cost matrix
pub trait TspHeuristic {
    /// Descriptive name of the heuristic
    fn name(&self) -> &'static str;

    /// Worst-case complexity in Big-O notation
    fn complexity(&self) -> AlgorithmComplexity;

    /// Streams committed edges into `consumer`
    fn solve(
        &self,
        matrix: &CostMatrix,
        consumer: &mut dyn PathConsumer,
    ) -> Result<SolveStats, TspError>;
}
