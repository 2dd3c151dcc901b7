//! Tour assembly from committed edges
//!
//! [`TourBuilder`] is a [`PathConsumer`] that collects the `n - 1` edges
//! streamed by a heuristic, then closes the cycle with the one remaining
//! edge. The reduction engine does not guard against subtours, so assembly
//! checks that the result really is a single Hamiltonian cycle.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::debug;
use thiserror::Error;

use crate::algorithm::traits::{Edge, NodeId, PathConsumer};
use crate::data_structures::cost_matrix::CostMatrix;

/// Reasons a set of committed edges does not form a tour
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TourError {
    #[error("Expected {expected} committed edges, got {actual}")]
    EdgeCount { expected: usize, actual: usize },

    #[error("Node {0} leaves on more than one edge")]
    DuplicateSource(NodeId),

    #[error("Node {0} is entered on more than one edge")]
    DuplicateTarget(NodeId),

    /// The only open node would have to connect to itself
    #[error("Node {0} cannot close the cycle")]
    Unclosable(NodeId),

    #[error("Edges form a subtour {cycle:?} instead of a single cycle")]
    Subtour { cycle: Vec<NodeId> },

    /// The edge is out of range or has no cost in the matrix
    #[error("Edge {0} is not present in the matrix")]
    MissingEdge(Edge),
}

/// Closed Hamiltonian cycle
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    /// Visiting order starting at node 0
    pub order: Vec<NodeId>,
    /// All `n` edges in visiting order, the last one returning to node 0
    pub edges: Vec<Edge>,
    pub total_cost: f64,
}

impl Tour {
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Path consumer assembling a [`Tour`]
#[derive(Debug, Clone)]
pub struct TourBuilder<'a> {
    matrix: &'a CostMatrix,
    edges: Vec<Edge>,
}

impl<'a> TourBuilder<'a> {
    pub fn new(matrix: &'a CostMatrix) -> Self {
        Self {
            matrix,
            edges: Vec::with_capacity(matrix.size()),
        }
    }

    /// Edges received so far, in commitment order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Closes the cycle and validates it
    pub fn finish(self) -> Result<Tour, TourError> {
        let size = self.matrix.size();
        if self.edges.len() + 1 != size {
            return Err(TourError::EdgeCount {
                expected: size - 1,
                actual: self.edges.len(),
            });
        }

        let mut next: Vec<Option<usize>> = vec![None; size];
        let mut entered = vec![false; size];
        for &edge in &self.edges {
            let (src, dst) = (edge.src.as_usize(), edge.dst.as_usize());
            if src >= size || dst >= size {
                return Err(TourError::MissingEdge(edge));
            }
            if next[src].is_some() {
                return Err(TourError::DuplicateSource(edge.src));
            }
            if entered[dst] {
                return Err(TourError::DuplicateTarget(edge.dst));
            }
            next[src] = Some(dst);
            entered[dst] = true;
        }

        // With n - 1 distinct sources and targets exactly one of each is open
        let from = next
            .iter()
            .position(Option::is_none)
            .ok_or(TourError::EdgeCount {
                expected: size - 1,
                actual: self.edges.len(),
            })?;
        let to = entered
            .iter()
            .position(|&seen| !seen)
            .ok_or(TourError::EdgeCount {
                expected: size - 1,
                actual: self.edges.len(),
            })?;
        if from == to {
            return Err(TourError::Unclosable(NodeId(from)));
        }
        next[from] = Some(to);
        debug!("Closing edge {from} -> {to}");

        let mut order = Vec::with_capacity(size);
        let mut edges = Vec::with_capacity(size);
        let mut total_cost = 0.0;
        let mut node = 0;
        loop {
            order.push(NodeId(node));
            let Some(following) = next[node] else {
                return Err(TourError::Unclosable(NodeId(node)));
            };
            let edge = Edge::new(node, following);
            let cost = self
                .matrix
                .cost(node, following)
                .ok_or(TourError::MissingEdge(edge))?;
            total_cost += cost;
            edges.push(edge);
            node = following;
            if node == 0 {
                break;
            }
        }

        if order.len() != size {
            return Err(TourError::Subtour { cycle: order });
        }
        Ok(Tour {
            order,
            edges,
            total_cost,
        })
    }
}

impl PathConsumer for TourBuilder<'_> {
    fn accept(&mut self, edge: Edge) {
        self.edges.push(edge);
    }
}

/// Assembles a tour from already collected edges
pub fn assemble(matrix: &CostMatrix, edges: &[Edge]) -> Result<Tour, TourError> {
    let mut builder = TourBuilder::new(matrix);
    edges.iter().for_each(|&edge| builder.accept(edge));
    builder.finish()
}
