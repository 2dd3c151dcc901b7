//! Reduction and selection orchestrator
//!
//! Every iteration runs the same pipeline over the active slots:
//!
//! 1. Row pass: find each row's minimum, second minimum and the columns tying
//!    the minimum (recorded as candidate cells), then fold the row-reduced
//!    values into running column statistics.
//! 2. Column pass: a column whose running minimum is already zero gets its
//!    penalty directly; any other column is re-scanned against the
//!    row-reduced values to register the zeros that column reduction exposes.
//! 3. Row penalties are finalised.
//! 4. The candidate with the largest row + column penalty is committed; the
//!    first one found wins a tie.
//!
//! Exactly `n - 1` edges are committed. The engine never backtracks, and it
//! forbids only the direct reverse of each committed edge, so the edges may
//! describe subtours on some inputs. Closing and validating the cycle is
//! left to the path consumer.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::time::Instant;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::stat_list::{CompactionPolicy, SlotStat, StatList};
use super::zero_cells::{CandidateSet, CellCoords};
use crate::algorithm::traits::{
    AlgorithmComplexity, Edge, PathConsumer, SolveStats, TspError, TspHeuristic,
};
use crate::data_structures::cost_matrix::CostMatrix;
use crate::execution::tracer::{AxisStat, LogSink, MatrixSnapshot, NullSink, SnapshotPhase};

/// Absolute tolerance for minimum and zero comparisons
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Solver configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Values closer than this are treated as tied
    pub epsilon: f64,
    /// When committed slots leave the active set
    pub compaction: CompactionPolicy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            compaction: CompactionPolicy::default(),
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), TspError> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(TspError::InvalidInput(format!(
                "epsilon must be a positive finite number, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

/// Greedy reduced cost-matrix edge selection
#[derive(Debug, Clone, Default)]
pub struct ReductionSolver {
    config: SolverConfig,
}

impl ReductionSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Streams the committed edges of `matrix` into `consumer`
    pub fn solve<C>(&self, matrix: &CostMatrix, consumer: &mut C) -> Result<SolveStats, TspError>
    where
        C: PathConsumer + ?Sized,
    {
        self.solve_with_sink(matrix, consumer, &mut NullSink)
    }

    /// Like [`solve`](Self::solve), additionally reporting snapshots to `sink`
    pub fn solve_with_sink<C, S>(
        &self,
        matrix: &CostMatrix,
        consumer: &mut C,
        sink: &mut S,
    ) -> Result<SolveStats, TspError>
    where
        C: PathConsumer + ?Sized,
        S: LogSink + ?Sized,
    {
        self.config.validate()?;
        let started = Instant::now();
        let size = matrix.size();
        let mut run = Reduction::new(matrix, &self.config, sink);
        let mut stats = SolveStats::default();

        run.log(SnapshotPhase::Initial);

        for iteration in 1..size {
            for row in 0..run.stats.row_count() {
                run.process_row(row)?;
            }
            for column in 0..run.stats.column_count() {
                run.process_column(column)?;
            }
            run.finalize_row_terms();
            run.log(SnapshotPhase::Reduced { iteration });

            stats.candidates_evaluated += run.candidates.len();
            let cell = run.select().ok_or(TspError::NoCandidate { iteration })?;
            let penalty = run.stats.sum(cell);
            let (edge, outcome) = run.stats.commit_edge(cell);
            debug!(
                "Iteration {iteration}: committed {edge} from {} candidates (penalty {penalty:?})",
                run.candidates.len()
            );

            stats.iterations += 1;
            stats.rows_compacted += usize::from(outcome.row_compacted);
            stats.columns_compacted += usize::from(outcome.column_compacted);
            consumer.accept(edge);

            run.candidates.clear();
            run.stats.reset();
            run.log(SnapshotPhase::Committed { iteration, edge });
        }

        stats.elapsed = started.elapsed();
        debug!(
            "Reduction finished: {} edges, {} rows and {} columns compacted in {:?}",
            stats.iterations, stats.rows_compacted, stats.columns_compacted, stats.elapsed
        );
        Ok(stats)
    }
}

impl TspHeuristic for ReductionSolver {
    fn name(&self) -> &'static str {
        "Reduced cost-matrix edge selection"
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            time_complexity: "O(n^3)".to_string(),
            space_complexity: "O(n^2)".to_string(),
        }
    }

    fn solve(
        &self,
        matrix: &CostMatrix,
        consumer: &mut dyn PathConsumer,
    ) -> Result<SolveStats, TspError> {
        ReductionSolver::solve(self, matrix, consumer)
    }
}

/// Mutable state of one solve
struct Reduction<'a, S: ?Sized> {
    matrix: &'a CostMatrix,
    epsilon: f64,
    stats: StatList,
    candidates: CandidateSet,
    sink: &'a mut S,
}

impl<'a, S: LogSink + ?Sized> Reduction<'a, S> {
    fn new(matrix: &'a CostMatrix, config: &SolverConfig, sink: &'a mut S) -> Self {
        let size = matrix.size();
        Self {
            matrix,
            epsilon: config.epsilon,
            stats: StatList::new(size, config.compaction),
            candidates: CandidateSet::with_capacity(2 * size),
            sink,
        }
    }

    /// Cost of `src -> dst` unless the edge is forbidden or absent
    #[inline]
    fn available(&self, src: usize, dst: usize) -> Option<f64> {
        if self.stats.is_forbidden(src, dst) {
            None
        } else {
            self.matrix.cost(src, dst)
        }
    }

    fn process_row(&mut self, row: usize) -> Result<(), TspError> {
        let epsilon = self.epsilon;
        let column_count = self.stats.column_count();
        let src = self.stats.row(row).mx_index;
        self.candidates.start_column_set(row);

        let mut min: Option<f64> = None;
        let mut second_min: Option<f64> = None;
        for column in 0..column_count {
            let dst = self.stats.column(column).mx_index;
            let Some(value) = self.available(src, dst) else {
                let (row_stat, column_stat) = self.stats.row_and_column_mut(row, column);
                row_stat.blocked_cells += 1;
                column_stat.blocked_cells += 1;
                continue;
            };
            match min {
                None => {
                    min = Some(value);
                    self.candidates.add_column(column)?;
                }
                Some(current) if (value - current).abs() < epsilon => {
                    self.candidates.add_column(column)?;
                }
                Some(current) if value < current => {
                    second_min = Some(current);
                    min = Some(value);
                    self.candidates.clear_last_set();
                    self.candidates.add_column(column)?;
                }
                Some(_) => {
                    if second_min.map_or(true, |second| value < second) {
                        second_min = Some(value);
                    }
                }
            }
        }

        let row_stat = self.stats.row_mut(row);
        row_stat.min = min;
        row_stat.second_min = second_min;
        row_stat.min_count = self.candidates.last_set_len();

        // Reduce the row and feed the reduced values to the column statistics
        let row_min = min.unwrap_or(0.0);
        for column in 0..column_count {
            let dst = self.stats.column(column).mx_index;
            if let Some(value) = self.available(src, dst) {
                self.stats.column_mut(column).observe(value - row_min, epsilon);
            }
        }
        Ok(())
    }

    fn process_column(&mut self, column: usize) -> Result<(), TspError> {
        let column_stat = *self.stats.column(column);
        if !column_stat.has_zero_min() {
            // Zeros exposed only by column reduction become candidates too
            let dst = column_stat.mx_index;
            let column_min = column_stat.min.unwrap_or(0.0);
            self.candidates.start_row_set(column);
            for row in 0..self.stats.row_count() {
                let row_stat = *self.stats.row(row);
                let Some(value) = self.available(row_stat.mx_index, dst) else {
                    continue;
                };
                if value - (row_stat.min.unwrap_or(0.0) + column_min) < self.epsilon {
                    self.stats.row_mut(row).min_count += 1;
                    self.candidates.add_row(row)?;
                }
            }
        }
        // With a zero minimum this is the second minimum itself
        self.stats.column_mut(column).term = column_stat.penalty();
        Ok(())
    }

    fn finalize_row_terms(&mut self) {
        for row in 0..self.stats.row_count() {
            let row_stat = self.stats.row_mut(row);
            row_stat.term = row_stat.penalty();
            trace!(
                "row {}: min {:?}, second {:?}, ties {}, term {:?}",
                row_stat.mx_index,
                row_stat.min,
                row_stat.second_min,
                row_stat.min_count,
                row_stat.term
            );
        }
    }

    /// Candidate with the largest combined penalty, earliest on ties
    ///
    /// An undefined penalty never beats, and is never beaten by, another.
    fn select(&self) -> Option<CellCoords> {
        let mut cells = self.candidates.iter();
        let first = cells.next()?;
        let mut best = (first, self.stats.sum(first));
        for cell in cells {
            let sum = self.stats.sum(cell);
            if let (Some(candidate), Some(current)) = (sum, best.1) {
                if candidate > current {
                    best = (cell, sum);
                }
            }
        }
        Some(best.0)
    }

    fn log(&mut self, phase: SnapshotPhase) {
        if self.sink.is_enabled() {
            let snapshot = self.snapshot(phase);
            self.sink.record(&snapshot);
        }
    }

    fn snapshot(&self, phase: SnapshotPhase) -> MatrixSnapshot {
        let mut rows: Vec<AxisStat> = self.stats.active_rows().iter().map(axis_stat).collect();
        let mut columns: Vec<AxisStat> =
            self.stats.active_columns().iter().map(axis_stat).collect();
        rows.sort_by_key(|stat| stat.index);
        columns.sort_by_key(|stat| stat.index);

        let cells = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| self.available(row.index, column.index))
                    .collect()
            })
            .collect();

        MatrixSnapshot {
            phase,
            rows,
            columns,
            cells,
        }
    }
}

fn axis_stat(slot: &SlotStat) -> AxisStat {
    AxisStat {
        index: slot.mx_index,
        min: slot.min,
        second_min: slot.second_min,
        min_count: slot.min_count,
        term: slot.term,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::tracer::SnapshotRecorder;
    use proptest::prelude::*;
    use std::collections::HashSet;

    const M: f64 = f64::NAN;

    fn scenario_a() -> CostMatrix {
        CostMatrix::from_rows(vec![
            vec![M, 5.0, 11.0, 9.0],
            vec![10.0, M, 8.0, 7.0],
            vec![7.0, 14.0, M, 8.0],
            vec![12.0, 6.0, 15.0, M],
        ])
        .unwrap()
    }

    fn symmetric_six() -> CostMatrix {
        CostMatrix::from_rows(vec![
            vec![M, 27.0, 5.0, 6.0, 4.0, 38.0],
            vec![27.0, M, 16.0, 36.0, 37.0, 4.0],
            vec![5.0, 16.0, M, 28.0, 8.0, 37.0],
            vec![6.0, 36.0, 28.0, M, 15.0, 38.0],
            vec![4.0, 37.0, 8.0, 15.0, M, 26.0],
            vec![38.0, 4.0, 37.0, 38.0, 26.0, M],
        ])
        .unwrap()
    }

    fn edges(pairs: &[(usize, usize)]) -> Vec<Edge> {
        pairs.iter().copied().map(Edge::from).collect()
    }

    fn run(matrix: &CostMatrix, compaction: CompactionPolicy) -> Vec<Edge> {
        let solver = ReductionSolver::new(SolverConfig {
            compaction,
            ..SolverConfig::default()
        });
        let mut committed = Vec::new();
        solver.solve(matrix, &mut committed).unwrap();
        committed
    }

    #[test]
    fn test_scenario_a_commits_three_edges() {
        let expected = edges(&[(3, 1), (1, 2), (0, 3)]);
        assert_eq!(run(&scenario_a(), CompactionPolicy::WhenBlocked), expected);
        assert_eq!(run(&scenario_a(), CompactionPolicy::Always), expected);
    }

    #[test]
    fn test_symmetric_six_commits_five_edges() {
        let committed = run(&symmetric_six(), CompactionPolicy::WhenBlocked);
        assert_eq!(committed, edges(&[(1, 5), (2, 1), (5, 4), (3, 0), (0, 2)]));
    }

    #[test]
    fn test_two_node_matrix_commits_single_edge() {
        let matrix = CostMatrix::from_rows(vec![vec![M, 4.0], vec![9.0, M]]).unwrap();
        assert_eq!(run(&matrix, CompactionPolicy::WhenBlocked), edges(&[(0, 1)]));
    }

    #[test]
    fn test_off_diagonal_no_edge_cells_are_skipped() {
        let matrix = CostMatrix::from_rows(vec![
            vec![M, M, 11.0, 9.0],
            vec![10.0, M, 8.0, 7.0],
            vec![7.0, 14.0, M, M],
            vec![12.0, 6.0, 15.0, M],
        ])
        .unwrap();
        assert_eq!(
            run(&matrix, CompactionPolicy::WhenBlocked),
            edges(&[(3, 1), (0, 3), (2, 0)])
        );
    }

    #[test]
    fn test_equal_penalties_keep_first_found_cell() {
        let matrix = CostMatrix::from_rows(
            (0..4)
                .map(|i| (0..4).map(|j| if i == j { M } else { 1.0 }).collect())
                .collect(),
        )
        .unwrap();
        assert_eq!(
            run(&matrix, CompactionPolicy::WhenBlocked),
            edges(&[(0, 1), (3, 0), (2, 3)])
        );
    }

    #[test]
    fn test_conditional_compaction_can_reuse_a_source() {
        // Known limitation of the reference compaction rule
        let matrix = CostMatrix::from_rows(vec![
            vec![M, 2.0, 9.0, 10.0, 7.0, 3.0],
            vec![2.0, M, 6.0, 4.0, 3.0, 8.0],
            vec![9.0, 6.0, M, 8.0, 5.0, 7.0],
            vec![10.0, 4.0, 8.0, M, 6.0, 9.0],
            vec![7.0, 3.0, 5.0, 6.0, M, 2.0],
            vec![3.0, 8.0, 7.0, 9.0, 2.0, M],
        ])
        .unwrap();

        assert_eq!(
            run(&matrix, CompactionPolicy::WhenBlocked),
            edges(&[(3, 1), (0, 5), (5, 4), (4, 2), (4, 3)])
        );
        assert_eq!(
            run(&matrix, CompactionPolicy::Always),
            edges(&[(3, 1), (0, 5), (5, 4), (4, 2), (2, 3)])
        );
    }

    #[test]
    fn test_stats_count_iterations_and_compactions() {
        let solver = ReductionSolver::default();
        let mut committed = Vec::new();
        let stats = solver.solve(&scenario_a(), &mut committed).unwrap();

        assert_eq!(stats.iterations, 3);
        assert_eq!(stats.rows_compacted, 3);
        assert_eq!(stats.columns_compacted, 2);
        assert!(stats.candidates_evaluated >= 3);
    }

    #[test]
    fn test_invalid_epsilon_fails_before_any_edge() {
        let solver = ReductionSolver::new(SolverConfig {
            epsilon: 0.0,
            ..SolverConfig::default()
        });
        let mut committed = Vec::new();
        let result = solver.solve(&scenario_a(), &mut committed);

        assert!(matches!(result, Err(TspError::InvalidInput(_))));
        assert!(committed.is_empty());
    }

    #[test]
    fn test_snapshots_follow_each_phase() {
        let mut recorder = SnapshotRecorder::new();
        let mut committed = Vec::new();
        ReductionSolver::default()
            .solve_with_sink(&scenario_a(), &mut committed, &mut recorder)
            .unwrap();
        let snapshots = recorder.into_inner();

        assert_eq!(snapshots.len(), 7);
        assert_eq!(snapshots[0].phase, SnapshotPhase::Initial);
        assert_eq!(snapshots[0].cells.len(), 4);

        let reduced = &snapshots[1];
        assert_eq!(reduced.phase, SnapshotPhase::Reduced { iteration: 1 });
        assert_eq!(reduced.row_terms(), vec![Some(4.0), Some(0.0), Some(1.0), Some(6.0)]);
        assert_eq!(reduced.column_terms(), vec![Some(3.0), Some(0.0), Some(5.0), Some(1.0)]);
        let row_mins: Vec<Option<f64>> = reduced.rows.iter().map(|stat| stat.min).collect();
        assert_eq!(row_mins, vec![Some(5.0), Some(7.0), Some(7.0), Some(6.0)]);

        let committed_phase = &snapshots[2];
        assert_eq!(
            committed_phase.phase,
            SnapshotPhase::Committed {
                iteration: 1,
                edge: Edge::new(3, 1)
            }
        );
        let row_indices: Vec<usize> = committed_phase.rows.iter().map(|stat| stat.index).collect();
        let column_indices: Vec<usize> =
            committed_phase.columns.iter().map(|stat| stat.index).collect();
        assert_eq!(row_indices, vec![0, 1, 2]);
        assert_eq!(column_indices, vec![0, 2, 3]);
        assert_eq!(
            committed_phase.cells,
            vec![
                vec![None, Some(11.0), Some(9.0)],
                vec![Some(10.0), Some(8.0), None],
                vec![Some(7.0), None, Some(8.0)],
            ]
        );
    }

    #[test]
    fn test_sink_does_not_change_results() {
        let matrix = symmetric_six();
        let mut plain = Vec::new();
        let mut traced = Vec::new();
        let solver = ReductionSolver::default();
        solver.solve(&matrix, &mut plain).unwrap();
        solver
            .solve_with_sink(&matrix, &mut traced, &mut SnapshotRecorder::new())
            .unwrap();
        assert_eq!(plain, traced);
    }

    #[test]
    fn test_heuristic_trait_object() {
        let heuristic: Box<dyn TspHeuristic> = Box::new(ReductionSolver::default());
        let mut committed: Vec<Edge> = Vec::new();
        let stats = heuristic.solve(&scenario_a(), &mut committed).unwrap();

        assert_eq!(stats.iterations, 3);
        assert_eq!(heuristic.complexity().time_complexity, "O(n^3)");
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: SolverConfig = serde_json::from_str(r#"{"compaction": "always"}"#).unwrap();
        assert_eq!(config.compaction, CompactionPolicy::Always);
        assert_eq!(config.epsilon, DEFAULT_EPSILON);
    }

    fn integer_matrix() -> impl Strategy<Value = Vec<Vec<f64>>> {
        (2usize..8).prop_flat_map(|n| {
            prop::collection::vec(prop::collection::vec(1u32..40, n), n).prop_map(|rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(i, row)| {
                        row.into_iter()
                            .enumerate()
                            .map(|(j, cost)| if i == j { M } else { f64::from(cost) })
                            .collect()
                    })
                    .collect()
            })
        })
    }

    fn policy() -> impl Strategy<Value = CompactionPolicy> {
        prop_oneof![Just(CompactionPolicy::WhenBlocked), Just(CompactionPolicy::Always)]
    }

    proptest! {
        #[test]
        fn test_commits_n_minus_one_distinct_edges(rows in integer_matrix(), compaction in policy()) {
            let n = rows.len();
            let matrix = CostMatrix::from_rows(rows).unwrap();
            let committed = run(&matrix, compaction);

            prop_assert_eq!(committed.len(), n - 1);
            let unique: HashSet<Edge> = committed.iter().copied().collect();
            prop_assert_eq!(unique.len(), committed.len());
            for edge in &committed {
                prop_assert_ne!(edge.src, edge.dst);
                prop_assert!(!unique.contains(&edge.reversed()));
            }
        }

        #[test]
        fn test_always_compaction_uses_each_role_once(rows in integer_matrix()) {
            let matrix = CostMatrix::from_rows(rows).unwrap();
            let committed = run(&matrix, CompactionPolicy::Always);

            let sources: HashSet<_> = committed.iter().map(|edge| edge.src).collect();
            let targets: HashSet<_> = committed.iter().map(|edge| edge.dst).collect();
            prop_assert_eq!(sources.len(), committed.len());
            prop_assert_eq!(targets.len(), committed.len());
        }

        #[test]
        fn test_solve_is_deterministic(rows in integer_matrix(), compaction in policy()) {
            let matrix = CostMatrix::from_rows(rows).unwrap();
            prop_assert_eq!(run(&matrix, compaction), run(&matrix, compaction));
        }

        #[test]
        fn test_pre_reduced_rows_select_same_edges(rows in integer_matrix(), compaction in policy()) {
            let reduced: Vec<Vec<f64>> = rows
                .iter()
                .map(|row| {
                    let min = row
                        .iter()
                        .copied()
                        .filter(|v| !v.is_nan())
                        .fold(f64::INFINITY, f64::min);
                    row.iter().map(|v| v - min).collect()
                })
                .collect();
            let original = CostMatrix::from_rows(rows).unwrap();
            let reduced = CostMatrix::from_rows(reduced).unwrap();

            prop_assert_eq!(run(&original, compaction), run(&reduced, compaction));
        }
    }
}
