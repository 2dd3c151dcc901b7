//! # reduction-tsp
//!
//! Command-line driver for the reduced cost-matrix TSP heuristic. Reads one
//! or more JSON cost matrices, prints the committed edges and the closed
//! tour with its cost, and optionally traces every reduction step.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use log::{error, info, LevelFilter};

use reduction_tsp_core::{
    assemble, solve_all, CompactionPolicy, CostMatrix, Edge, LogCrateSink, ReductionSolver,
    SolveStats,
};
use reduction_tsp_visualization::{render_edges, render_tour, GridView, TableSink};

mod input;

use input::{load_config, load_matrix, RunConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CompactionArg {
    /// Retire a row or column only if its scan met a blocked cell
    WhenBlocked,
    /// Retire the committed row and column every time
    Always,
}

impl From<CompactionArg> for CompactionPolicy {
    fn from(arg: CompactionArg) -> Self {
        match arg {
            CompactionArg::WhenBlocked => CompactionPolicy::WhenBlocked,
            CompactionArg::Always => CompactionPolicy::Always,
        }
    }
}

/// Command-line interface for reduction-tsp
#[derive(Debug, Parser)]
#[command(name = "reduction-tsp")]
#[command(about = "Greedy reduced cost-matrix tour construction")]
#[command(long_about = "Builds a tour by repeatedly reducing the cost matrix and committing
the zero cell with the largest exclusion penalty:
  reduction-tsp cities.json                  # Solve one matrix
  reduction-tsp a.json b.json c.json         # Solve several in parallel
  reduction-tsp cities.json --trace          # Print every reduction step

Matrix files hold a JSON array of rows, or {\"matrix\": [...]}; null marks a
missing edge.")]
#[command(version = reduction_tsp_core::VERSION)]
struct Cli {
    /// JSON cost matrix files
    #[arg(value_name = "MATRIX", required = true)]
    matrices: Vec<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Tolerance for minimum and zero comparisons
    #[arg(long)]
    epsilon: Option<f64>,

    /// When committed rows and columns leave the active matrix
    #[arg(long, value_enum)]
    compaction: Option<CompactionArg>,

    /// Write a snapshot table of every step to stderr
    #[arg(long)]
    trace: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.target(env_logger::Target::Stderr);
    if verbose > 0 {
        builder.filter_level(match verbose {
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        });
    }
    builder.init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let matrices = cli
        .matrices
        .iter()
        .map(|path| load_matrix(path))
        .collect::<Result<Vec<_>>>()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let labelled = matrices.len() > 1;
    let mut failures = 0;

    if cli.trace || matrices.len() == 1 {
        let solver = ReductionSolver::new(config.solver);
        for (path, matrix) in cli.matrices.iter().zip(&matrices) {
            let mut edges = Vec::with_capacity(matrix.size());
            let solved = if cli.trace {
                let mut sink = TableSink::new(io::stderr(), GridView::new(config.view.clone()));
                solver.solve_with_sink(matrix, &mut edges, &mut sink)
            } else {
                solver.solve_with_sink(matrix, &mut edges, &mut LogCrateSink::default())
            };
            let stats = solved.with_context(|| format!("Failed to solve {}", path.display()))?;
            log_stats(path, &stats);

            if let Err(e) = report(&mut out, path, matrix, &edges, &config, labelled) {
                error!("{e:#}");
                failures += 1;
            }
        }
    } else {
        let results = solve_all(&matrices, &config.solver);
        for ((path, matrix), result) in cli.matrices.iter().zip(&matrices).zip(results) {
            let outcome = result
                .with_context(|| format!("Failed to solve {}", path.display()))
                .and_then(|edges| report(&mut out, path, matrix, &edges, &config, labelled));
            if let Err(e) = outcome {
                error!("{e:#}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} matrices did not yield a tour", matrices.len());
    }
    Ok(())
}

/// Loads `--config` and applies flag overrides
fn resolve_config(cli: &Cli) -> Result<RunConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RunConfig::default(),
    };
    if let Some(epsilon) = cli.epsilon {
        config.solver.epsilon = epsilon;
    }
    if let Some(compaction) = cli.compaction {
        config.solver.compaction = compaction.into();
    }
    config.solver.validate().context("Invalid solver configuration")?;
    Ok(config)
}

fn log_stats(path: &Path, stats: &SolveStats) {
    info!(
        "{}: {} edges from {} candidates in {:?}",
        path.display(),
        stats.iterations,
        stats.candidates_evaluated,
        stats.elapsed
    );
}

/// Prints the committed edges on one line, then the closed tour
///
/// Fails when the edges do not close into a single cycle, which the greedy
/// reduction does not rule out.
fn report<W: Write>(
    out: &mut W,
    path: &Path,
    matrix: &CostMatrix,
    edges: &[Edge],
    config: &RunConfig,
    labelled: bool,
) -> Result<()> {
    if labelled {
        writeln!(out, "== {} ==", path.display())?;
    }
    writeln!(out, "{}", render_edges(edges))?;
    let tour = assemble(matrix, edges).with_context(|| {
        format!(
            "{}: committed edges do not form a single tour (the reduction heuristic does not eliminate subtours)",
            path.display()
        )
    })?;
    writeln!(out, "{}", render_tour(matrix, &tour, config.view.precision))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const M: f64 = f64::NAN;

    fn report_to_string(matrix: &CostMatrix, edges: &[Edge], labelled: bool) -> Result<String> {
        let mut out = Vec::new();
        report(
            &mut out,
            Path::new("cities.json"),
            matrix,
            edges,
            &RunConfig::default(),
            labelled,
        )?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "reduction-tsp",
            "a.json",
            "--epsilon",
            "0.001",
            "--compaction",
            "always",
            "-vv",
        ]);
        let config = resolve_config(&cli).unwrap();

        assert_eq!(config.solver.epsilon, 0.001);
        assert_eq!(config.solver.compaction, CompactionPolicy::Always);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_invalid_epsilon_is_rejected() {
        let cli = Cli::parse_from(["reduction-tsp", "a.json", "--epsilon", "0"]);
        assert!(resolve_config(&cli).is_err());
    }

    #[test]
    fn test_matrix_argument_is_required() {
        assert!(Cli::try_parse_from(["reduction-tsp"]).is_err());
    }

    #[test]
    fn test_report_prints_edges_and_tour() {
        let matrix = CostMatrix::from_rows(vec![
            vec![M, 5.0, 11.0, 9.0],
            vec![10.0, M, 8.0, 7.0],
            vec![7.0, 14.0, M, 8.0],
            vec![12.0, 6.0, 15.0, M],
        ])
        .unwrap();
        let mut edges = Vec::new();
        ReductionSolver::default().solve(&matrix, &mut edges).unwrap();

        let output = report_to_string(&matrix, &edges, true).unwrap();
        assert_eq!(
            output,
            "== cities.json ==\n3 -> 1, 1 -> 2, 0 -> 3\n\
             0 --[9]--> 3 --[6]--> 1 --[8]--> 2 --[7]--> 0 = 30\n"
        );
    }

    #[test]
    fn test_report_flags_subtours() {
        let matrix = CostMatrix::from_rows(vec![
            vec![M, 3.0, 93.0, 13.0, 33.0, 9.0],
            vec![3.0, M, 77.0, 42.0, 21.0, 16.0],
            vec![93.0, 77.0, M, 36.0, 16.0, 28.0],
            vec![13.0, 42.0, 36.0, M, 56.0, 7.0],
            vec![33.0, 21.0, 16.0, 56.0, M, 25.0],
            vec![9.0, 16.0, 28.0, 7.0, 25.0, M],
        ])
        .unwrap();
        let mut edges = Vec::new();
        ReductionSolver::default().solve(&matrix, &mut edges).unwrap();

        let err = report_to_string(&matrix, &edges, false).unwrap_err();
        assert!(format!("{err:#}").contains("subtour"));
    }
}
