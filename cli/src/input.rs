//! Matrix and configuration files
//!
//! A matrix file holds either a bare JSON array of rows or an object with a
//! `matrix` field. `null` cells mark missing edges; the diagonal is ignored.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use reduction_tsp_core::{CostMatrix, SolverConfig};
use reduction_tsp_visualization::GridViewConfig;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MatrixFile {
    Bare(Vec<Vec<Option<f64>>>),
    Wrapped { matrix: Vec<Vec<Option<f64>>> },
}

impl MatrixFile {
    fn into_rows(self) -> Vec<Vec<Option<f64>>> {
        match self {
            Self::Bare(rows) | Self::Wrapped { matrix: rows } => rows,
        }
    }
}

/// Settings read from `--config`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    #[serde(flatten)]
    pub solver: SolverConfig,
    pub view: GridViewConfig,
}

pub fn load_matrix(path: &Path) -> Result<CostMatrix> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read matrix file {}", path.display()))?;
    let file: MatrixFile = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse matrix file {}", path.display()))?;
    let matrix = CostMatrix::try_from(file.into_rows())
        .with_context(|| format!("Invalid matrix in {}", path.display()))?;
    Ok(matrix)
}

pub fn load_config(path: &Path) -> Result<RunConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}
