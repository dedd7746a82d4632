//! Batch calculation of scenario rows into report artifacts.

use std::path::{Path, PathBuf};

use steuer_core::{
    ArtifactError, BusinessReportError, CalculationInput, TaxParameterTable, calculate_breakdown,
    write_report_artifact,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::controls::{self, ControlError};

/// Why a single scenario produced no artifact.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Controls(#[from] ControlError),

    #[error(transparent)]
    Report(#[from] BusinessReportError),

    #[error("failed to write artifact: {0}")]
    Artifact(#[from] ArtifactError),
}

/// Result of one scenario row. Rows are numbered from 1.
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub row: usize,
    pub result: Result<PathBuf, ScenarioError>,
}

/// File name of the artifact written for `row`.
pub fn artifact_name(row: usize) -> String {
    format!("scenario-{row}.json")
}

/// Calculates every scenario and writes its artifact into `out_dir`.
///
/// A failing row is logged and reported in its outcome; the remaining rows
/// are still calculated.
pub fn run_scenarios(
    inputs: Vec<CalculationInput>,
    out_dir: &Path,
    check_bounds: bool,
    params: &TaxParameterTable,
) -> Vec<ScenarioOutcome> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(idx, input)| {
            let row = idx + 1;
            let result = run_one(input, &out_dir.join(artifact_name(row)), check_bounds, params);
            match &result {
                Ok(path) => info!(row, path = %path.display(), "scenario written"),
                Err(error) => warn!(row, %error, "scenario skipped"),
            }
            ScenarioOutcome { row, result }
        })
        .collect()
}

fn run_one(
    input: CalculationInput,
    path: &Path,
    check_bounds: bool,
    params: &TaxParameterTable,
) -> Result<PathBuf, ScenarioError> {
    let input = controls::prepare(input, check_bounds)?;
    let breakdown = calculate_breakdown(&input, params)?;
    Ok(write_report_artifact(&breakdown.report, path)?)
}
