//! Report artifact persistence.
//!
//! A report is stored as a flat JSON object with sorted keys and two-space
//! indentation. Amounts are written as JSON numbers.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::models::BusinessReport;

/// Errors that can occur while writing or reading a report artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid report artifact: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes `report` to `path`, creating missing parent directories.
///
/// Returns the path written to.
///
/// # Errors
///
/// Returns [`ArtifactError::Io`] if the directories or the file cannot be
/// created or written.
pub fn write_report_artifact(
    report: &BusinessReport,
    path: impl AsRef<Path>,
) -> Result<PathBuf, ArtifactError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    // Going through a Value sorts the keys.
    let value = serde_json::to_value(report)?;

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    debug!(path = %path.display(), "wrote report artifact");
    Ok(path.to_path_buf())
}

/// Reads a report artifact previously written by [`write_report_artifact`].
///
/// # Errors
///
/// Returns [`ArtifactError`] if the file cannot be opened or does not hold a
/// complete report.
pub fn read_report_artifact(path: impl AsRef<Path>) -> Result<BusinessReport, ArtifactError> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let report = serde_json::from_reader(reader)?;
    Ok(report)
}
