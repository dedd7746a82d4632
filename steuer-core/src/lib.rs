pub mod artifact;
pub mod calculations;
pub mod models;

#[cfg(test)]
mod fixtures;

pub use artifact::{ArtifactError, read_report_artifact, write_report_artifact};
pub use calculations::{BusinessReportError, calculate_breakdown, calculate_business_report};
pub use models::*;
