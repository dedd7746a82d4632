//! CSV loader for batch report scenarios.
//!
//! ## CSV Format
//!
//! One scenario per row. Column order does **not** matter (headers are
//! matched by name). Header names are case-sensitive. Empty cells and
//! missing optional columns fall back to the baseline scenario
//! ([`CalculationInput::default`]).
//!
//! | Column | Required | Type | Default |
//! |--------|----------|------|---------|
//! | `revenue` | yes | decimal | |
//! | `costs` | yes | decimal | |
//! | `director_salary` | yes | decimal | |
//! | `tax_year` | no | integer | `2025` |
//! | `trade_tax_multiplier` | no | decimal | `250` |
//! | `other_income` | no | decimal | `0` |
//! | `other_deductible_expenses` | no | decimal | `5000` |
//! | `statutory_insurance` | no | `true`/`false` | `true` |
//! | `supplementary_rate` | no | decimal | `2.45` |
//! | `sick_pay` | no | `true`/`false` | `true` |
//! | `care_surcharge` | no | `true`/`false` | `true` |
//! | `private_premium_monthly` | no | decimal | `1000` |
//! | `insurance_deductible_percent` | no | decimal | `100` |
//! | `married` | no | `true`/`false` | `false` |
//! | `spouse_taxable_income` | no | decimal | `0` |
//!
//! ### Minimal example
//!
//! ```csv
//! revenue,costs,director_salary
//! 170000,15000,30000
//! ```
//!
//! ### Married example
//!
//! ```csv
//! tax_year,trade_tax_multiplier,revenue,costs,director_salary,other_income,other_deductible_expenses,married,spouse_taxable_income
//! 2025,350,220000,25000,48000,5000,6000,true,10000
//! ```
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use steuer_core::CalculationInput;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    revenue: Decimal,
    costs: Decimal,
    director_salary: Decimal,
    #[serde(default)]
    tax_year: Option<i32>,
    #[serde(default)]
    trade_tax_multiplier: Option<Decimal>,
    #[serde(default)]
    other_income: Option<Decimal>,
    #[serde(default)]
    other_deductible_expenses: Option<Decimal>,
    #[serde(default)]
    statutory_insurance: Option<bool>,
    #[serde(default)]
    supplementary_rate: Option<Decimal>,
    #[serde(default)]
    sick_pay: Option<bool>,
    #[serde(default)]
    care_surcharge: Option<bool>,
    #[serde(default)]
    private_premium_monthly: Option<Decimal>,
    #[serde(default)]
    insurance_deductible_percent: Option<Decimal>,
    #[serde(default)]
    married: Option<bool>,
    #[serde(default)]
    spouse_taxable_income: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading scenario CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The scenario file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

impl CsvRow {
    /// Fills the cells left empty with the baseline scenario.
    fn into_input(self) -> CalculationInput {
        let defaults = CalculationInput::default();
        CalculationInput {
            tax_year: self.tax_year.unwrap_or(defaults.tax_year),
            trade_tax_multiplier: self
                .trade_tax_multiplier
                .unwrap_or(defaults.trade_tax_multiplier),
            revenue: self.revenue,
            costs: self.costs,
            director_salary: self.director_salary,
            other_income: self.other_income.unwrap_or(defaults.other_income),
            other_deductible_expenses: self
                .other_deductible_expenses
                .unwrap_or(defaults.other_deductible_expenses),
            statutory_insurance: self
                .statutory_insurance
                .unwrap_or(defaults.statutory_insurance),
            supplementary_rate: self
                .supplementary_rate
                .unwrap_or(defaults.supplementary_rate),
            sick_pay: self.sick_pay.unwrap_or(defaults.sick_pay),
            care_surcharge: self.care_surcharge.unwrap_or(defaults.care_surcharge),
            private_premium_monthly: self
                .private_premium_monthly
                .unwrap_or(defaults.private_premium_monthly),
            insurance_deductible_percent: self
                .insurance_deductible_percent
                .unwrap_or(defaults.insurance_deductible_percent),
            married: self.married.unwrap_or(defaults.married),
            spouse_taxable_income: self
                .spouse_taxable_income
                .unwrap_or(defaults.spouse_taxable_income),
        }
    }
}

/// Parse CSV text (the full file contents as a &str) and return one
/// [`CalculationInput`] per row, in file order.
///
/// # Errors
///
/// [`CsvLoadError::Parse`] if the CSV is structurally invalid or a field
/// cannot be deserialised.
pub fn load_from_str(input: &str) -> Result<Vec<CalculationInput>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .map(|result| Ok(result?.into_input()))
        .collect()
}

/// Convenience wrapper: read a file from disk and delegate to [`load_from_str`].
///
/// # Errors
///
/// [`CsvLoadError::Io`] when the file cannot be read, otherwise as
/// [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<CalculationInput>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
