//! Year-indexed tax parameters consumed by the calculations.
//!
//! The table is built once (usually by the `steuer-data` loader), validated,
//! and then passed by reference into every calculation. Lookups for a year
//! that the table does not cover fail with [`ParameterError::YearNotFound`].

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by parameter lookups and table validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterError {
    /// The requested tax year has no entry in the named category.
    #[error("tax year {year} is not present in the {category} parameters")]
    YearNotFound { category: &'static str, year: i32 },

    /// Income tax zone boundaries must be strictly ascending.
    #[error("income tax zones for {year} are not strictly ascending")]
    UnorderedZones { year: i32 },

    /// A rate must be a fraction between 0 and 1.
    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidRate { name: &'static str, value: Decimal },

    /// A year-keyed amount must not be negative.
    #[error("{name} for {year} must be non-negative, got {value}")]
    NegativeAmount {
        name: &'static str,
        year: i32,
        value: Decimal,
    },

    /// The contribution floor lies above the ceiling.
    #[error("minimum contribution basis {floor} exceeds the contribution ceiling {ceiling} for {year}")]
    InvertedContributionBounds {
        year: i32,
        floor: Decimal,
        ceiling: Decimal,
    },
}

/// Income tax tariff of one year (§32a EStG).
///
/// `zone1_start` is the basic allowance: income up to it is untaxed. The two
/// progressive zones use quadratic polynomials in ten-thousands of euros
/// above their lower bound, the two upper zones are flat 42 % and 45 % minus
/// an offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxTariff {
    pub zone1_start: Decimal,
    pub zone2_start: Decimal,
    pub zone3_start: Decimal,
    pub zone4_start: Decimal,
    pub y_factor: Decimal,
    pub y_offset: Decimal,
    pub z_factor: Decimal,
    pub z_offset: Decimal,
    pub z_extra: Decimal,
    pub tax_42_offset: Decimal,
    pub tax_45_offset: Decimal,
}

impl IncomeTaxTariff {
    fn validate(
        &self,
        year: i32,
    ) -> Result<(), ParameterError> {
        let ascending = Decimal::ZERO <= self.zone1_start
            && self.zone1_start < self.zone2_start
            && self.zone2_start < self.zone3_start
            && self.zone3_start < self.zone4_start;
        if !ascending {
            return Err(ParameterError::UnorderedZones { year });
        }
        Ok(())
    }
}

/// Contribution rates for statutory health and long-term care insurance.
///
/// All rates are fractions (`0.14` for 14 %). The supplementary rate is not
/// part of the table; it is set per insurer and passed with the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRates {
    pub general: Decimal,
    pub long_term_care: Decimal,
    pub sick_pay: Decimal,
    pub care_surcharge: Decimal,
}

/// Income range a statutory contribution is assessed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBounds {
    pub min_basis: Decimal,
    pub ceiling: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthInsuranceParameters {
    pub rates: ContributionRates,
    pub contribution_ceiling: BTreeMap<i32, Decimal>,
    pub min_contribution_basis: BTreeMap<i32, Decimal>,
}

/// Flat rates applied to a corporation's profit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporateFlatTax {
    pub solidarity_rate: Decimal,
    pub corporate_income_tax_rate: Decimal,
}

/// The complete parameter set for every supported tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxParameterTable {
    pub income_tax: BTreeMap<i32, IncomeTaxTariff>,
    pub health_insurance: HealthInsuranceParameters,
    pub corporate: CorporateFlatTax,
    pub standard_allowance: BTreeMap<i32, Decimal>,
}

impl TaxParameterTable {
    /// Returns the income tax tariff for `year`.
    pub fn income_tax_tariff(
        &self,
        year: i32,
    ) -> Result<&IncomeTaxTariff, ParameterError> {
        self.income_tax
            .get(&year)
            .ok_or(ParameterError::YearNotFound {
                category: "income tax",
                year,
            })
    }

    /// Returns the statutory contribution floor and ceiling for `year`.
    pub fn contribution_bounds(
        &self,
        year: i32,
    ) -> Result<ContributionBounds, ParameterError> {
        let ceiling = lookup(
            &self.health_insurance.contribution_ceiling,
            "contribution ceiling",
            year,
        )?;
        let min_basis = lookup(
            &self.health_insurance.min_contribution_basis,
            "minimum contribution basis",
            year,
        )?;
        Ok(ContributionBounds { min_basis, ceiling })
    }

    /// Returns the standard employee expense allowance for `year`.
    pub fn standard_allowance(
        &self,
        year: i32,
    ) -> Result<Decimal, ParameterError> {
        lookup(&self.standard_allowance, "standard allowance", year)
    }

    /// Years covered by every year-keyed category, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.income_tax
            .keys()
            .copied()
            .filter(|year| {
                self.health_insurance.contribution_ceiling.contains_key(year)
                    && self.health_insurance.min_contribution_basis.contains_key(year)
                    && self.standard_allowance.contains_key(year)
            })
            .collect()
    }

    /// Checks the structural invariants of the table.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError`] if:
    /// - a tariff's zone boundaries are not strictly ascending
    /// - any rate lies outside [0, 1]
    /// - a ceiling, floor or allowance is negative
    /// - a year's contribution floor exceeds its ceiling
    pub fn validate(&self) -> Result<(), ParameterError> {
        for (year, tariff) in &self.income_tax {
            tariff.validate(*year)?;
        }

        let rates = &self.health_insurance.rates;
        check_rate("general contribution rate", rates.general)?;
        check_rate("long-term care rate", rates.long_term_care)?;
        check_rate("sick pay rate", rates.sick_pay)?;
        check_rate("care surcharge rate", rates.care_surcharge)?;
        check_rate("solidarity surcharge rate", self.corporate.solidarity_rate)?;
        check_rate(
            "corporate income tax rate",
            self.corporate.corporate_income_tax_rate,
        )?;

        check_amounts(
            "contribution ceiling",
            &self.health_insurance.contribution_ceiling,
        )?;
        check_amounts(
            "minimum contribution basis",
            &self.health_insurance.min_contribution_basis,
        )?;
        check_amounts("standard allowance", &self.standard_allowance)?;

        for (year, floor) in &self.health_insurance.min_contribution_basis {
            if let Some(ceiling) = self.health_insurance.contribution_ceiling.get(year) {
                if floor > ceiling {
                    return Err(ParameterError::InvertedContributionBounds {
                        year: *year,
                        floor: *floor,
                        ceiling: *ceiling,
                    });
                }
            }
        }

        Ok(())
    }
}

fn lookup(
    values: &BTreeMap<i32, Decimal>,
    category: &'static str,
    year: i32,
) -> Result<Decimal, ParameterError> {
    values
        .get(&year)
        .copied()
        .ok_or(ParameterError::YearNotFound { category, year })
}

fn check_rate(
    name: &'static str,
    value: Decimal,
) -> Result<(), ParameterError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ParameterError::InvalidRate { name, value });
    }
    Ok(())
}

fn check_amounts(
    name: &'static str,
    values: &BTreeMap<i32, Decimal>,
) -> Result<(), ParameterError> {
    match values.iter().find(|(_, value)| **value < Decimal::ZERO) {
        Some((year, value)) => Err(ParameterError::NegativeAmount {
            name,
            year: *year,
            value: *value,
        }),
        None => Ok(()),
    }
}
