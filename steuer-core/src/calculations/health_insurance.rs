//! Statutory health insurance (GKV) contributions of a self-insured director.
//!
//! The combined rate is the general rate plus long-term care, the insurer's
//! supplementary rate, and optionally the sick-pay entitlement and the care
//! surcharge for the childless. It applies to the gross income clamped to the
//! year's minimum contribution basis and contribution ceiling.
//!
//! Privately insured directors do not use this module; their contribution is
//! the monthly premium times twelve (see [`private_contribution`]).
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use steuer_core::calculations::{ContributionOptions, StatutoryContribution};
//! use steuer_core::{ContributionBounds, ContributionRates};
//!
//! let rates = ContributionRates {
//!     general: dec!(0.14),
//!     long_term_care: dec!(0.036),
//!     sick_pay: dec!(0.006),
//!     care_surcharge: dec!(0.006),
//! };
//! let bounds = ContributionBounds {
//!     min_basis: dec!(14980),
//!     ceiling: dec!(66150),
//! };
//! let options = ContributionOptions {
//!     supplementary_rate: dec!(2.45),
//!     sick_pay: true,
//!     care_surcharge: true,
//! };
//!
//! let result = StatutoryContribution::new(&rates, bounds).calculate(dec!(30000), &options);
//!
//! assert_eq!(result.combined_rate, dec!(0.2125));
//! assert_eq!(result.annual_contribution, dec!(6375.00));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{percent_to_rate, round_half_up};
use crate::models::{ContributionBounds, ContributionRates, ParameterError, TaxParameterTable};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Insurer and personal options that modify the statutory rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionOptions {
    /// Supplementary rate of the insurer in percent (e.g. `2.45`).
    pub supplementary_rate: Decimal,
    pub sick_pay: bool,
    pub care_surcharge: bool,
}

/// Result of a statutory contribution calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionResult {
    /// Gross income after clamping to the contribution bounds.
    pub contributable_income: Decimal,

    /// Sum of all applicable rates, as a fraction.
    pub combined_rate: Decimal,

    pub annual_contribution: Decimal,
}

/// Calculator for statutory contributions of one year.
#[derive(Debug, Clone)]
pub struct StatutoryContribution<'a> {
    rates: &'a ContributionRates,
    bounds: ContributionBounds,
}

impl<'a> StatutoryContribution<'a> {
    pub fn new(
        rates: &'a ContributionRates,
        bounds: ContributionBounds,
    ) -> Self {
        Self { rates, bounds }
    }

    /// Looks up the rates and the bounds for `year` in `params`.
    pub fn for_year(
        params: &'a TaxParameterTable,
        year: i32,
    ) -> Result<Self, ParameterError> {
        let bounds = params.contribution_bounds(year)?;
        Ok(Self::new(&params.health_insurance.rates, bounds))
    }

    /// Calculates the annual contribution on `gross_income`.
    pub fn calculate(
        &self,
        gross_income: Decimal,
        options: &ContributionOptions,
    ) -> ContributionResult {
        let contributable_income = self.contributable_income(gross_income);
        let combined_rate = self.combined_rate(options);
        let annual_contribution = round_half_up(contributable_income * combined_rate);

        debug!(
            gross_income = %gross_income,
            contributable_income = %contributable_income,
            combined_rate = %combined_rate,
            annual_contribution = %annual_contribution,
            "computed statutory health insurance contribution"
        );

        ContributionResult {
            contributable_income,
            combined_rate,
            annual_contribution,
        }
    }

    /// Caps `gross_income` at the ceiling, then raises it to the minimum basis.
    fn contributable_income(
        &self,
        gross_income: Decimal,
    ) -> Decimal {
        if gross_income < self.bounds.min_basis {
            warn!(
                gross_income = %gross_income,
                min_basis = %self.bounds.min_basis,
                "Gross income below minimum contribution basis; contribution assessed on the minimum"
            );
        }
        gross_income
            .min(self.bounds.ceiling)
            .max(self.bounds.min_basis)
    }

    fn combined_rate(
        &self,
        options: &ContributionOptions,
    ) -> Decimal {
        let mut rate = self.rates.general
            + self.rates.long_term_care
            + percent_to_rate(options.supplementary_rate);
        if options.sick_pay {
            rate += self.rates.sick_pay;
        }
        if options.care_surcharge {
            rate += self.rates.care_surcharge;
        }
        rate
    }
}

/// Annual statutory contribution for `gross_income` in `year`.
///
/// # Errors
///
/// Returns [`ParameterError::YearNotFound`] if the contribution bounds of
/// `year` are not configured.
pub fn annual_contribution(
    gross_income: Decimal,
    supplementary_rate: Decimal,
    year: i32,
    sick_pay: bool,
    care_surcharge: bool,
    params: &TaxParameterTable,
) -> Result<Decimal, ParameterError> {
    let options = ContributionOptions {
        supplementary_rate,
        sick_pay,
        care_surcharge,
    };
    let result = StatutoryContribution::for_year(params, year)?.calculate(gross_income, &options);
    Ok(result.annual_contribution)
}

/// Annual contribution of a privately insured person.
pub fn private_contribution(monthly_premium: Decimal) -> Decimal {
    round_half_up(monthly_premium * MONTHS_PER_YEAR)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::fixtures::parameters_2025;

    fn all_options() -> ContributionOptions {
        ContributionOptions {
            supplementary_rate: dec!(2.45),
            sick_pay: true,
            care_surcharge: true,
        }
    }

    fn calculate(
        gross_income: Decimal,
        options: &ContributionOptions,
    ) -> ContributionResult {
        let params = parameters_2025();
        StatutoryContribution::for_year(&params, 2025)
            .expect("2025 is configured")
            .calculate(gross_income, options)
    }

    // =========================================================================
    // combined rate
    // =========================================================================

    #[test]
    fn combined_rate_includes_all_enabled_components() {
        let result = calculate(dec!(30000), &all_options());

        assert_eq!(result.combined_rate, dec!(0.2125));
    }

    #[test]
    fn combined_rate_without_toggles() {
        let options = ContributionOptions {
            sick_pay: false,
            care_surcharge: false,
            ..all_options()
        };

        let result = calculate(dec!(30000), &options);

        assert_eq!(result.combined_rate, dec!(0.2005));
        assert_eq!(result.annual_contribution, dec!(6015.00));
    }

    #[test]
    fn combined_rate_with_only_sick_pay() {
        let options = ContributionOptions {
            care_surcharge: false,
            ..all_options()
        };

        let result = calculate(dec!(30000), &options);

        assert_eq!(result.combined_rate, dec!(0.2065));
    }

    // =========================================================================
    // contribution bounds
    // =========================================================================

    #[test]
    fn income_inside_bounds_is_assessed_in_full() {
        let result = calculate(dec!(53000), &all_options());

        assert_eq!(result.contributable_income, dec!(53000));
        assert_eq!(result.annual_contribution, dec!(11262.50));
    }

    #[test]
    fn income_below_minimum_basis_is_raised_to_it() {
        let result = calculate(dec!(6000), &all_options());

        assert_eq!(result.contributable_income, dec!(14980));
        assert_eq!(result.annual_contribution, dec!(3183.25));
    }

    #[test]
    fn zero_income_is_assessed_on_minimum_basis() {
        let result = calculate(Decimal::ZERO, &all_options());

        assert_eq!(result.contributable_income, dec!(14980));
    }

    #[test]
    fn income_above_ceiling_is_capped() {
        let result = calculate(dec!(150000), &all_options());

        assert_eq!(result.contributable_income, dec!(66150));
        assert_eq!(result.annual_contribution, dec!(14056.88));
    }

    #[test]
    fn income_at_ceiling_is_unchanged() {
        let result = calculate(dec!(66150), &all_options());

        assert_eq!(result.contributable_income, dec!(66150));
    }

    // =========================================================================
    // free functions
    // =========================================================================

    #[test]
    fn annual_contribution_matches_calculator() {
        let params = parameters_2025();

        let result = annual_contribution(dec!(30000), dec!(2.45), 2025, true, true, &params);

        assert_eq!(result, Ok(dec!(6375.00)));
    }

    #[test]
    fn annual_contribution_rejects_unknown_year() {
        let params = parameters_2025();

        let result = annual_contribution(dec!(30000), dec!(2.45), 2021, true, true, &params);

        assert_eq!(
            result,
            Err(ParameterError::YearNotFound {
                category: "contribution ceiling",
                year: 2021,
            })
        );
    }

    #[test]
    fn private_contribution_is_twelve_premiums() {
        assert_eq!(private_contribution(dec!(1000)), dec!(12000.00));
        assert_eq!(private_contribution(dec!(612.34)), dec!(7348.08));
    }
}
