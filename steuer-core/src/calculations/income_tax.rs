//! Progressive German income tax (§32a EStG) and marginal rate.
//!
//! # Tariff Zones
//!
//! | Zone | Taxable income            | Tax                                   | Marginal rate |
//! |------|---------------------------|---------------------------------------|---------------|
//! | 1    | up to `zone1_start`       | 0                                     | 0 %           |
//! | 2    | up to `zone2_start`       | `(y_factor·y + y_offset)·y`           | 14 % → 24 %   |
//! | 3    | up to `zone3_start`       | `(z_factor·z + z_offset)·z + z_extra` | 24 % → 42 %   |
//! | 4    | up to `zone4_start`       | `0.42·x − tax_42_offset`              | 42 %          |
//! | 5    | above `zone4_start`       | `0.45·x − tax_45_offset`              | 45 %          |
//!
//! `y` and `z` are the income above the zone's lower bound in units of
//! 10,000 €. Marginal rates inside the progressive zones are interpolated
//! linearly.
//!
//! # Joint Assessment
//!
//! Married couples are taxed with income splitting: the joint taxable income
//! is halved, the tariff applied, and the resulting tax doubled. The marginal
//! rate is the one of the halved income and is not doubled.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use steuer_core::IncomeTaxTariff;
//! use steuer_core::calculations::IncomeTaxSchedule;
//!
//! let tariff = IncomeTaxTariff {
//!     zone1_start: dec!(12096),
//!     zone2_start: dec!(17443),
//!     zone3_start: dec!(68480),
//!     zone4_start: dec!(277825),
//!     y_factor: dec!(932.30),
//!     y_offset: dec!(1400),
//!     z_factor: dec!(176.64),
//!     z_offset: dec!(2397),
//!     z_extra: dec!(1015.13),
//!     tax_42_offset: dec!(10911.92),
//!     tax_45_offset: dec!(19246.67),
//! };
//!
//! let schedule = IncomeTaxSchedule::new(&tariff);
//!
//! assert_eq!(schedule.tax(dec!(50000), false), dec!(10691.35));
//! assert_eq!(schedule.tax(dec!(100000), true), dec!(21382.71));
//! assert_eq!(schedule.marginal_rate(dec!(100000), true), dec!(35.48));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::calculations::common::round_half_up;
use crate::models::{IncomeTaxTariff, ParameterError, TaxParameterTable};

const TEN_THOUSAND: Decimal = dec!(10000);
const ENTRY_RATE: Decimal = dec!(14);
const MIDDLE_RATE: Decimal = dec!(24);
const PROPORTIONAL_RATE: Decimal = dec!(42);
const TOP_RATE: Decimal = dec!(45);

/// Computes the income tax for `taxable_income` in `year`.
///
/// # Errors
///
/// Returns [`ParameterError::YearNotFound`] if `params` has no tariff for
/// `year`.
pub fn calc_tax(
    taxable_income: Decimal,
    married: bool,
    year: i32,
    params: &TaxParameterTable,
) -> Result<Decimal, ParameterError> {
    let schedule = IncomeTaxSchedule::for_year(params, year)?;
    Ok(schedule.tax(taxable_income, married))
}

/// Computes the marginal income tax rate, in percent, for `taxable_income`.
///
/// # Errors
///
/// Returns [`ParameterError::YearNotFound`] if `params` has no tariff for
/// `year`.
pub fn marginal_rate(
    taxable_income: Decimal,
    married: bool,
    year: i32,
    params: &TaxParameterTable,
) -> Result<Decimal, ParameterError> {
    let schedule = IncomeTaxSchedule::for_year(params, year)?;
    Ok(schedule.marginal_rate(taxable_income, married))
}

/// The tariff zone an assessed income falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TariffZone {
    TaxFree,
    LowerProgression,
    UpperProgression,
    Proportional,
    TopRate,
}

/// Income tax calculator for a single year's tariff.
#[derive(Debug, Clone, Copy)]
pub struct IncomeTaxSchedule<'a> {
    tariff: &'a IncomeTaxTariff,
}

impl<'a> IncomeTaxSchedule<'a> {
    pub fn new(tariff: &'a IncomeTaxTariff) -> Self {
        Self { tariff }
    }

    /// Looks up the tariff for `year` in `params`.
    pub fn for_year(
        params: &'a TaxParameterTable,
        year: i32,
    ) -> Result<Self, ParameterError> {
        params.income_tax_tariff(year).map(Self::new)
    }

    /// Income tax on `taxable_income`, rounded to cents.
    ///
    /// With `married` set the income is split: the tariff is applied to half
    /// the income and the result doubled before rounding.
    pub fn tax(
        &self,
        taxable_income: Decimal,
        married: bool,
    ) -> Decimal {
        let assessed = assessed_income(taxable_income, married);
        let single_tax = self.tariff_tax(assessed);
        let tax = if married {
            single_tax * Decimal::TWO
        } else {
            single_tax
        };

        let rounded = round_half_up(tax);
        debug!(
            taxable_income = %taxable_income,
            married,
            income_tax = %rounded,
            "computed income tax"
        );
        rounded
    }

    /// Marginal tax rate in percent, rounded to two places.
    ///
    /// For married couples the rate of the halved income is returned as is.
    pub fn marginal_rate(
        &self,
        taxable_income: Decimal,
        married: bool,
    ) -> Decimal {
        let income = assessed_income(taxable_income, married);
        let t = self.tariff;

        let rate = match self.zone(income) {
            TariffZone::TaxFree => Decimal::ZERO,
            TariffZone::LowerProgression => interpolate(
                income,
                t.zone1_start,
                t.zone2_start,
                ENTRY_RATE,
                MIDDLE_RATE,
            ),
            TariffZone::UpperProgression => interpolate(
                income,
                t.zone2_start,
                t.zone3_start,
                MIDDLE_RATE,
                PROPORTIONAL_RATE,
            ),
            TariffZone::Proportional => PROPORTIONAL_RATE,
            TariffZone::TopRate => TOP_RATE,
        };

        round_half_up(rate)
    }

    fn zone(
        &self,
        income: Decimal,
    ) -> TariffZone {
        let t = self.tariff;
        if income <= t.zone1_start {
            TariffZone::TaxFree
        } else if income <= t.zone2_start {
            TariffZone::LowerProgression
        } else if income <= t.zone3_start {
            TariffZone::UpperProgression
        } else if income <= t.zone4_start {
            TariffZone::Proportional
        } else {
            TariffZone::TopRate
        }
    }

    /// Unrounded tariff amount for an individually assessed income.
    fn tariff_tax(
        &self,
        income: Decimal,
    ) -> Decimal {
        let t = self.tariff;
        match self.zone(income) {
            TariffZone::TaxFree => {
                if income < Decimal::ZERO {
                    warn!(
                        income = %income,
                        "Taxable income is negative; no income tax applies"
                    );
                }
                Decimal::ZERO
            }
            TariffZone::LowerProgression => {
                let y = (income - t.zone1_start) / TEN_THOUSAND;
                (t.y_factor * y + t.y_offset) * y
            }
            TariffZone::UpperProgression => {
                let z = (income - t.zone2_start) / TEN_THOUSAND;
                (t.z_factor * z + t.z_offset) * z + t.z_extra
            }
            TariffZone::Proportional => dec!(0.42) * income - t.tax_42_offset,
            TariffZone::TopRate => dec!(0.45) * income - t.tax_45_offset,
        }
    }
}

fn assessed_income(
    taxable_income: Decimal,
    married: bool,
) -> Decimal {
    if married {
        taxable_income / Decimal::TWO
    } else {
        taxable_income
    }
}

/// Linear interpolation of the rate between `from_rate` at `lower` and
/// `to_rate` at `upper`.
fn interpolate(
    income: Decimal,
    lower: Decimal,
    upper: Decimal,
    from_rate: Decimal,
    to_rate: Decimal,
) -> Decimal {
    from_rate + (income - lower) / (upper - lower) * (to_rate - from_rate)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tracing_subscriber::fmt::format::FmtSpan;

    use super::*;
    use crate::fixtures::{parameters_2025, tariff_2025};

    /// Initializes tracing subscriber for tests that verify log output.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_span_events(FmtSpan::NONE)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    // =========================================================================
    // Zone 1: tax free
    // =========================================================================

    #[test]
    fn tax_is_zero_up_to_basic_allowance() {
        let tariff = tariff_2025();
        let schedule = IncomeTaxSchedule::new(&tariff);

        for income in [dec!(0), dec!(5000), dec!(12095.99), dec!(12096)] {
            assert_eq!(schedule.tax(income, false), Decimal::ZERO, "income {income}");
            assert_eq!(
                schedule.marginal_rate(income, false),
                Decimal::ZERO,
                "income {income}"
            );
        }
    }

    #[test]
    fn tax_is_zero_for_negative_income() {
        let _guard = init_test_tracing();
        let tariff = tariff_2025();
        let schedule = IncomeTaxSchedule::new(&tariff);

        assert_eq!(schedule.tax(dec!(-5000), false), Decimal::ZERO);
        assert_eq!(schedule.marginal_rate(dec!(-5000), false), Decimal::ZERO);
    }

    #[test]
    fn married_tax_is_zero_up_to_twice_the_allowance() {
        let tariff = tariff_2025();
        let schedule = IncomeTaxSchedule::new(&tariff);

        assert_eq!(schedule.tax(dec!(24192), true), Decimal::ZERO);
    }

    // =========================================================================
    // Zone 2: lower progression
    // =========================================================================

    #[test]
    fn tax_in_lower_progression_zone() {
        let tariff = tariff_2025();
        let schedule = IncomeTaxSchedule::new(&tariff);

        assert_eq!(schedule.tax(dec!(17395), false), dec!(1003.64));
        assert_eq!(schedule.tax(dec!(12097), false), dec!(0.14));
    }

    #[test]
    fn marginal_rate_starts_at_fourteen_percent() {
        let tariff = tariff_2025();
        let schedule = IncomeTaxSchedule::new(&tariff);

        assert_eq!(schedule.marginal_rate(dec!(12097), false), dec!(14.00));
        assert_eq!(schedule.marginal_rate(dec!(17395), false), dec!(23.91));
        assert_eq!(schedule.marginal_rate(dec!(17443), false), dec!(24.00));
    }

    // =========================================================================
    // Zone 3: upper progression
    // =========================================================================

    #[test]
    fn tax_in_upper_progression_zone() {
        let tariff = tariff_2025();
        let schedule = IncomeTaxSchedule::new(&tariff);

        assert_eq!(schedule.tax(dec!(17444), false), dec!(1015.37));
        assert_eq!(schedule.tax(dec!(50000), false), dec!(10691.35));
        assert_eq!(schedule.tax(dec!(68480), false), dec!(17849.77));
    }

    #[test]
    fn marginal_rate_interpolates_up_to_forty_two_percent() {
        let tariff = tariff_2025();
        let schedule = IncomeTaxSchedule::new(&tariff);

        assert_eq!(schedule.marginal_rate(dec!(50000), false), dec!(35.48));
        assert_eq!(schedule.marginal_rate(dec!(68480), false), dec!(42.00));
    }

    // =========================================================================
    // Zones 4 and 5: proportional rates
    // =========================================================================

    #[test]
    fn tax_in_proportional_zone() {
        let tariff = tariff_2025();
        let schedule = IncomeTaxSchedule::new(&tariff);

        assert_eq!(schedule.tax(dec!(68481), false), dec!(17850.10));
        assert_eq!(schedule.tax(dec!(100000), false), dec!(31088.08));
        assert_eq!(schedule.tax(dec!(277825), false), dec!(105774.58));
        assert_eq!(schedule.marginal_rate(dec!(100000), false), dec!(42));
    }

    #[test]
    fn tax_in_top_rate_zone() {
        let tariff = tariff_2025();
        let schedule = IncomeTaxSchedule::new(&tariff);

        assert_eq!(schedule.tax(dec!(277826), false), dec!(105775.03));
        assert_eq!(schedule.tax(dec!(300000), false), dec!(115753.33));
        assert_eq!(schedule.marginal_rate(dec!(300000), false), dec!(45));
    }

    // =========================================================================
    // Income splitting
    // =========================================================================

    #[test]
    fn married_tax_doubles_tax_on_half_income() {
        let tariff = tariff_2025();
        let schedule = IncomeTaxSchedule::new(&tariff);

        assert_eq!(schedule.tax(dec!(100000), true), dec!(21382.71));
    }

    #[test]
    fn married_tax_matches_twice_single_tax_within_a_cent() {
        let tariff = tariff_2025();
        let schedule = IncomeTaxSchedule::new(&tariff);

        let mut income = Decimal::ZERO;
        while income <= dec!(700000) {
            let joint = schedule.tax(income, true);
            let split = schedule.tax(income / Decimal::TWO, false) * Decimal::TWO;

            assert!(
                (joint - split).abs() <= dec!(0.01),
                "income {income}: joint {joint} vs split {split}"
            );
            income += dec!(1234.56);
        }
    }

    #[test]
    fn married_marginal_rate_is_rate_of_half_income() {
        let tariff = tariff_2025();
        let schedule = IncomeTaxSchedule::new(&tariff);

        assert_eq!(
            schedule.marginal_rate(dec!(100000), true),
            schedule.marginal_rate(dec!(50000), false)
        );
        assert_eq!(schedule.marginal_rate(dec!(100000), true), dec!(35.48));
    }

    // =========================================================================
    // Monotonicity
    // =========================================================================

    #[test]
    fn tax_never_decreases_with_income() {
        let tariff = tariff_2025();
        let schedule = IncomeTaxSchedule::new(&tariff);

        for married in [false, true] {
            let mut previous = Decimal::ZERO;
            let mut income = Decimal::ZERO;
            while income <= dec!(650000) {
                let tax = schedule.tax(income, married);
                assert!(
                    tax >= previous,
                    "tax dropped at {income} (married: {married}): {tax} < {previous}"
                );
                previous = tax;
                income += dec!(50);
            }
        }
    }

    #[test]
    fn tax_never_decreases_across_zone_boundaries() {
        let tariff = tariff_2025();
        let schedule = IncomeTaxSchedule::new(&tariff);

        for boundary in [
            tariff.zone1_start,
            tariff.zone2_start,
            tariff.zone3_start,
            tariff.zone4_start,
        ] {
            let below = schedule.tax(boundary, false);
            let above = schedule.tax(boundary + Decimal::ONE, false);

            assert!(above >= below, "tax dropped after {boundary}");
        }
    }

    // =========================================================================
    // Year lookup
    // =========================================================================

    #[test]
    fn calc_tax_uses_configured_year() {
        let params = parameters_2025();

        let result = calc_tax(dec!(17395), false, 2025, &params);

        assert_eq!(result, Ok(dec!(1003.64)));
    }

    #[test]
    fn calc_tax_rejects_unknown_year() {
        let params = parameters_2025();

        let result = calc_tax(dec!(17395), false, 2030, &params);

        assert_eq!(
            result,
            Err(ParameterError::YearNotFound {
                category: "income tax",
                year: 2030,
            })
        );
    }

    #[test]
    fn marginal_rate_rejects_unknown_year() {
        let params = parameters_2025();

        let result = marginal_rate(dec!(17395), true, 2019, &params);

        assert!(matches!(
            result,
            Err(ParameterError::YearNotFound { year: 2019, .. })
        ));
    }
}
