//! Corporate and personal waterfall of a director's compensation.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 0    | Input check: no negative fields, amounts and percentages within supported limits |
//! | 1    | Pre-tax profit (revenue − costs − salary); must be positive |
//! | 2    | Trade tax on the profit, no allowance |
//! | 3    | Solidarity surcharge (flat rate on the profit) |
//! | 4    | Corporate income tax (flat rate on the profit) |
//! | 5    | Total corporate tax (2 + 3 + 4) |
//! | 6    | Post-tax profit (1 − 5) |
//! | 7    | Personal gross income (salary + other income) |
//! | 8    | Health insurance contribution (statutory or private premium × 12) |
//! | 9    | Deductible share of the contribution |
//! | 10   | Taxable income (7 − 9 − standard allowance − other deductible, plus spouse income if married) |
//! | 11   | Income tax |
//! | 12   | Marginal tax rate |
//! | 13   | Personal levies (11 + 8) |
//! | 14   | Personal net income (7 − 13) |
//! | 15   | Total net proceeds (14 + 6) |
//! | 16   | Total levies (5 + 13) |
//! | 17   | Levies as a share of revenue, in percent |
//!
//! Every amount is rounded to cents where it is computed.
//!
//! # Example
//!
//! ```no_run
//! use steuer_core::{CalculationInput, TaxParameterTable};
//! use steuer_core::calculations::calculate_business_report;
//!
//! # fn load() -> TaxParameterTable { unimplemented!() }
//! let params: TaxParameterTable = load();
//! let report = calculate_business_report(&CalculationInput::default(), &params)?;
//!
//! println!("net proceeds: {}", report.total_net_proceeds);
//! # Ok::<(), steuer_core::BusinessReportError>(())
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{percent_of, percent_to_rate, round_half_up};
use crate::calculations::health_insurance::{
    ContributionOptions, StatutoryContribution, private_contribution,
};
use crate::calculations::income_tax::IncomeTaxSchedule;
use crate::calculations::trade_tax::trade_tax;
use crate::models::{
    BusinessReport, CalculationInput, ParameterError, ReportBreakdown, TaxParameterTable,
};

const HUNDRED: Decimal = dec!(100);

/// Largest amount accepted for any monetary input or the trade tax multiplier.
pub const MAX_INPUT_AMOUNT: Decimal = dec!(1000000000000);

/// Largest value accepted for an input given as a share in percent.
pub const MAX_INPUT_PERCENT: Decimal = dec!(100);

/// Errors that can occur while calculating a business report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BusinessReportError {
    /// Revenue does not cover costs and salary.
    #[error("the corporation makes a loss (pre-tax profit {profit}); a report needs a positive profit")]
    Loss { profit: Decimal },

    /// An input field is below zero.
    #[error("{field} must not be negative (got {value})")]
    NegativeInput { field: &'static str, value: Decimal },

    /// An input field is beyond what the calculation supports.
    #[error("{field} = {value} exceeds the supported maximum {max}")]
    InputTooLarge {
        field: &'static str,
        value: Decimal,
        max: Decimal,
    },

    /// Levies cannot be expressed as a share of revenue.
    #[error("revenue must be positive to express levies as a share of it")]
    NoRevenue,

    /// A parameter lookup failed for the input's tax year.
    #[error(transparent)]
    Parameters(#[from] ParameterError),
}

/// Corporate side of the waterfall (steps 1 to 6).
#[derive(Debug, Clone, PartialEq, Eq)]
struct CorporateFigures {
    profit_before_tax: Decimal,
    trade_tax: Decimal,
    solidarity_surcharge: Decimal,
    corporate_income_tax: Decimal,
    total_tax: Decimal,
    profit_after_tax: Decimal,
}

/// Personal side of the waterfall (steps 7 to 14).
#[derive(Debug, Clone, PartialEq, Eq)]
struct PersonalFigures {
    gross_income: Decimal,
    insurance_contribution: Decimal,
    deductible_insurance: Decimal,
    standard_allowance: Decimal,
    taxable_income: Decimal,
    income_tax: Decimal,
    marginal_rate: Decimal,
    levies: Decimal,
    net_income: Decimal,
}

/// Calculator for the business report.
///
/// Holds the parameter table; every calculation reads the tax year from its
/// input and looks up the matching parameters.
#[derive(Debug, Clone, Copy)]
pub struct BusinessReportCalculator<'a> {
    params: &'a TaxParameterTable,
}

impl<'a> BusinessReportCalculator<'a> {
    pub fn new(params: &'a TaxParameterTable) -> Self {
        Self { params }
    }

    /// Calculates the report for `input`.
    ///
    /// # Errors
    ///
    /// Returns [`BusinessReportError`] if:
    /// - an input field is negative or beyond its supported maximum
    /// - the pre-tax profit is zero or negative
    /// - a parameter category has no entry for the input's tax year
    pub fn calculate(
        &self,
        input: &CalculationInput,
    ) -> Result<BusinessReport, BusinessReportError> {
        self.calculate_breakdown(input).map(|breakdown| breakdown.report)
    }

    /// Calculates the report together with its intermediate figures.
    ///
    /// # Errors
    ///
    /// Same as [`BusinessReportCalculator::calculate`].
    pub fn calculate_breakdown(
        &self,
        input: &CalculationInput,
    ) -> Result<ReportBreakdown, BusinessReportError> {
        check_input(input)?;
        let corporate = self.corporate_figures(input)?;
        let personal = self.personal_figures(input)?;

        // Steps 15-17
        let total_net_proceeds = round_half_up(personal.net_income + corporate.profit_after_tax);
        let total_levies = round_half_up(corporate.total_tax + personal.levies);
        let total_levies_percent = self.levies_percent(total_net_proceeds, input.revenue)?;

        let report = BusinessReport {
            tax_year: input.tax_year,
            corporate_profit_before_tax: corporate.profit_before_tax,
            corporate_tax_total: corporate.total_tax,
            corporate_profit_after_tax: corporate.profit_after_tax,
            personal_gross_income: personal.gross_income,
            health_insurance_contribution: personal.insurance_contribution,
            taxable_income: personal.taxable_income,
            income_tax: personal.income_tax,
            marginal_tax_rate: personal.marginal_rate,
            personal_net_income: personal.net_income,
            total_net_proceeds,
            total_levies,
            total_levies_percent,
        };

        debug!(
            tax_year = report.tax_year,
            total_net_proceeds = %report.total_net_proceeds,
            total_levies = %report.total_levies,
            total_levies_percent = %report.total_levies_percent,
            "calculated business report"
        );

        Ok(ReportBreakdown {
            trade_tax: corporate.trade_tax,
            solidarity_surcharge: corporate.solidarity_surcharge,
            corporate_income_tax: corporate.corporate_income_tax,
            deductible_insurance: personal.deductible_insurance,
            standard_allowance: personal.standard_allowance,
            personal_levies: personal.levies,
            corporate_burden_percent: percent_of(corporate.total_tax, corporate.profit_before_tax),
            average_tax_rate_percent: percent_of(personal.income_tax, personal.taxable_income),
            personal_burden_percent: percent_of(personal.levies, personal.taxable_income),
            report,
        })
    }

    fn corporate_figures(
        &self,
        input: &CalculationInput,
    ) -> Result<CorporateFigures, BusinessReportError> {
        // Step 1
        let profit_before_tax =
            round_half_up(input.revenue - input.costs - input.director_salary);
        if profit_before_tax <= Decimal::ZERO {
            return Err(BusinessReportError::Loss {
                profit: profit_before_tax,
            });
        }

        // Steps 2-4
        let flat = &self.params.corporate;
        let trade_tax = trade_tax(profit_before_tax, input.trade_tax_multiplier, Decimal::ZERO);
        let solidarity_surcharge = round_half_up(profit_before_tax * flat.solidarity_rate);
        let corporate_income_tax =
            round_half_up(profit_before_tax * flat.corporate_income_tax_rate);

        // Steps 5-6
        let total_tax = round_half_up(trade_tax + solidarity_surcharge + corporate_income_tax);
        let profit_after_tax = round_half_up(profit_before_tax - total_tax);

        Ok(CorporateFigures {
            profit_before_tax,
            trade_tax,
            solidarity_surcharge,
            corporate_income_tax,
            total_tax,
            profit_after_tax,
        })
    }

    fn personal_figures(
        &self,
        input: &CalculationInput,
    ) -> Result<PersonalFigures, BusinessReportError> {
        let year = input.tax_year;

        // Step 7
        let gross_income = round_half_up(input.director_salary + input.other_income);

        // Steps 8-9
        let insurance_contribution = self.insurance_contribution(input, gross_income)?;
        let deductible_insurance = round_half_up(
            insurance_contribution * percent_to_rate(input.insurance_deductible_percent),
        );

        // Step 10
        let standard_allowance = self.params.standard_allowance(year)?;
        let taxable_income = self.taxable_income(
            input,
            gross_income,
            deductible_insurance,
            standard_allowance,
        );

        // Steps 11-12
        let schedule = IncomeTaxSchedule::for_year(self.params, year)?;
        let income_tax = schedule.tax(taxable_income, input.married);
        let marginal_rate = schedule.marginal_rate(taxable_income, input.married);

        // Steps 13-14
        let levies = round_half_up(income_tax + insurance_contribution);
        let net_income = round_half_up(gross_income - levies);

        Ok(PersonalFigures {
            gross_income,
            insurance_contribution,
            deductible_insurance,
            standard_allowance,
            taxable_income,
            income_tax,
            marginal_rate,
            levies,
            net_income,
        })
    }

    fn insurance_contribution(
        &self,
        input: &CalculationInput,
        gross_income: Decimal,
    ) -> Result<Decimal, ParameterError> {
        if !input.statutory_insurance {
            return Ok(private_contribution(input.private_premium_monthly));
        }

        let options = ContributionOptions {
            supplementary_rate: input.supplementary_rate,
            sick_pay: input.sick_pay,
            care_surcharge: input.care_surcharge,
        };
        let result = StatutoryContribution::for_year(self.params, input.tax_year)?
            .calculate(gross_income, &options);
        Ok(result.annual_contribution)
    }

    fn taxable_income(
        &self,
        input: &CalculationInput,
        gross_income: Decimal,
        deductible_insurance: Decimal,
        standard_allowance: Decimal,
    ) -> Decimal {
        let mut taxable = gross_income
            - deductible_insurance
            - standard_allowance
            - input.other_deductible_expenses;
        if input.married {
            taxable += input.spouse_taxable_income;
        }
        let taxable = round_half_up(taxable);

        if taxable <= Decimal::ZERO {
            warn!(
                taxable_income = %taxable,
                "Deductions exceed personal income; taxable income is not positive"
            );
        }
        taxable
    }

    /// Share of revenue that does not end up as net proceeds.
    fn levies_percent(
        &self,
        total_net_proceeds: Decimal,
        revenue: Decimal,
    ) -> Result<Decimal, BusinessReportError> {
        if revenue <= Decimal::ZERO {
            return Err(BusinessReportError::NoRevenue);
        }
        Ok(round_half_up(
            (Decimal::ONE - total_net_proceeds / revenue) * HUNDRED,
        ))
    }
}

/// Rejects negative fields and values the waterfall cannot carry without
/// overflowing.
fn check_input(input: &CalculationInput) -> Result<(), BusinessReportError> {
    let amounts = [
        ("trade_tax_multiplier", input.trade_tax_multiplier),
        ("revenue", input.revenue),
        ("costs", input.costs),
        ("director_salary", input.director_salary),
        ("other_income", input.other_income),
        ("other_deductible_expenses", input.other_deductible_expenses),
        ("private_premium_monthly", input.private_premium_monthly),
        ("spouse_taxable_income", input.spouse_taxable_income),
    ];
    let percents = [
        ("supplementary_rate", input.supplementary_rate),
        ("insurance_deductible_percent", input.insurance_deductible_percent),
    ];

    let limited = amounts
        .into_iter()
        .map(|(field, value)| (field, value, MAX_INPUT_AMOUNT))
        .chain(
            percents
                .into_iter()
                .map(|(field, value)| (field, value, MAX_INPUT_PERCENT)),
        );
    for (field, value, max) in limited {
        if value < Decimal::ZERO {
            return Err(BusinessReportError::NegativeInput { field, value });
        }
        if value > max {
            return Err(BusinessReportError::InputTooLarge { field, value, max });
        }
    }
    Ok(())
}

/// Calculates the business report for `input` with `params`.
///
/// # Errors
///
/// Returns [`BusinessReportError::NegativeInput`] or
/// [`BusinessReportError::InputTooLarge`] for fields outside their limits,
/// [`BusinessReportError::Loss`] if the pre-tax profit is not positive and
/// [`BusinessReportError::Parameters`] if the tax year is missing from
/// `params`.
pub fn calculate_business_report(
    input: &CalculationInput,
    params: &TaxParameterTable,
) -> Result<BusinessReport, BusinessReportError> {
    BusinessReportCalculator::new(params).calculate(input)
}

/// Calculates the business report and its intermediate figures.
///
/// # Errors
///
/// Same as [`calculate_business_report`].
pub fn calculate_breakdown(
    input: &CalculationInput,
    params: &TaxParameterTable,
) -> Result<ReportBreakdown, BusinessReportError> {
    BusinessReportCalculator::new(params).calculate_breakdown(input)
}
