//! Calculation modules for the director compensation report.
//!
//! Each evaluator is a pure function of its arguments and the parameter
//! table. [`business_report`] composes them into the corporate and personal
//! waterfall.

pub mod business_report;
pub mod common;
pub mod health_insurance;
pub mod income_tax;
pub mod trade_tax;

pub use business_report::{
    BusinessReportCalculator, BusinessReportError, MAX_INPUT_AMOUNT, MAX_INPUT_PERCENT,
    calculate_breakdown, calculate_business_report,
};
pub use health_insurance::{
    ContributionOptions, ContributionResult, StatutoryContribution, annual_contribution,
    private_contribution,
};
pub use income_tax::{IncomeTaxSchedule, calc_tax, marginal_rate};
pub use trade_tax::{SOLE_PROPRIETOR_ALLOWANCE, TRADE_TAX_BASE_RATE, trade_tax};
