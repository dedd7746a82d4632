//! Input controls of the report and their permitted ranges.
//!
//! | Control | Range | Applies when |
//! |---------|-------|--------------|
//! | `tax_year` | 2020 – 2025 | always |
//! | `trade_tax_multiplier` | 100 – 600 %, step 5 | always |
//! | `revenue` | 1,000 – 1,000,000 | always |
//! | `costs` | 1,000 – 100,000 | always |
//! | `director_salary` | 1,000 – 200,000 | always |
//! | `other_income` | 0 – 500,000 | always |
//! | `other_deductible_expenses` | 0 – 50,000 | always |
//! | `supplementary_rate` | 0.8 – 5.0 % | statutory insurance |
//! | `private_premium_monthly` | 0 – 2,000 | private insurance |
//! | `insurance_deductible_percent` | 10 – 100 % | private insurance |
//! | `spouse_taxable_income` | 0 – 200,000 | married |

use std::ops::RangeInclusive;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use steuer_core::CalculationInput;
use thiserror::Error;
use tracing::debug;

pub const TAX_YEARS: RangeInclusive<i32> = 2020..=2025;

const MULTIPLIER_STEP: Decimal = dec!(5);

/// An input outside the permitted range of its control.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("tax year {year} is outside {min}–{max}")]
    TaxYear { year: i32, min: i32, max: i32 },

    #[error("{control} = {value} is outside {min}–{max}")]
    OutOfRange {
        control: &'static str,
        value: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("{control} = {value} is not a multiple of {step}")]
    OffStep {
        control: &'static str,
        value: Decimal,
        step: Decimal,
    },
}

/// Which inputs a control applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applies {
    Always,
    Statutory,
    Private,
    Married,
}

struct Control {
    name: &'static str,
    min: Decimal,
    max: Decimal,
    applies: Applies,
    value: fn(&CalculationInput) -> Decimal,
}

const CONTROLS: [Control; 10] = [
    Control {
        name: "trade_tax_multiplier",
        min: dec!(100),
        max: dec!(600),
        applies: Applies::Always,
        value: |input| input.trade_tax_multiplier,
    },
    Control {
        name: "revenue",
        min: dec!(1000),
        max: dec!(1000000),
        applies: Applies::Always,
        value: |input| input.revenue,
    },
    Control {
        name: "costs",
        min: dec!(1000),
        max: dec!(100000),
        applies: Applies::Always,
        value: |input| input.costs,
    },
    Control {
        name: "director_salary",
        min: dec!(1000),
        max: dec!(200000),
        applies: Applies::Always,
        value: |input| input.director_salary,
    },
    Control {
        name: "other_income",
        min: dec!(0),
        max: dec!(500000),
        applies: Applies::Always,
        value: |input| input.other_income,
    },
    Control {
        name: "other_deductible_expenses",
        min: dec!(0),
        max: dec!(50000),
        applies: Applies::Always,
        value: |input| input.other_deductible_expenses,
    },
    Control {
        name: "supplementary_rate",
        min: dec!(0.8),
        max: dec!(5.0),
        applies: Applies::Statutory,
        value: |input| input.supplementary_rate,
    },
    Control {
        name: "private_premium_monthly",
        min: dec!(0),
        max: dec!(2000),
        applies: Applies::Private,
        value: |input| input.private_premium_monthly,
    },
    Control {
        name: "insurance_deductible_percent",
        min: dec!(10),
        max: dec!(100),
        applies: Applies::Private,
        value: |input| input.insurance_deductible_percent,
    },
    Control {
        name: "spouse_taxable_income",
        min: dec!(0),
        max: dec!(200000),
        applies: Applies::Married,
        value: |input| input.spouse_taxable_income,
    },
];

impl Applies {
    fn to(
        self,
        input: &CalculationInput,
    ) -> bool {
        match self {
            Applies::Always => true,
            Applies::Statutory => input.statutory_insurance,
            Applies::Private => !input.statutory_insurance,
            Applies::Married => input.married,
        }
    }
}

/// Resets the inputs that do not apply to the chosen branches.
///
/// Statutory insurance is fully deductible. Without it there is no
/// supplementary rate, sick pay or care surcharge. Singles have no spouse
/// income.
pub fn normalize(mut input: CalculationInput) -> CalculationInput {
    if input.statutory_insurance {
        input.insurance_deductible_percent = dec!(100);
    } else {
        input.supplementary_rate = Decimal::ZERO;
        input.sick_pay = false;
        input.care_surcharge = false;
    }
    if !input.married {
        input.spouse_taxable_income = Decimal::ZERO;
    }
    input
}

/// Checks every applicable control of `input` against its range.
///
/// # Errors
///
/// Returns the first [`ControlError`] found, in table order after the tax
/// year.
pub fn validate(input: &CalculationInput) -> Result<(), ControlError> {
    if !TAX_YEARS.contains(&input.tax_year) {
        return Err(ControlError::TaxYear {
            year: input.tax_year,
            min: *TAX_YEARS.start(),
            max: *TAX_YEARS.end(),
        });
    }

    for control in CONTROLS.iter().filter(|c| c.applies.to(input)) {
        let value = (control.value)(input);
        if value < control.min || value > control.max {
            return Err(ControlError::OutOfRange {
                control: control.name,
                value,
                min: control.min,
                max: control.max,
            });
        }
    }

    if !(input.trade_tax_multiplier % MULTIPLIER_STEP).is_zero() {
        return Err(ControlError::OffStep {
            control: "trade_tax_multiplier",
            value: input.trade_tax_multiplier,
            step: MULTIPLIER_STEP,
        });
    }

    debug!("inputs are within the control ranges");
    Ok(())
}

/// Normalizes `input` and, when `check_bounds` is set, validates it.
pub fn prepare(
    input: CalculationInput,
    check_bounds: bool,
) -> Result<CalculationInput, ControlError> {
    let input = normalize(input);
    if check_bounds {
        validate(&input)?;
    } else {
        debug!("range checks disabled");
    }
    Ok(input)
}
