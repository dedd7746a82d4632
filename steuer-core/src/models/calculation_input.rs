use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Inputs for one business report.
///
/// Percentages are given as whole numbers (`250` means 250 %, `2.45` means
/// 2.45 %). Fields that only apply to one insurance or marital branch are
/// ignored by the calculation when that branch is not taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationInput {
    pub tax_year: i32,

    // Corporate level
    pub trade_tax_multiplier: Decimal,
    pub revenue: Decimal,
    pub costs: Decimal,
    pub director_salary: Decimal,

    // Personal level
    pub other_income: Decimal,
    pub other_deductible_expenses: Decimal,

    // Health insurance
    pub statutory_insurance: bool,
    pub supplementary_rate: Decimal,
    pub sick_pay: bool,
    pub care_surcharge: bool,
    /// Monthly premium, only used when `statutory_insurance` is false.
    pub private_premium_monthly: Decimal,
    pub insurance_deductible_percent: Decimal,

    // Joint assessment
    pub married: bool,
    /// Only used when `married` is true.
    pub spouse_taxable_income: Decimal,
}

impl Default for CalculationInput {
    fn default() -> Self {
        Self {
            tax_year: 2025,
            trade_tax_multiplier: dec!(250),
            revenue: dec!(170000),
            costs: dec!(15000),
            director_salary: dec!(30000),
            other_income: Decimal::ZERO,
            other_deductible_expenses: dec!(5000),
            statutory_insurance: true,
            supplementary_rate: dec!(2.45),
            sick_pay: true,
            care_surcharge: true,
            private_premium_monthly: dec!(1000),
            insurance_deductible_percent: dec!(100),
            married: false,
            spouse_taxable_income: Decimal::ZERO,
        }
    }
}
