//! Parameter tables shared by the unit tests.

use std::collections::BTreeMap;

use rust_decimal_macros::dec;

use crate::models::{
    ContributionRates, CorporateFlatTax, HealthInsuranceParameters, IncomeTaxTariff,
    TaxParameterTable,
};

/// Creates the 2025 parameter table.
pub(crate) fn parameters_2025() -> TaxParameterTable {
    TaxParameterTable {
        income_tax: BTreeMap::from([(2025, tariff_2025())]),
        health_insurance: HealthInsuranceParameters {
            rates: ContributionRates {
                general: dec!(0.14),
                long_term_care: dec!(0.036),
                sick_pay: dec!(0.006),
                care_surcharge: dec!(0.006),
            },
            contribution_ceiling: BTreeMap::from([(2025, dec!(66150))]),
            min_contribution_basis: BTreeMap::from([(2025, dec!(14980))]),
        },
        corporate: CorporateFlatTax {
            solidarity_rate: dec!(0.0075),
            corporate_income_tax_rate: dec!(0.15),
        },
        standard_allowance: BTreeMap::from([(2025, dec!(1230))]),
    }
}

pub(crate) fn tariff_2025() -> IncomeTaxTariff {
    IncomeTaxTariff {
        zone1_start: dec!(12096),
        zone2_start: dec!(17443),
        zone3_start: dec!(68480),
        zone4_start: dec!(277825),
        y_factor: dec!(932.30),
        y_offset: dec!(1400),
        z_factor: dec!(176.64),
        z_offset: dec!(2397),
        z_extra: dec!(1015.13),
        tax_42_offset: dec!(10911.92),
        tax_45_offset: dec!(19246.67),
    }
}
