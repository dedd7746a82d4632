mod business_report;
mod calculation_input;
mod tax_parameters;

pub use business_report::{BusinessReport, ReportBreakdown};
pub use calculation_input::CalculationInput;
pub use tax_parameters::{
    ContributionBounds, ContributionRates, CorporateFlatTax, HealthInsuranceParameters,
    IncomeTaxTariff, ParameterError, TaxParameterTable,
};
