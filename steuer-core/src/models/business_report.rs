use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The derived figures of one calculation.
///
/// Serialised field names are the keys of the report artifact. Amounts carry
/// two decimal places; the two percentage fields are already scaled by 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessReport {
    #[serde(rename = "steuerjahr")]
    pub tax_year: i32,

    #[serde(rename = "gmbh_gewinn_vor_steuern", with = "rust_decimal::serde::float")]
    pub corporate_profit_before_tax: Decimal,

    #[serde(rename = "gmbh_steuern_gesamt", with = "rust_decimal::serde::float")]
    pub corporate_tax_total: Decimal,

    #[serde(rename = "gmbh_gewinn_nach_steuern", with = "rust_decimal::serde::float")]
    pub corporate_profit_after_tax: Decimal,

    #[serde(rename = "gesamtes_gf_brutto", with = "rust_decimal::serde::float")]
    pub personal_gross_income: Decimal,

    #[serde(rename = "krankenkassenbeitrag", with = "rust_decimal::serde::float")]
    pub health_insurance_contribution: Decimal,

    #[serde(rename = "zve", with = "rust_decimal::serde::float")]
    pub taxable_income: Decimal,

    #[serde(rename = "einkommensteuer", with = "rust_decimal::serde::float")]
    pub income_tax: Decimal,

    /// Marginal income tax rate in percent.
    #[serde(rename = "grenzsteuersatz", with = "rust_decimal::serde::float")]
    pub marginal_tax_rate: Decimal,

    #[serde(rename = "persoenliches_netto", with = "rust_decimal::serde::float")]
    pub personal_net_income: Decimal,

    /// Personal net income plus the corporation's profit after tax.
    #[serde(rename = "gesamter_nettoerloes", with = "rust_decimal::serde::float")]
    pub total_net_proceeds: Decimal,

    /// Corporate taxes plus income tax and insurance contribution.
    #[serde(rename = "gesamte_abgaben", with = "rust_decimal::serde::float")]
    pub total_levies: Decimal,

    /// Share of revenue not ending up as net proceeds, in percent.
    #[serde(rename = "gesamte_abgaben_prozentual", with = "rust_decimal::serde::float")]
    pub total_levies_percent: Decimal,
}

/// Intermediate figures behind a [`BusinessReport`].
///
/// Not part of the artifact. The percentage fields are relative to different
/// bases than [`BusinessReport::total_levies_percent`] and must not be
/// compared with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportBreakdown {
    pub report: BusinessReport,
    pub trade_tax: Decimal,
    pub solidarity_surcharge: Decimal,
    pub corporate_income_tax: Decimal,
    pub deductible_insurance: Decimal,
    pub standard_allowance: Decimal,
    /// Personal income tax plus insurance contribution.
    pub personal_levies: Decimal,
    /// Corporate taxes relative to pre-tax profit, in percent.
    pub corporate_burden_percent: Decimal,
    /// Income tax relative to taxable income, in percent.
    pub average_tax_rate_percent: Decimal,
    /// Personal levies relative to taxable income, in percent.
    pub personal_burden_percent: Decimal,
}
