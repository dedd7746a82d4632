//! Integration tests against the shipped parameter files.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use steuer_core::calculations::{IncomeTaxSchedule, calc_tax};
use steuer_core::{
    BusinessReportError, CalculationInput, ParameterError, TaxParameterTable,
    calculate_business_report, read_report_artifact, write_report_artifact,
};
use steuer_data::ParameterLoader;
use tempfile::tempdir;

fn config_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../config")
}

fn shipped_parameters() -> TaxParameterTable {
    ParameterLoader::load_file(config_dir().join("config.toml"))
        .expect("Failed to load shipped parameters")
}

/// Moves the sections of an included year file under `prefix`.
fn prefixed_sections(
    content: &str,
    prefix: &str,
) -> String {
    content
        .lines()
        .map(|line| match line.strip_prefix('[') {
            Some(rest) => format!("[{prefix}.{rest}"),
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_shipped_parameters_cover_2020_to_2025() {
    let table = shipped_parameters();

    assert_eq!(table.years(), vec![2020, 2021, 2022, 2023, 2024, 2025]);
}

#[test]
fn test_shipped_parameters_resolve_like_inlined_content() {
    let dir = config_dir();
    let config = fs::read_to_string(dir.join("config.toml")).expect("read config");
    let tariffs = fs::read_to_string(dir.join("einkommensteuer.toml")).expect("read tariffs");
    let ceilings =
        fs::read_to_string(dir.join("beitragsbemessungsgrenzen.toml")).expect("read ceilings");

    let inlined = format!(
        "{}\n{}\n[steuern.krankenversicherung.beitragsbemessungsgrenzen]\n{}\n",
        config
            .replace("einkommensteuer = { include = \"einkommensteuer.toml\" }", "")
            .replace(
                "beitragsbemessungsgrenzen = { include = \"beitragsbemessungsgrenzen.toml\" }",
                ""
            ),
        prefixed_sections(&tariffs, "steuern.einkommensteuer"),
        ceilings,
    );

    let from_string =
        ParameterLoader::parse_str(&inlined, tempdir().expect("temp dir").path()).expect("inlined");

    assert_eq!(from_string, shipped_parameters());
}

#[test]
fn test_income_tax_per_year() {
    let table = shipped_parameters();

    let expected = [
        (2020, dec!(12141.64)),
        (2021, dec!(11994.32)),
        (2022, dec!(11816.03)),
        (2023, dec!(11343.04)),
        (2024, dec!(10872.67)),
        (2025, dec!(10691.35)),
    ];
    for (year, tax) in expected {
        assert_eq!(
            calc_tax(dec!(50000), false, year, &table),
            Ok(tax),
            "income tax on 50000 in {}",
            year
        );
    }
}

#[test]
fn test_income_tax_never_decreases_for_any_shipped_year() {
    let table = shipped_parameters();

    for year in table.years() {
        let schedule = IncomeTaxSchedule::for_year(&table, year).expect("shipped year");
        for married in [false, true] {
            let mut previous = Decimal::ZERO;
            let mut income = Decimal::ZERO;
            while income <= dec!(400000) {
                let tax = schedule.tax(income, married);
                assert!(
                    tax >= previous,
                    "{year}: tax dropped at {income} (married: {married}): {tax} < {previous}"
                );
                previous = tax;
                income += dec!(7);
            }
        }
    }
}

#[test]
fn test_married_tax_is_twice_half_income_tax_for_any_shipped_year() {
    let table = shipped_parameters();

    for year in table.years() {
        let schedule = IncomeTaxSchedule::for_year(&table, year).expect("shipped year");
        let mut income = Decimal::ZERO;
        while income <= dec!(700000) {
            let joint = schedule.tax(income, true);
            let split = schedule.tax(income / Decimal::TWO, false) * Decimal::TWO;
            assert!(
                (joint - split).abs() <= dec!(0.01),
                "{year}: income {income}: joint {joint} vs split {split}"
            );
            income += dec!(13);
        }
    }
}

#[test]
fn test_income_tax_rejects_year_outside_table() {
    let table = shipped_parameters();

    let result = calc_tax(dec!(50000), false, 2026, &table);

    assert_eq!(
        result,
        Err(ParameterError::YearNotFound {
            category: "income tax",
            year: 2026,
        })
    );
}

#[test]
fn test_baseline_report_with_shipped_parameters() {
    let table = shipped_parameters();

    let report =
        calculate_business_report(&CalculationInput::default(), &table).expect("profitable");

    assert_eq!(report.corporate_profit_before_tax, dec!(125000));
    assert_eq!(report.corporate_tax_total, dec!(30625.00));
    assert_eq!(report.personal_gross_income, dec!(30000));
    assert_eq!(report.taxable_income, dec!(17395.00));
    assert_eq!(report.income_tax, dec!(1003.64));
    assert_eq!(report.total_net_proceeds, dec!(116996.36));
    assert_eq!(report.total_levies, dec!(38003.64));
    assert_eq!(report.total_levies_percent, dec!(31.18));
}

#[test]
fn test_regression_report_round_trips_through_artifact() {
    let table = shipped_parameters();
    let input = CalculationInput {
        tax_year: 2025,
        trade_tax_multiplier: dec!(350),
        revenue: dec!(220000),
        costs: dec!(25000),
        director_salary: dec!(48000),
        other_income: dec!(5000),
        other_deductible_expenses: dec!(6000),
        married: true,
        spouse_taxable_income: dec!(10000),
        ..CalculationInput::default()
    };

    let report = calculate_business_report(&input, &table).expect("profitable");

    assert_eq!(report.corporate_profit_before_tax, dec!(147000));
    assert_eq!(report.corporate_tax_total, dec!(41160.00));
    assert_eq!(report.income_tax, dec!(4418.29));
    assert_eq!(report.total_net_proceeds, dec!(143159.21));
    assert_eq!(report.total_levies, dec!(56840.79));
    assert_eq!(report.total_levies_percent, dec!(34.93));

    let dir = tempdir().expect("temp dir");
    let path = write_report_artifact(&report, dir.path().join("artifacts/report.json"))
        .expect("write artifact");
    let read = read_report_artifact(&path).expect("read artifact");

    assert_eq!(read, report);
}

#[test]
fn test_earlier_year_uses_its_own_parameters() {
    let table = shipped_parameters();
    let input = CalculationInput {
        tax_year: 2020,
        ..CalculationInput::default()
    };

    let report = calculate_business_report(&input, &table).expect("profitable");

    // 30000 - 6375 - 1000 - 5000
    assert_eq!(report.taxable_income, dec!(17625.00));
    assert_eq!(report.tax_year, 2020);
}

#[test]
fn test_loss_with_shipped_parameters() {
    let table = shipped_parameters();
    let input = CalculationInput {
        revenue: dec!(10000),
        costs: dec!(9000),
        director_salary: dec!(2000),
        ..CalculationInput::default()
    };

    let err = calculate_business_report(&input, &table).expect_err("loss");

    assert!(matches!(err, BusinessReportError::Loss { .. }));
    assert!(err.to_string().contains("loss"));
}
