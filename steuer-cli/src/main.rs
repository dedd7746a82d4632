use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser};
use rust_decimal::Decimal;
use tracing::{debug, info};

use steuer_cli::{batch, controls, csv_loader, logging, summary};
use steuer_core::{
    CalculationInput, TaxParameterTable, calculate_breakdown, write_report_artifact,
};
use steuer_data::{CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH, ParameterLoader};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Tax report for a GmbH director's compensation.
///
/// Derives corporate taxes, personal income tax, health insurance and net
/// proceeds for one scenario given on the command line, or for every row of
/// a scenario CSV.
#[derive(Debug, Parser)]
#[command(name = "steuersachen", version, about)]
struct Cli {
    /// Tax parameter file.
    #[arg(long, env = CONFIG_ENV_VAR, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Write the report artifact (JSON) to this path.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Calculate every scenario of this CSV file instead of the command-line inputs.
    #[arg(long, requires = "out_dir")]
    scenarios: Option<PathBuf>,

    /// Directory receiving one `scenario-<row>.json` per CSV row.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Also append log output to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Skip the range checks of the inputs.
    #[arg(long)]
    no_bounds: bool,

    /// Print the narrative summary after the figures.
    #[arg(long)]
    summary: bool,

    #[command(flatten)]
    inputs: InputArgs,
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Tax year.
    #[arg(long, default_value_t = 2025)]
    year: i32,

    /// Municipal trade tax multiplier in percent.
    #[arg(long, default_value = "250")]
    multiplier: Decimal,

    /// Annual revenue of the GmbH.
    #[arg(long, default_value = "170000")]
    revenue: Decimal,

    /// Annual costs of the GmbH.
    #[arg(long, default_value = "15000")]
    costs: Decimal,

    /// Annual director salary.
    #[arg(long, default_value = "30000")]
    salary: Decimal,

    /// Other personal income (rent, lease, other self-employment).
    #[arg(long, default_value = "0")]
    other_income: Decimal,

    /// Other deductible expenses.
    #[arg(long, default_value = "5000")]
    other_deductible: Decimal,

    /// Privately insured instead of statutory health insurance.
    #[arg(long)]
    private: bool,

    /// Supplementary rate of the statutory insurer in percent.
    #[arg(long, default_value = "2.45")]
    supplementary_rate: Decimal,

    /// Without sick pay entitlement.
    #[arg(long)]
    no_sick_pay: bool,

    /// Without the long-term care surcharge for the childless.
    #[arg(long)]
    no_care_surcharge: bool,

    /// Monthly private insurance premium.
    #[arg(long, default_value = "1000")]
    private_premium: Decimal,

    /// Tax-deductible share of the private premium in percent.
    #[arg(long, default_value = "100")]
    deductible_percent: Decimal,

    /// Jointly assessed with a spouse.
    #[arg(long)]
    married: bool,

    /// Taxable income of the spouse.
    #[arg(long, default_value = "0")]
    spouse_income: Decimal,
}

impl InputArgs {
    fn to_input(&self) -> CalculationInput {
        CalculationInput {
            tax_year: self.year,
            trade_tax_multiplier: self.multiplier,
            revenue: self.revenue,
            costs: self.costs,
            director_salary: self.salary,
            other_income: self.other_income,
            other_deductible_expenses: self.other_deductible,
            statutory_insurance: !self.private,
            supplementary_rate: self.supplementary_rate,
            sick_pay: !self.no_sick_pay,
            care_surcharge: !self.no_care_surcharge,
            private_premium_monthly: self.private_premium,
            insurance_deductible_percent: self.deductible_percent,
            married: self.married,
            spouse_taxable_income: self.spouse_income,
        }
    }
}

// ─── commands ────────────────────────────────────────────────────────────────

fn run_single(
    cli: &Cli,
    params: &TaxParameterTable,
) -> Result<()> {
    let input = controls::prepare(cli.inputs.to_input(), !cli.no_bounds)?;
    let breakdown = calculate_breakdown(&input, params)?;

    print!("{}", summary::render_figures(&breakdown));
    if cli.summary {
        println!();
        print!("{}", summary::render_summary(&input, &breakdown));
    }

    if let Some(path) = &cli.output {
        let written = write_report_artifact(&breakdown.report, path)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        info!(path = %written.display(), "report artifact written");
    }
    Ok(())
}

fn run_scenarios(
    scenarios: &Path,
    out_dir: &Path,
    check_bounds: bool,
    params: &TaxParameterTable,
) -> Result<()> {
    let inputs = csv_loader::load_from_file(scenarios)
        .with_context(|| format!("Failed to load scenarios: {}", scenarios.display()))?;
    info!(count = inputs.len(), file = %scenarios.display(), "loaded scenarios");

    let outcomes = batch::run_scenarios(inputs, out_dir, check_bounds, params);
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();

    if failed > 0 {
        bail!("{failed} scenario(s) could not be calculated");
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_file.as_deref())?;

    debug!(config = %cli.config.display(), "loading tax parameters");
    let params = ParameterLoader::load_file(&cli.config)
        .with_context(|| format!("Failed to load tax parameters: {}", cli.config.display()))?;

    match (&cli.scenarios, &cli.out_dir) {
        (Some(scenarios), Some(out_dir)) => {
            run_scenarios(scenarios, out_dir, !cli.no_bounds, &params)
        }
        _ => run_single(&cli, &params),
    }
}
