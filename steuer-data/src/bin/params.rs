use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use steuer_data::{CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH, ParameterLoader};

/// Validate a tax parameter file.
///
/// Loads the file, resolves its includes, checks the table and lists the
/// tax years it fully covers.
#[derive(Parser, Debug)]
#[command(name = "steuer-params")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the parameter file
    #[arg(short, long, env = CONFIG_ENV_VAR, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Loading tax parameters from: {}", args.config.display());

    let table = ParameterLoader::load_file(&args.config)
        .with_context(|| format!("Failed to load: {}", args.config.display()))?;

    let years = table.years();
    let listed: Vec<String> = years.iter().map(i32::to_string).collect();
    println!("Parameters are valid.");
    println!("Covered tax years: {}", listed.join(", "));

    Ok(())
}
