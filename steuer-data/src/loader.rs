use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use steuer_core::{
    ContributionRates, CorporateFlatTax, HealthInsuranceParameters, IncomeTaxTariff,
    ParameterError, TaxParameterTable,
};
use thiserror::Error;
use tracing::debug;

/// Parameter file used when no path is configured.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Environment variable overriding [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_ENV_VAR: &str = "STEUER_CONFIG";

const INCLUDE_KEY: &str = "include";
const INLINE_SOURCE: &str = "<inline>";

/// Errors that can occur when loading the tax parameters.
#[derive(Debug, Error)]
pub enum ParameterLoaderError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("include cycle: {} is already being loaded", path.display())]
    IncludeCycle { path: PathBuf },

    #[error("include directive in {} must name a file", path.display())]
    InvalidInclude { path: PathBuf },

    #[error("parameter file does not match the expected layout: {0}")]
    Schema(#[source] toml::de::Error),

    #[error("'{key}' in {category} is not a tax year")]
    InvalidYear { category: &'static str, key: String },

    #[error("invalid parameters: {0}")]
    Invalid(#[from] ParameterError),
}

/// Layout of the parameter file.
///
/// Keys follow the German terms used in the file; year-keyed tables use the
/// year as a string key.
#[derive(Debug, Deserialize)]
struct RawConfig {
    steuern: RawTaxes,
}

#[derive(Debug, Deserialize)]
struct RawTaxes {
    einkommensteuer: BTreeMap<String, IncomeTaxTariff>,
    krankenversicherung: RawHealthInsurance,
    flat_tax: RawFlatTax,
    werbungskostenpauschale: BTreeMap<String, Decimal>,
}

#[derive(Debug, Deserialize)]
struct RawHealthInsurance {
    rates: RawContributionRates,
    beitragsbemessungsgrenzen: BTreeMap<String, Decimal>,
    mindestbemessungsgrundlage: BTreeMap<String, Decimal>,
}

#[derive(Debug, Deserialize)]
struct RawContributionRates {
    general: Decimal,
    pv: Decimal,
    krankentagegeld: Decimal,
    pv_zuschlag: Decimal,
}

#[derive(Debug, Deserialize)]
struct RawFlatTax {
    gmbh: RawCorporateRates,
}

#[derive(Debug, Deserialize)]
struct RawCorporateRates {
    soli: Decimal,
    kst: Decimal,
}

/// Loader for the tax parameter table.
///
/// Reads a TOML document, replaces every table whose only key is `include`
/// with the parsed content of the named file, converts the result into a
/// [`TaxParameterTable`] and validates it.
///
/// Include paths are resolved relative to the directory of the file that
/// contains the directive. Includes may nest; a file that (directly or
/// indirectly) includes itself is rejected.
pub struct ParameterLoader;

impl ParameterLoader {
    /// Load and validate the parameter table from `path`.
    pub fn load_file(path: impl AsRef<Path>) -> Result<TaxParameterTable, ParameterLoaderError> {
        let path = path.as_ref();
        let canonical = canonicalize(path)?;
        let mut stack = vec![canonical.clone()];
        let value = load_value(&canonical, &mut stack)?;
        debug!(path = %path.display(), "loaded parameter file");
        Self::from_value(value)
    }

    /// Parse and validate a parameter table from a string.
    ///
    /// Includes are resolved relative to `base_dir`.
    pub fn parse_str(
        input: &str,
        base_dir: impl AsRef<Path>,
    ) -> Result<TaxParameterTable, ParameterLoaderError> {
        let value = parse_value(input, Path::new(INLINE_SOURCE))?;
        let mut stack = Vec::new();
        let value = resolve_includes(value, base_dir.as_ref(), Path::new(INLINE_SOURCE), &mut stack)?;
        Self::from_value(value)
    }

    fn from_value(value: toml::Value) -> Result<TaxParameterTable, ParameterLoaderError> {
        let raw: RawConfig = value.try_into().map_err(ParameterLoaderError::Schema)?;
        let table = convert(raw.steuern)?;
        table.validate()?;
        Ok(table)
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf, ParameterLoaderError> {
    fs::canonicalize(path).map_err(|source| ParameterLoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_value(
    input: &str,
    path: &Path,
) -> Result<toml::Value, ParameterLoaderError> {
    let table: toml::Table = toml::from_str(input).map_err(|source| ParameterLoaderError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::Value::Table(table))
}

/// Reads, parses and resolves the includes of the file at `path`.
///
/// `path` must be canonical and already on `stack`.
fn load_value(
    path: &Path,
    stack: &mut Vec<PathBuf>,
) -> Result<toml::Value, ParameterLoaderError> {
    let content = fs::read_to_string(path).map_err(|source| ParameterLoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = parse_value(&content, path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    resolve_includes(value, base_dir, path, stack)
}

fn resolve_includes(
    value: toml::Value,
    base_dir: &Path,
    source: &Path,
    stack: &mut Vec<PathBuf>,
) -> Result<toml::Value, ParameterLoaderError> {
    let toml::Value::Table(table) = value else {
        return Ok(value);
    };

    if table.len() == 1 {
        if let Some(target) = table.get(INCLUDE_KEY) {
            let Some(file) = target.as_str() else {
                return Err(ParameterLoaderError::InvalidInclude {
                    path: source.to_path_buf(),
                });
            };
            return include_file(&base_dir.join(file), stack);
        }
    }

    let mut resolved = toml::Table::new();
    for (key, child) in table {
        resolved.insert(key, resolve_includes(child, base_dir, source, stack)?);
    }
    Ok(toml::Value::Table(resolved))
}

fn include_file(
    path: &Path,
    stack: &mut Vec<PathBuf>,
) -> Result<toml::Value, ParameterLoaderError> {
    let canonical = canonicalize(path)?;
    if stack.contains(&canonical) {
        return Err(ParameterLoaderError::IncludeCycle { path: canonical });
    }

    debug!(path = %canonical.display(), "resolving include");
    stack.push(canonical.clone());
    let value = load_value(&canonical, stack);
    stack.pop();
    value
}

fn convert(raw: RawTaxes) -> Result<TaxParameterTable, ParameterLoaderError> {
    let rates = raw.krankenversicherung.rates;
    let corporate = raw.flat_tax.gmbh;

    Ok(TaxParameterTable {
        income_tax: by_year("einkommensteuer", raw.einkommensteuer)?,
        health_insurance: HealthInsuranceParameters {
            rates: ContributionRates {
                general: rates.general,
                long_term_care: rates.pv,
                sick_pay: rates.krankentagegeld,
                care_surcharge: rates.pv_zuschlag,
            },
            contribution_ceiling: by_year(
                "beitragsbemessungsgrenzen",
                raw.krankenversicherung.beitragsbemessungsgrenzen,
            )?,
            min_contribution_basis: by_year(
                "mindestbemessungsgrundlage",
                raw.krankenversicherung.mindestbemessungsgrundlage,
            )?,
        },
        corporate: CorporateFlatTax {
            solidarity_rate: corporate.soli,
            corporate_income_tax_rate: corporate.kst,
        },
        standard_allowance: by_year("werbungskostenpauschale", raw.werbungskostenpauschale)?,
    })
}

fn by_year<T>(
    category: &'static str,
    entries: BTreeMap<String, T>,
) -> Result<BTreeMap<i32, T>, ParameterLoaderError> {
    entries
        .into_iter()
        .map(|(key, value)| match key.trim().parse::<i32>() {
            Ok(year) => Ok((year, value)),
            Err(_) => Err(ParameterLoaderError::InvalidYear { category, key }),
        })
        .collect()
}
