use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use withholding_core::{TaxYearRegistry, WithholdingEngine};
use withholding_data::report::{TableReport, ValidationReport};
use withholding_data::{ParametersFile, TaxYearLoader, logging};

/// Compute monthly income-tax withholding from a TOML parameters file.
///
/// Fiscal years 2024 and 2025 are built in. Other years can be supplied as a
/// pair of CSV files:
/// - tax years: fiscal_year, tax_unit, deduction_threshold_units,
///   deductible_cap_units, government_surcharge_rate, private_surcharge_rate,
///   family_allowance, public_midyear_bonus, schooling_bonus, judicial_bonus,
///   judicial_income_ceiling
/// - brackets: fiscal_year, upper_units (empty for the top bracket), rate
#[derive(Parser, Debug)]
#[command(name = "withholding")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the TOML file holding the calculation parameters
    #[arg(short, long)]
    params: PathBuf,

    /// CSV file with additional fiscal years
    #[arg(long, requires = "brackets")]
    tax_years: Option<PathBuf>,

    /// CSV file with the brackets of the additional fiscal years
    #[arg(long, requires = "tax_years")]
    brackets: Option<PathBuf>,

    /// Print the full result as JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log filter (e.g. "debug" or "withholding_core=debug"); defaults to RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

fn load_registry(args: &Args) -> Result<TaxYearRegistry> {
    let mut registry = TaxYearRegistry::with_builtin_years();

    let (Some(years_path), Some(brackets_path)) = (&args.tax_years, &args.brackets) else {
        return Ok(registry);
    };

    let years_file = File::open(years_path)
        .with_context(|| format!("Failed to open: {}", years_path.display()))?;
    let years = TaxYearLoader::parse_years(years_file)
        .with_context(|| format!("Failed to parse CSV: {}", years_path.display()))?;

    let brackets_file = File::open(brackets_path)
        .with_context(|| format!("Failed to open: {}", brackets_path.display()))?;
    let brackets = TaxYearLoader::parse_brackets(brackets_file)
        .with_context(|| format!("Failed to parse CSV: {}", brackets_path.display()))?;

    let configs = TaxYearLoader::build(years, &brackets).context("Failed to build fiscal years")?;
    let registered = TaxYearLoader::load(&mut registry, configs)
        .context("Failed to register fiscal years")?;

    info!(registered, "loaded fiscal years");

    Ok(registry)
}

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_logging(args.log_level.as_deref())?;

    let registry = load_registry(&args)?;
    let engine = WithholdingEngine::new(registry);

    let params = ParametersFile::load(&args.params)
        .with_context(|| format!("Failed to read parameters: {}", args.params.display()))?;

    let result = engine
        .calculate(&params)
        .context("Failed to calculate withholding")?;

    if args.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
        println!("{json}");
        return Ok(());
    }

    eprint!("{}", ValidationReport(&result.expense_validation));
    print!("{}", TableReport(&result));

    Ok(())
}
