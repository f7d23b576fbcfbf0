use std::collections::{BTreeMap, HashSet};
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use withholding_core::config::{TaxYearRegistry, TaxYearRegistryError, standard_expense_rates};
use withholding_core::{ExpenseRates, TaxBracket, TaxYearConfig};

/// Errors that can occur when loading fiscal-year tables.
#[derive(Debug, Error)]
pub enum TaxYearLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Fiscal year {0} appears more than once in the tax years file")]
    DuplicateYear(i32),

    #[error("Brackets reference fiscal year {0}, which is not in the tax years file")]
    UnknownYear(i32),

    #[error("Registry error: {0}")]
    Registry(#[from] TaxYearRegistryError),
}

impl From<csv::Error> for TaxYearLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxYearLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the tax years CSV file.
///
/// Columns:
/// - `fiscal_year`: The fiscal year (e.g., 2026)
/// - `tax_unit`: Value of one tax unit for the year
/// - `deduction_threshold_units`, `deductible_cap_units`: Multiples of the
///   unit; empty for the usual 7 and 3
/// - `government_surcharge_rate`, `private_surcharge_rate`: Gratuity
///   surcharge per insurance scheme, as decimals
/// - `family_allowance`, `public_midyear_bonus`, `schooling_bonus`,
///   `judicial_bonus`, `judicial_income_ceiling`: Fixed amounts
///
/// Expense percentages are not part of the file; every loaded year uses the
/// standard rates.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxYearRecord {
    pub fiscal_year: i32,
    pub tax_unit: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub deduction_threshold_units: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub deductible_cap_units: Option<Decimal>,
    pub government_surcharge_rate: Decimal,
    pub private_surcharge_rate: Decimal,
    pub family_allowance: Decimal,
    pub public_midyear_bonus: Decimal,
    pub schooling_bonus: Decimal,
    pub judicial_bonus: Decimal,
    pub judicial_income_ceiling: Decimal,
}

/// A single record from the tax brackets CSV file.
///
/// Rows for a year must be listed in ascending order:
/// - `fiscal_year`: The fiscal year the bracket belongs to
/// - `upper_units`: Inclusive upper bound in tax units (empty for the
///   open-ended top bracket)
/// - `rate`: The bracket rate as a decimal (e.g., 0.14 for 14%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub fiscal_year: i32,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_units: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl TaxYearRecord {
    fn into_config(
        self,
        brackets: Vec<TaxBracket>,
        expense_rates: ExpenseRates,
    ) -> TaxYearConfig {
        TaxYearConfig {
            fiscal_year: self.fiscal_year,
            tax_unit: self.tax_unit,
            deduction_threshold_units: self
                .deduction_threshold_units
                .unwrap_or(Decimal::from(7)),
            deductible_cap_units: self.deductible_cap_units.unwrap_or(Decimal::from(3)),
            brackets,
            government_surcharge_rate: self.government_surcharge_rate,
            private_surcharge_rate: self.private_surcharge_rate,
            expense_rates,
            family_allowance: self.family_allowance,
            public_midyear_bonus: self.public_midyear_bonus,
            schooling_bonus: self.schooling_bonus,
            judicial_bonus: self.judicial_bonus,
            judicial_income_ceiling: self.judicial_income_ceiling,
        }
    }
}

/// Loader for fiscal-year tables from CSV files.
///
/// Years and brackets live in two files. [`TaxYearLoader::build`] joins them
/// into [`TaxYearConfig`] values and [`TaxYearLoader::load`] registers those
/// in a [`TaxYearRegistry`], where they are validated.
pub struct TaxYearLoader;

impl TaxYearLoader {
    /// Parse tax year records from a CSV reader.
    pub fn parse_years<R: Read>(reader: R) -> Result<Vec<TaxYearRecord>, TaxYearLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxYearRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse tax bracket records from a CSV reader.
    pub fn parse_brackets<R: Read>(
        reader: R
    ) -> Result<Vec<TaxBracketRecord>, TaxYearLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Join year and bracket records into configurations, ordered by year.
    ///
    /// Brackets keep the order they have in the file. A year with no bracket
    /// rows yields a configuration that fails validation on registration.
    pub fn build(
        years: Vec<TaxYearRecord>,
        brackets: &[TaxBracketRecord],
    ) -> Result<Vec<TaxYearConfig>, TaxYearLoaderError> {
        let mut seen = HashSet::new();
        for record in &years {
            if !seen.insert(record.fiscal_year) {
                return Err(TaxYearLoaderError::DuplicateYear(record.fiscal_year));
            }
        }

        let mut by_year: BTreeMap<i32, Vec<TaxBracket>> = BTreeMap::new();
        for record in brackets {
            if !seen.contains(&record.fiscal_year) {
                return Err(TaxYearLoaderError::UnknownYear(record.fiscal_year));
            }
            by_year
                .entry(record.fiscal_year)
                .or_default()
                .push(TaxBracket::new(record.upper_units, record.rate));
        }

        let mut configs: Vec<TaxYearConfig> = years
            .into_iter()
            .map(|record| {
                let year_brackets = by_year.remove(&record.fiscal_year).unwrap_or_default();
                if year_brackets.is_empty() {
                    warn!(fiscal_year = record.fiscal_year, "no brackets for fiscal year");
                }
                record.into_config(year_brackets, standard_expense_rates())
            })
            .collect();
        configs.sort_by_key(|config| config.fiscal_year);

        Ok(configs)
    }

    /// Register loaded years, replacing any built-in year with the same
    /// number. Returns the number of years registered.
    ///
    /// Registration stops at the first invalid year; years registered before
    /// it stay in the registry.
    pub fn load(
        registry: &mut TaxYearRegistry,
        configs: Vec<TaxYearConfig>,
    ) -> Result<usize, TaxYearLoaderError> {
        let mut registered = 0;

        for config in configs {
            let year = config.fiscal_year;
            if registry.register(config)?.is_some() {
                debug!(fiscal_year = year, "replaced existing fiscal year");
            }
            registered += 1;
        }

        Ok(registered)
    }
}
