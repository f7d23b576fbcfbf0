use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use withholding_core::CalculationParameters;

/// Errors that can occur when reading a parameters file.
#[derive(Debug, Error)]
pub enum ParametersError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Reader for calculation parameters stored as TOML.
///
/// Only `fiscal_year` and `monthly_income` are required:
///
/// ```toml
/// fiscal_year = 2025
/// monthly_income = "10000.00"
/// start_month = 1
///
/// [[additional_income]]
/// month = 3
/// amount = "5000.00"
///
/// [deductible_expenses]
/// rental = "24000.00"
///
/// [contract]
/// kind = "limited"
/// end_month = 6
/// ```
///
/// Amounts may be written as strings or numbers; strings keep every digit.
pub struct ParametersFile;

impl ParametersFile {
    pub fn parse(contents: &str) -> Result<CalculationParameters, ParametersError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<CalculationParameters, ParametersError> {
        let contents = fs::read_to_string(path).map_err(|source| ParametersError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }
}
