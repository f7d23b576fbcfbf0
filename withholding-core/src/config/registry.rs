use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use super::builtin_tax_years;
use crate::models::{TaxYearConfig, TaxYearConfigError};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxYearRegistryError {
    /// No configuration is registered for the requested year.
    #[error("no configuration for fiscal year {year}; available: {available:?}")]
    UnknownFiscalYear { year: i32, available: Vec<i32> },

    /// The configuration offered for registration failed validation.
    #[error("invalid configuration for fiscal year {year}: {source}")]
    InvalidConfig {
        year: i32,
        #[source]
        source: TaxYearConfigError,
    },
}

/// Registry of [`TaxYearConfig`] values, keyed by fiscal year.
///
/// Typical lifetime:
/// 1. Create with `TaxYearRegistry::with_builtin_years()` (or `new()` for an
///    empty one).
/// 2. Call `register` for any year loaded from outside the crate.
/// 3. Call `get` whenever a calculation needs its year's constants.
#[derive(Debug, Clone, Default)]
pub struct TaxYearRegistry {
    years: HashMap<i32, TaxYearConfig>,
}

impl TaxYearRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            years: HashMap::new(),
        }
    }

    /// Create a registry holding every year shipped with the crate.
    pub fn with_builtin_years() -> Self {
        let mut registry = Self::new();
        for config in builtin_tax_years() {
            registry.years.insert(config.fiscal_year, config);
        }
        registry
    }

    /// Validate and register a fiscal year.
    ///
    /// If the year is already present it is replaced and the previous value
    /// returned.
    ///
    /// # Errors
    /// * [`TaxYearRegistryError::InvalidConfig`]: the configuration failed
    ///   [`TaxYearConfig::validate`]; the registry is left unchanged.
    pub fn register(
        &mut self,
        config: TaxYearConfig,
    ) -> Result<Option<TaxYearConfig>, TaxYearRegistryError> {
        config
            .validate()
            .map_err(|source| TaxYearRegistryError::InvalidConfig {
                year: config.fiscal_year,
                source,
            })?;

        debug!(fiscal_year = config.fiscal_year, tax_unit = %config.tax_unit, "registered fiscal year");
        Ok(self.years.insert(config.fiscal_year, config))
    }

    /// Every registered year, ascending.
    pub fn available_years(&self) -> Vec<i32> {
        let mut years: Vec<_> = self.years.keys().copied().collect();
        years.sort_unstable();
        years
    }

    /// Look up a fiscal year.
    ///
    /// # Errors
    /// * [`TaxYearRegistryError::UnknownFiscalYear`]: nothing is registered
    ///   for `year`. The error lists the available years.
    pub fn get(
        &self,
        year: i32,
    ) -> Result<&TaxYearConfig, TaxYearRegistryError> {
        self.years
            .get(&year)
            .ok_or_else(|| TaxYearRegistryError::UnknownFiscalYear {
                year,
                available: self.available_years(),
            })
    }
}
