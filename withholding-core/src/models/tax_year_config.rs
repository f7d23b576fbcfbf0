use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ExpenseCategory, InsuranceScheme, TaxBracket};

/// Errors raised when a fiscal year's configuration is out of range.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxYearConfigError {
    /// The tax unit must be positive; every threshold derives from it.
    #[error("tax unit must be positive, got {0}")]
    NonPositiveTaxUnit(Decimal),

    /// A multiple of the tax unit must be positive.
    #[error("{name} must be positive, got {value}")]
    NonPositiveMultiple { name: &'static str, value: Decimal },

    /// A rate must be between 0 and 1.
    #[error("{name} must be between 0 and 1, got {rate}")]
    InvalidRate { name: &'static str, rate: Decimal },

    /// A fixed bonus amount must be non-negative.
    #[error("{name} must be non-negative, got {amount}")]
    NegativeAmount { name: &'static str, amount: Decimal },

    /// The bracket table is empty.
    #[error("no tax brackets configured")]
    NoBrackets,

    /// Bracket upper bounds must strictly increase.
    #[error("bracket {position} does not start above the previous bracket")]
    BracketsNotAscending { position: usize },

    /// Only the last bracket may be open-ended, and it must be.
    #[error("the last bracket must be open-ended and no other bracket may be")]
    MisplacedOpenBracket,
}

/// Percentage applied to each deductible-expense category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRates {
    pub dining_lodging: Decimal,
    pub medical: Decimal,
    pub professional_services: Decimal,
    pub rental: Decimal,
    pub domestic_worker_contribution: Decimal,
}

impl ExpenseRates {
    pub fn rate(
        &self,
        category: ExpenseCategory,
    ) -> Decimal {
        match category {
            ExpenseCategory::DiningLodging => self.dining_lodging,
            ExpenseCategory::Medical => self.medical,
            ExpenseCategory::ProfessionalServices => self.professional_services,
            ExpenseCategory::Rental => self.rental,
            ExpenseCategory::DomesticWorkerContribution => self.domestic_worker_contribution,
        }
    }
}

/// Fixed values governing one fiscal year.
///
/// Everything the engine treats as a constant lives here so that a new year
/// is a new value rather than a code change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub fiscal_year: i32,

    /// Scaling constant for every threshold and ceiling of the year.
    pub tax_unit: Decimal,

    /// Units of income exempt from tax, also the deduction qualification bar (7).
    pub deduction_threshold_units: Decimal,

    /// Ceiling on the deductible-expense credit, in units (3).
    pub deductible_cap_units: Decimal,

    /// Bracket table sorted by ascending upper bound.
    pub brackets: Vec<TaxBracket>,

    pub government_surcharge_rate: Decimal,
    pub private_surcharge_rate: Decimal,

    pub expense_rates: ExpenseRates,

    /// Monthly family allowance, independent of the number of children.
    pub family_allowance: Decimal,

    /// Public-sector lump sum paid in July.
    pub public_midyear_bonus: Decimal,

    /// Public-sector schooling bonus paid every month when enabled.
    pub schooling_bonus: Decimal,

    /// Judicial-worker bonus paid in January.
    pub judicial_bonus: Decimal,

    /// Monthly income at or above which the judicial bonus is not paid.
    pub judicial_income_ceiling: Decimal,
}

impl TaxYearConfig {
    /// Income exempt from tax and the bar the full-year projection must
    /// exceed before expenses become deductible.
    pub fn deduction_threshold(&self) -> Decimal {
        self.tax_unit * self.deduction_threshold_units
    }

    /// Maximum deductible-expense credit.
    pub fn deductible_cap(&self) -> Decimal {
        self.tax_unit * self.deductible_cap_units
    }

    pub fn surcharge_rate(
        &self,
        scheme: InsuranceScheme,
    ) -> Decimal {
        match scheme {
            InsuranceScheme::Government => self.government_surcharge_rate,
            InsuranceScheme::Private => self.private_surcharge_rate,
        }
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`TaxYearConfigError`] if:
    /// - `tax_unit` is not positive
    /// - either unit multiple is not positive
    /// - any rate is outside [0, 1]
    /// - any fixed bonus amount is negative
    /// - the bracket table is empty, not ascending, or its open-ended
    ///   bracket is missing or misplaced
    pub fn validate(&self) -> Result<(), TaxYearConfigError> {
        if self.tax_unit <= Decimal::ZERO {
            return Err(TaxYearConfigError::NonPositiveTaxUnit(self.tax_unit));
        }

        for (name, value) in [
            ("deduction threshold units", self.deduction_threshold_units),
            ("deductible cap units", self.deductible_cap_units),
        ] {
            if value <= Decimal::ZERO {
                return Err(TaxYearConfigError::NonPositiveMultiple { name, value });
            }
        }

        let rates = [
            ("government surcharge rate", self.government_surcharge_rate),
            ("private surcharge rate", self.private_surcharge_rate),
            ("dining and lodging rate", self.expense_rates.dining_lodging),
            ("medical rate", self.expense_rates.medical),
            (
                "professional services rate",
                self.expense_rates.professional_services,
            ),
            ("rental rate", self.expense_rates.rental),
            (
                "domestic worker contribution rate",
                self.expense_rates.domestic_worker_contribution,
            ),
        ];
        for (name, rate) in rates {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(TaxYearConfigError::InvalidRate { name, rate });
            }
        }

        let amounts = [
            ("family allowance", self.family_allowance),
            ("public mid-year bonus", self.public_midyear_bonus),
            ("schooling bonus", self.schooling_bonus),
            ("judicial bonus", self.judicial_bonus),
            ("judicial income ceiling", self.judicial_income_ceiling),
        ];
        for (name, amount) in amounts {
            if amount < Decimal::ZERO {
                return Err(TaxYearConfigError::NegativeAmount { name, amount });
            }
        }

        self.validate_brackets()
    }

    fn validate_brackets(&self) -> Result<(), TaxYearConfigError> {
        let Some((last, rest)) = self.brackets.split_last() else {
            return Err(TaxYearConfigError::NoBrackets);
        };

        if last.upper_units.is_some() || rest.iter().any(|b| b.upper_units.is_none()) {
            return Err(TaxYearConfigError::MisplacedOpenBracket);
        }

        let mut previous = Decimal::ZERO;
        for (position, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(TaxYearConfigError::InvalidRate {
                    name: "bracket rate",
                    rate: bracket.rate,
                });
            }
            if let Some(upper) = bracket.upper_units {
                if upper <= previous {
                    return Err(TaxYearConfigError::BracketsNotAscending { position });
                }
                previous = upper;
            }
        }

        Ok(())
    }
}
