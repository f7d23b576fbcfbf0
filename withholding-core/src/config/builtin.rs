//! Fiscal-year tables shipped with the crate.
//!
//! Later years are loaded at runtime (see the `withholding-data` crate) and
//! registered alongside these.

use rust_decimal::Decimal;

use crate::models::{ExpenseRates, TaxBracket, TaxYearConfig};

/// Five-bracket schedule, bounds in tax units.
pub fn standard_brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket::new(Some(Decimal::from(5)), Decimal::new(8, 2)),
        TaxBracket::new(Some(Decimal::from(20)), Decimal::new(14, 2)),
        TaxBracket::new(Some(Decimal::from(35)), Decimal::new(17, 2)),
        TaxBracket::new(Some(Decimal::from(45)), Decimal::new(20, 2)),
        TaxBracket::new(None, Decimal::new(30, 2)),
    ]
}

pub fn standard_expense_rates() -> ExpenseRates {
    ExpenseRates {
        dining_lodging: Decimal::new(15, 2),
        medical: Decimal::new(30, 2),
        professional_services: Decimal::new(30, 2),
        rental: Decimal::new(30, 2),
        domestic_worker_contribution: Decimal::ONE,
    }
}

fn tax_year(
    fiscal_year: i32,
    tax_unit: Decimal,
    family_allowance: Decimal,
) -> TaxYearConfig {
    TaxYearConfig {
        fiscal_year,
        tax_unit,
        deduction_threshold_units: Decimal::from(7),
        deductible_cap_units: Decimal::from(3),
        brackets: standard_brackets(),
        government_surcharge_rate: Decimal::new(9, 2),
        private_surcharge_rate: Decimal::new(675, 4),
        expense_rates: standard_expense_rates(),
        family_allowance,
        public_midyear_bonus: Decimal::from(300),
        schooling_bonus: Decimal::from(400),
        judicial_bonus: Decimal::from(1000),
        judicial_income_ceiling: Decimal::from(2000),
    }
}

/// Every built-in fiscal year, ascending.
pub fn builtin_tax_years() -> Vec<TaxYearConfig> {
    vec![
        tax_year(2024, Decimal::from(5150), Decimal::new(10250, 2)),
        tax_year(2025, Decimal::from(5350), Decimal::new(11300, 2)),
    ]
}

/// Built-in configuration for `fiscal_year`, if one ships with the crate.
pub fn builtin_tax_year(fiscal_year: i32) -> Option<TaxYearConfig> {
    builtin_tax_years()
        .into_iter()
        .find(|config| config.fiscal_year == fiscal_year)
}
