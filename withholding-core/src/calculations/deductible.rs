//! Deductible-expense credit.
//!
//! Each category's amount is multiplied by its percentage, the results are
//! summed and the sum is capped at the year's ceiling (3 tax units). The
//! credit only applies when the full-year projected gross income exceeds the
//! qualification threshold (7 tax units); otherwise the summary is all zeros
//! with the full cap as headroom.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::common::round_half_up;
use crate::models::{
    CategoryDeduction, DeductibleExpenseSummary, DeductibleExpenses, ExpenseCategory,
    ExpenseValidation, TaxYearConfig,
};

/// Evaluates reported expenses against a fiscal year's rates and cap.
#[derive(Debug, Clone)]
pub struct DeductibleExpenseEvaluator<'a> {
    config: &'a TaxYearConfig,
    precision: u32,
}

impl<'a> DeductibleExpenseEvaluator<'a> {
    pub fn new(
        config: &'a TaxYearConfig,
        precision: u32,
    ) -> Self {
        Self { config, precision }
    }

    /// Computes the deduction for the year.
    ///
    /// `full_year_gross_income` must be projected from the start month
    /// through December, regardless of any contract end.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use withholding_core::calculations::DeductibleExpenseEvaluator;
    /// use withholding_core::config::builtin_tax_year;
    /// use withholding_core::DeductibleExpenses;
    ///
    /// let config = builtin_tax_year(2025).unwrap();
    /// let expenses = DeductibleExpenses {
    ///     rental: dec!(12000.00),
    ///     ..DeductibleExpenses::default()
    /// };
    ///
    /// let summary = DeductibleExpenseEvaluator::new(&config, 2).evaluate(&expenses, dec!(60000.00));
    ///
    /// assert_eq!(summary.deduction, dec!(3600.00));
    /// assert_eq!(summary.headroom, dec!(12450.00));
    /// ```
    pub fn evaluate(
        &self,
        expenses: &DeductibleExpenses,
        full_year_gross_income: Decimal,
    ) -> DeductibleExpenseSummary {
        let cap = self.config.deductible_cap();
        let qualifies = full_year_gross_income > self.config.deduction_threshold();

        let categories: Vec<CategoryDeduction> = ExpenseCategory::ALL
            .iter()
            .map(|category| self.category_deduction(*category, expenses, qualifies))
            .collect();

        let uncapped_deduction = categories
            .iter()
            .fold(Decimal::ZERO, |sum, c| sum.saturating_add(c.deduction));
        let deduction = uncapped_deduction.min(cap);

        debug!(
            qualifies,
            full_year_gross_income = %full_year_gross_income,
            uncapped = %uncapped_deduction,
            deduction = %deduction,
            "evaluated deductible expenses"
        );

        DeductibleExpenseSummary {
            categories,
            total_expenses: expenses.total(),
            uncapped_deduction,
            deduction,
            cap,
            headroom: cap.saturating_sub(deduction),
            qualifies,
        }
    }

    fn category_deduction(
        &self,
        category: ExpenseCategory,
        expenses: &DeductibleExpenses,
        qualifies: bool,
    ) -> CategoryDeduction {
        let amount = expenses.amount(category);
        let percentage = self.config.expense_rates.rate(category);
        let deduction = if qualifies {
            round_half_up(amount * percentage, self.precision)
        } else {
            Decimal::ZERO
        };

        CategoryDeduction {
            category,
            amount,
            percentage,
            deduction,
        }
    }
}

/// Checks reported expenses without running a calculation.
///
/// Negative amounts are errors. A category whose deduction alone would exceed
/// the cap, or a set whose combined deduction does, raises a warning since
/// the excess cannot be used.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use withholding_core::calculations::validate_deductible_expenses;
/// use withholding_core::config::builtin_tax_year;
/// use withholding_core::DeductibleExpenses;
///
/// let config = builtin_tax_year(2025).unwrap();
/// let expenses = DeductibleExpenses {
///     medical: dec!(-10.00),
///     ..DeductibleExpenses::default()
/// };
///
/// let report = validate_deductible_expenses(&expenses, &config);
///
/// assert!(!report.is_valid);
/// assert_eq!(report.errors.len(), 1);
/// ```
pub fn validate_deductible_expenses(
    expenses: &DeductibleExpenses,
    config: &TaxYearConfig,
) -> ExpenseValidation {
    let cap = config.deductible_cap();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut combined = Decimal::ZERO;

    for category in ExpenseCategory::ALL {
        let amount = expenses.amount(category);
        if amount < Decimal::ZERO {
            warn!(category = category.as_str(), amount = %amount, "negative deductible expense");
            errors.push(format!(
                "{} amount cannot be negative (got {amount})",
                category.label()
            ));
            continue;
        }

        let deduction = amount * config.expense_rates.rate(category);
        combined = combined.saturating_add(deduction);
        if deduction > cap {
            warnings.push(format!(
                "{} deduction of {} exceeds the cap of {cap}; the excess is not deductible",
                category.label(),
                deduction.normalize()
            ));
        }
    }

    if warnings.is_empty() && combined > cap {
        warnings.push(format!(
            "combined deduction of {} exceeds the cap of {cap}; only {cap} is deductible",
            combined.normalize()
        ));
    }

    ExpenseValidation {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::config::builtin_tax_year;

    fn config() -> TaxYearConfig {
        builtin_tax_year(2025).unwrap()
    }

    fn full_expenses() -> DeductibleExpenses {
        DeductibleExpenses {
            dining_lodging: dec!(10000.00),
            medical: dec!(5000.00),
            professional_services: dec!(20000.00),
            rental: dec!(24000.00),
            domestic_worker_contribution: dec!(500.00),
        }
    }

    // =========================================================================
    // evaluate tests
    // =========================================================================

    #[test]
    fn evaluate_applies_category_percentages() {
        let config = config();
        let expenses = DeductibleExpenses {
            dining_lodging: dec!(1000.00),
            medical: dec!(1000.00),
            domestic_worker_contribution: dec!(250.00),
            ..DeductibleExpenses::default()
        };

        let summary = DeductibleExpenseEvaluator::new(&config, 2).evaluate(&expenses, dec!(80000));

        let deductions: Vec<_> = summary.categories.iter().map(|c| c.deduction).collect();
        assert_eq!(
            deductions,
            vec![dec!(150.00), dec!(300.00), dec!(0), dec!(0), dec!(250.00)]
        );
        assert_eq!(summary.deduction, dec!(700.00));
        assert_eq!(summary.headroom, dec!(15350.00));
        assert!(summary.qualifies);
    }

    #[test]
    fn evaluate_caps_at_three_units() {
        let config = config();

        let summary =
            DeductibleExpenseEvaluator::new(&config, 2).evaluate(&full_expenses(), dec!(120000));

        // 1500 + 1500 + 6000 + 7200 + 500 = 16700, capped at 3 * 5350
        assert_eq!(summary.uncapped_deduction, dec!(16700.00));
        assert_eq!(summary.deduction, dec!(16050));
        assert_eq!(summary.headroom, dec!(0));
        assert_eq!(summary.total_expenses, dec!(59500.00));
    }

    #[test]
    fn evaluate_below_threshold_is_all_zero_with_full_headroom() {
        let config = config();

        // 7 * 5350 = 37450: income must exceed it, not equal it
        let summary =
            DeductibleExpenseEvaluator::new(&config, 2).evaluate(&full_expenses(), dec!(37450));

        assert!(!summary.qualifies);
        assert_eq!(summary.deduction, dec!(0));
        assert_eq!(summary.uncapped_deduction, dec!(0));
        assert_eq!(summary.headroom, dec!(16050));
        assert!(summary.categories.iter().all(|c| c.deduction == dec!(0)));
    }

    #[test]
    fn evaluate_cap_holds_for_huge_amounts() {
        let config = config();
        let expenses = DeductibleExpenses {
            domestic_worker_contribution: dec!(99999999.99),
            rental: dec!(99999999.99),
            ..DeductibleExpenses::default()
        };

        let summary = DeductibleExpenseEvaluator::new(&config, 2).evaluate(&expenses, dec!(500000));

        assert_eq!(summary.deduction, config.deductible_cap());
    }

    #[test]
    fn evaluate_does_not_clamp_negative_amounts() {
        let config = config();
        let expenses = DeductibleExpenses {
            medical: dec!(-1000.00),
            ..DeductibleExpenses::default()
        };

        let summary = DeductibleExpenseEvaluator::new(&config, 2).evaluate(&expenses, dec!(80000));

        assert_eq!(summary.deduction, dec!(-300.00));
    }

    // =========================================================================
    // validate_deductible_expenses tests
    // =========================================================================

    #[test]
    fn validate_accepts_ordinary_expenses() {
        let expenses = DeductibleExpenses {
            medical: dec!(2000.00),
            rental: dec!(6000.00),
            ..DeductibleExpenses::default()
        };

        let report = validate_deductible_expenses(&expenses, &config());

        assert_eq!(
            report,
            ExpenseValidation {
                is_valid: true,
                errors: vec![],
                warnings: vec![],
            }
        );
    }

    #[test]
    fn validate_flags_each_negative_category() {
        let expenses = DeductibleExpenses {
            medical: dec!(-5.00),
            rental: dec!(-1.00),
            ..DeductibleExpenses::default()
        };

        let report = validate_deductible_expenses(&expenses, &config());

        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec![
                "Medical services amount cannot be negative (got -5.00)".to_string(),
                "Rental amount cannot be negative (got -1.00)".to_string(),
            ]
        );
    }

    #[test]
    fn validate_warns_when_single_category_exceeds_cap() {
        let expenses = DeductibleExpenses {
            domestic_worker_contribution: dec!(20000),
            ..DeductibleExpenses::default()
        };

        let report = validate_deductible_expenses(&expenses, &config());

        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("Domestic worker contribution deduction of 20000"));
    }

    #[test]
    fn validate_warns_when_combined_deduction_exceeds_cap() {
        let report = validate_deductible_expenses(&full_expenses(), &config());

        assert!(report.is_valid);
        assert_eq!(
            report.warnings,
            vec!["combined deduction of 16700 exceeds the cap of 16050; only 16050 is deductible"
                .to_string()]
        );
    }
}
