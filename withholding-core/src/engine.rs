//! Entry point tying the calculation stages together.

use thiserror::Error;
use tracing::debug;

use crate::calculations::{
    BreakdownBuilder, DeductibleExpenseEvaluator, IncomeProjection, schedule_span,
    validate_deductible_expenses,
};
use crate::config::{TaxYearRegistry, TaxYearRegistryError};
use crate::models::{
    CalculationParameters, CalculationResult, DeductibleExpenses, ExpenseValidation,
    TaxYearConfig,
};

/// Errors that can occur when running a calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WithholdingError {
    #[error(transparent)]
    TaxYear(#[from] TaxYearRegistryError),
}

/// Stateless calculator over a read-only registry of fiscal years.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use withholding_core::{BonusOptions, CalculationParameters, WithholdingEngine};
///
/// let engine = WithholdingEngine::with_builtin_years();
/// let mut params = CalculationParameters::new(2025, dec!(10000.00));
/// params.bonuses = BonusOptions::none();
///
/// let result = engine.calculate(&params).unwrap();
///
/// assert_eq!(result.months.len(), 12);
/// assert_eq!(result.summary.annual_tax, dec!(11557.00));
/// assert_eq!(result.summary.ordinary_withholding, dec!(11557.00));
/// ```
#[derive(Debug, Clone, Default)]
pub struct WithholdingEngine {
    registry: TaxYearRegistry,
}

impl WithholdingEngine {
    pub fn new(registry: TaxYearRegistry) -> Self {
        Self { registry }
    }

    /// Engine knowing only the built-in fiscal years.
    pub fn with_builtin_years() -> Self {
        Self::new(TaxYearRegistry::with_builtin_years())
    }

    pub fn registry(&self) -> &TaxYearRegistry {
        &self.registry
    }

    /// Runs the full withholding calculation.
    ///
    /// Fails only when the fiscal year is not registered. Expense problems
    /// are reported in [`CalculationResult::expense_validation`] and the
    /// calculation goes ahead regardless.
    pub fn calculate(
        &self,
        params: &CalculationParameters,
    ) -> Result<CalculationResult, WithholdingError> {
        let config = self.registry.get(params.fiscal_year)?;
        Ok(calculate_with_config(params, config))
    }

    /// Checks expense amounts against a registered year's cap.
    pub fn validate_deductible_expenses(
        &self,
        fiscal_year: i32,
        expenses: &DeductibleExpenses,
    ) -> Result<ExpenseValidation, WithholdingError> {
        let config = self.registry.get(fiscal_year)?;
        Ok(validate_deductible_expenses(expenses, config))
    }
}

/// Runs the calculation against an explicit year configuration.
///
/// The configuration is assumed valid; [`TaxYearRegistry::register`]
/// enforces that for engine callers.
pub fn calculate_with_config(
    params: &CalculationParameters,
    config: &TaxYearConfig,
) -> CalculationResult {
    let resolved = params.resolve(config);
    let expense_validation = validate_deductible_expenses(&params.deductible_expenses, config);

    let full_year =
        IncomeProjection::from_months(&schedule_span(&resolved, resolved.full_year)).gross_income();
    let deductible_expenses = DeductibleExpenseEvaluator::new(config, resolved.precision)
        .evaluate(&params.deductible_expenses, full_year);

    let inputs = schedule_span(&resolved, resolved.months);
    let builder = BreakdownBuilder::new(config, &resolved, deductible_expenses.deduction);
    let months = builder.build(&inputs);
    let summary = builder.summarize(&months, deductible_expenses);

    debug!(
        fiscal_year = params.fiscal_year,
        months = summary.months_processed,
        annual_tax = %summary.annual_tax,
        annual_withholding = %summary.annual_withholding,
        "withholding calculated"
    );

    CalculationResult {
        parameters: params.clone(),
        months,
        summary,
        expense_validation,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{
        AdditionalIncome, BonusOptions, ContractTerm, InsuranceScheme, ManualBonus, Observation,
    };

    fn engine() -> WithholdingEngine {
        WithholdingEngine::with_builtin_years()
    }

    fn salary_only(income: Decimal) -> CalculationParameters {
        let mut params = CalculationParameters::new(2025, income);
        params.bonuses = BonusOptions::none();
        params
    }

    fn ordinary_total(result: &CalculationResult) -> Decimal {
        result.months.iter().map(|m| m.ordinary_withholding).sum()
    }

    // =========================================================================
    // engine tests
    // =========================================================================

    #[test]
    fn unknown_year_names_available_years() {
        let params = CalculationParameters::new(2019, dec!(5000));

        let err = engine().calculate(&params).unwrap_err();

        assert_eq!(
            err,
            WithholdingError::TaxYear(TaxYearRegistryError::UnknownFiscalYear {
                year: 2019,
                available: vec![2024, 2025],
            })
        );
        assert!(err.to_string().contains("2024, 2025"));
    }

    #[test]
    fn validate_deductible_expenses_uses_registered_year() {
        let expenses = DeductibleExpenses {
            rental: dec!(-1),
            ..DeductibleExpenses::default()
        };

        let report = engine()
            .validate_deductible_expenses(2024, &expenses)
            .unwrap();

        assert!(!report.is_valid);
        assert!(
            engine()
                .validate_deductible_expenses(2030, &expenses)
                .is_err()
        );
    }

    #[test]
    fn result_echoes_parameters() {
        let params = salary_only(dec!(4200.00));

        let result = engine().calculate(&params).unwrap();

        assert_eq!(result.parameters, params);
    }

    // =========================================================================
    // worked examples
    // =========================================================================

    #[test]
    fn salary_only_full_year() {
        let result = engine().calculate(&salary_only(dec!(10000.00))).unwrap();

        assert_eq!(result.summary.annual_income, dec!(120000.00));
        assert_eq!(result.summary.net_taxable_income, dec!(82550.00));
        assert_eq!(result.summary.annual_tax, dec!(11557.00));
        assert_eq!(result.summary.marginal_rate, dec!(0.14));
        assert_eq!(result.month(1).unwrap().ordinary_withholding, dec!(963.08));
        assert_eq!(result.month(5).unwrap().ordinary_withholding, dec!(963.09));
        assert_eq!(result.month(12).unwrap().ordinary_withholding, dec!(963.09));
        assert_eq!(result.summary.average_monthly_withholding, dec!(963.08));
    }

    #[test]
    fn gratuity_example_government_scheme() {
        let result = engine()
            .calculate(&CalculationParameters::new(2025, dec!(2500.00)))
            .unwrap();

        let july = result.month(7).unwrap().gratuity.clone().unwrap();
        assert_eq!(july.base, dec!(2916.67));
        assert_eq!(july.surcharge, dec!(262.50));
        assert_eq!(july.total, dec!(3179.17));

        let december = result.month(12).unwrap().gratuity.clone().unwrap();
        assert_eq!(december.base, dec!(5000.00));
        assert_eq!(december.surcharge, dec!(450.00));
        assert_eq!(december.total, dec!(5450.00));
    }

    #[test]
    fn private_scheme_uses_lower_surcharge() {
        let mut params = CalculationParameters::new(2025, dec!(2500.00));
        params.insurance_scheme = InsuranceScheme::Private;

        let result = engine().calculate(&params).unwrap();

        // 5000 * 6.75%
        assert_eq!(
            result.month(12).unwrap().gratuity.as_ref().unwrap().surcharge,
            dec!(337.50)
        );
    }

    #[test]
    fn severance_example() {
        let result = engine()
            .calculate(&CalculationParameters::new(2025, dec!(3000.00)))
            .unwrap();

        let may = result.month(5).unwrap().severance.clone().unwrap();
        assert_eq!(may.base, dec!(1250.00));
        assert_eq!(may.day_component, dec!(250.00));
        assert_eq!(may.total, dec!(1500.00));
    }

    #[test]
    fn manual_gratuity_paid_once() {
        let mut params = CalculationParameters::new(2025, dec!(3000.00));
        params.bonuses.gratuity_override = Some(ManualBonus {
            month: 9,
            amount: dec!(4000.00),
        });

        let result = engine().calculate(&params).unwrap();

        let paid: Vec<_> = result
            .months
            .iter()
            .filter(|m| m.gratuity.is_some())
            .map(|m| m.month)
            .collect();
        assert_eq!(paid, vec![9]);
        assert_eq!(result.summary.bonus_totals.gratuity, dec!(4000.00));
    }

    #[test]
    fn deduction_reduces_tax() {
        let mut params = salary_only(dec!(10000.00));
        params.deductible_expenses.rental = dec!(24000.00);

        let result = engine().calculate(&params).unwrap();

        // 82550 - 7200 = 75350 at 14%
        assert_eq!(result.summary.deductible_expenses.deduction, dec!(7200.00));
        assert_eq!(result.summary.net_taxable_income, dec!(75350.00));
        assert_eq!(result.summary.annual_tax, dec!(10549.00));
    }

    #[test]
    fn limited_contract_gate_uses_full_year() {
        let mut params = salary_only(dec!(5000.00));
        params.contract = ContractTerm::Limited { end_month: 6 };
        params.deductible_expenses.medical = dec!(1000.00);

        let result = engine().calculate(&params).unwrap();

        // Processed income 30000 is under the threshold, the full year 60000 is not
        assert!(result.summary.deductible_expenses.qualifies);
        assert_eq!(result.summary.annual_tax, dec!(0));
        assert_eq!(result.months.len(), 6);
        assert!(
            result
                .months
                .last()
                .unwrap()
                .observations
                .contains(&Observation::ContractEnd)
        );
    }

    #[test]
    fn negative_expenses_are_reported_but_calculation_proceeds() {
        let mut params = salary_only(dec!(10000.00));
        params.deductible_expenses.medical = dec!(-100.00);

        let result = engine().calculate(&params).unwrap();

        assert!(!result.expense_validation.is_valid);
        assert_eq!(result.months.len(), 12);
    }

    #[test]
    fn start_month_out_of_range_yields_empty_result() {
        let mut params = salary_only(dec!(10000.00));
        params.start_month = 13;

        let result = engine().calculate(&params).unwrap();

        assert!(result.months.is_empty());
        assert_eq!(result.summary.annual_withholding, dec!(0));
        assert_eq!(result.summary.annual_tax, dec!(0));
    }

    // =========================================================================
    // property sweeps
    // =========================================================================

    const INCOMES: [Decimal; 8] = [
        dec!(0),
        dec!(1025.00),
        dec!(2500.00),
        dec!(3120.75),
        dec!(6000.00),
        dec!(10000.00),
        dec!(25333.33),
        dec!(80000.00),
    ];

    fn parameter_grid() -> Vec<CalculationParameters> {
        let mut grid = Vec::new();
        for income in INCOMES {
            for start_month in [1, 4, 8, 12] {
                for with_bonuses in [false, true] {
                    let mut params = CalculationParameters::new(2025, income);
                    params.start_month = start_month;
                    if !with_bonuses {
                        params.bonuses = BonusOptions::none();
                    }
                    params.family.children_studying = with_bonuses;
                    params.sector.public_sector = with_bonuses;
                    params.deductible_expenses.rental = income * dec!(2);
                    params.additional_income = vec![AdditionalIncome {
                        month: 9,
                        amount: income / dec!(2),
                    }];
                    grid.push(params);
                }
            }
        }
        grid
    }

    #[test]
    fn threshold_invariant() {
        let engine = engine();
        let threshold = engine.registry().get(2025).unwrap().deduction_threshold();

        for params in parameter_grid() {
            let result = engine.calculate(&params).unwrap();
            let full_year: Decimal = result.months.iter().map(|m| m.total_income).sum();
            if full_year <= threshold {
                assert_eq!(result.summary.deductible_expenses.deduction, dec!(0));
                assert_eq!(result.summary.annual_tax, dec!(0));
            }
        }
    }

    #[test]
    fn cap_invariant() {
        let engine = engine();
        let cap = engine.registry().get(2025).unwrap().deductible_cap();

        for mut params in parameter_grid() {
            params.deductible_expenses.domestic_worker_contribution = dec!(50000);
            let result = engine.calculate(&params).unwrap();
            assert!(result.summary.deductible_expenses.deduction <= cap);
        }
    }

    #[test]
    fn conservation_without_extraordinary_income() {
        let engine = engine();

        for income in INCOMES {
            let result = engine.calculate(&salary_only(income)).unwrap();
            let diff = (ordinary_total(&result) - result.summary.annual_tax).abs();
            assert!(diff <= dec!(0.05), "income {income}: off by {diff}");
        }
    }

    #[test]
    fn withholding_is_never_negative() {
        let engine = engine();

        for params in parameter_grid() {
            let result = engine.calculate(&params).unwrap();
            for month in &result.months {
                assert!(month.ordinary_withholding >= dec!(0));
                assert!(month.extraordinary_withholding >= dec!(0));
            }
        }
    }

    #[test]
    fn calculation_is_idempotent() {
        let engine = engine();

        for params in parameter_grid() {
            assert_eq!(
                engine.calculate(&params).unwrap(),
                engine.calculate(&params).unwrap()
            );
        }
    }

    #[test]
    fn zero_income_withholds_nothing() {
        let mut params = CalculationParameters::new(2025, dec!(0));
        params.family.has_children = true;
        params.family.child_count = 2;
        params.sector.public_sector = true;

        let result = engine().calculate(&params).unwrap();

        assert_eq!(result.summary.annual_withholding, dec!(0));
        assert_eq!(result.summary.bonus_totals.total(), dec!(0));
        assert!(result.summary.bonus_detail.is_empty());
    }

    #[test]
    fn extreme_amounts_are_clamped_instead_of_overflowing() {
        let mut params = salary_only(Decimal::MAX);
        params.prior_withholding = Decimal::MAX;
        params.additional_income = vec![
            AdditionalIncome {
                month: 6,
                amount: Decimal::MAX,
            },
            AdditionalIncome {
                month: 6,
                amount: Decimal::MAX,
            },
        ];
        params.deductible_expenses.rental = Decimal::MAX;
        params.deductible_expenses.domestic_worker_contribution = Decimal::MAX;

        let result = engine().calculate(&params).unwrap();

        // 12 x 10^15 salary + one clamped 10^15 addition
        assert_eq!(result.summary.annual_income, dec!(13000000000000000.00));
        assert_eq!(result.months[5].extraordinary_income, dec!(1000000000000000.00));
        assert_eq!(result.summary.deductible_expenses.deduction, dec!(16050.00));
        assert!(result.summary.annual_tax > dec!(0));
    }

    #[test]
    fn extreme_negative_expenses_do_not_overflow() {
        let mut params = salary_only(dec!(10000.00));
        params.deductible_expenses.medical = Decimal::MIN;
        params.deductible_expenses.domestic_worker_contribution = Decimal::MIN;

        let result = engine().calculate(&params).unwrap();

        assert!(!result.expense_validation.is_valid);
        assert!(result.summary.annual_tax > dec!(0));
    }

    #[test]
    fn extraordinary_withholding_at_most_half() {
        let engine = engine();

        for params in parameter_grid() {
            let result = engine.calculate(&params).unwrap();
            for month in &result.months {
                assert!(month.extraordinary_withholding <= month.extraordinary_income / dec!(2));
            }
        }
    }
}
