mod calculation_result;
mod deductible_expenses;
mod insurance_scheme;
mod monthly_record;
mod parameters;
mod tax_bracket;
mod tax_year_config;

pub use calculation_result::{
    BonusKind, BonusPayment, BonusTotals, CalculationResult, CalculationSummary,
};
pub use deductible_expenses::{
    CategoryDeduction, DeductibleExpenseSummary, DeductibleExpenses, ExpenseCategory,
    ExpenseValidation,
};
pub use insurance_scheme::InsuranceScheme;
pub use monthly_record::{
    BonusSource, GratuityDetail, Installment, MonthlyRecord, Observation, SeveranceDetail,
};
pub use parameters::{
    AdditionalIncome, BonusOptions, CalculationParameters, ContractTerm, FamilyComposition,
    ManualBonus, SectorFlags,
};
pub use tax_bracket::TaxBracket;
pub use tax_year_config::{ExpenseRates, TaxYearConfig, TaxYearConfigError};
