use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    BonusSource, CalculationParameters, DeductibleExpenseSummary, ExpenseValidation,
    MonthlyRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    Gratuity,
    Severance,
}

/// One gratuity or severance payment, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusPayment {
    pub kind: BonusKind,
    pub month: u32,
    pub source: BonusSource,
    pub months_worked: Option<u32>,
    pub base: Decimal,
    /// Insurance surcharge for gratuities, day component for severance.
    pub supplement: Decimal,
    pub total: Decimal,
}

/// Bonus amounts summed over the processed months.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusTotals {
    pub gratuity: Decimal,
    pub severance: Decimal,
    pub family_allowance: Decimal,
    pub public_sector_bonus: Decimal,
    pub schooling_bonus: Decimal,
    pub judicial_bonus: Decimal,
}

impl BonusTotals {
    pub fn total(&self) -> Decimal {
        self.gratuity
            + self.severance
            + self.family_allowance
            + self.public_sector_bonus
            + self.schooling_bonus
            + self.judicial_bonus
    }
}

/// Aggregate figures reduced from the monthly records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationSummary {
    pub months_processed: u32,
    pub annual_income: Decimal,
    pub net_taxable_income: Decimal,
    pub annual_tax: Decimal,
    pub marginal_rate: Decimal,
    pub ordinary_withholding: Decimal,
    pub extraordinary_withholding: Decimal,
    pub annual_withholding: Decimal,
    pub average_monthly_withholding: Decimal,
    pub deductible_expenses: DeductibleExpenseSummary,
    pub bonus_totals: BonusTotals,
    pub bonus_detail: Vec<BonusPayment>,
}

/// Complete, immutable output of one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub parameters: CalculationParameters,
    pub months: Vec<MonthlyRecord>,
    pub summary: CalculationSummary,
    pub expense_validation: ExpenseValidation,
}

impl CalculationResult {
    pub fn month(
        &self,
        month: u32,
    ) -> Option<&MonthlyRecord> {
        self.months.iter().find(|record| record.month == month)
    }
}
