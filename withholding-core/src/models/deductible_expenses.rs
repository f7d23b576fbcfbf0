use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Categories of personal expenses that qualify for the deductible credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    DiningLodging,
    Medical,
    ProfessionalServices,
    Rental,
    DomesticWorkerContribution,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 5] = [
        Self::DiningLodging,
        Self::Medical,
        Self::ProfessionalServices,
        Self::Rental,
        Self::DomesticWorkerContribution,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DiningLodging => "dining_lodging",
            Self::Medical => "medical",
            Self::ProfessionalServices => "professional_services",
            Self::Rental => "rental",
            Self::DomesticWorkerContribution => "domestic_worker_contribution",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::DiningLodging => "Dining and lodging",
            Self::Medical => "Medical services",
            Self::ProfessionalServices => "Professional services",
            Self::Rental => "Rental",
            Self::DomesticWorkerContribution => "Domestic worker contribution",
        }
    }
}

/// Expense amounts reported by the worker for the fiscal year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeductibleExpenses {
    pub dining_lodging: Decimal,
    pub medical: Decimal,
    pub professional_services: Decimal,
    pub rental: Decimal,
    pub domestic_worker_contribution: Decimal,
}

impl DeductibleExpenses {
    pub fn amount(
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

    pub fn total(&self) -> Decimal {
        ExpenseCategory::ALL
            .iter()
            .fold(Decimal::ZERO, |sum, category| {
                sum.saturating_add(self.amount(*category))
            })
    }
}

/// Deduction derived from a single expense category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDeduction {
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub percentage: Decimal,
    pub deduction: Decimal,
}

/// Outcome of the deductible-expense evaluation for one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductibleExpenseSummary {
    pub categories: Vec<CategoryDeduction>,

    /// Sum of the reported amounts.
    pub total_expenses: Decimal,

    /// Sum of the category deductions before the cap.
    pub uncapped_deduction: Decimal,

    /// Deduction actually subtracted from taxable income.
    pub deduction: Decimal,

    pub cap: Decimal,

    /// Room left under the cap.
    pub headroom: Decimal,

    /// Whether the full-year projection cleared the qualification threshold.
    pub qualifies: bool,
}

/// Result of checking reported expenses before a calculation.
///
/// Errors mark the input as invalid; warnings are advisory. Neither stops a
/// calculation from running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}
