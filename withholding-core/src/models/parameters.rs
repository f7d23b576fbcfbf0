use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DeductibleExpenses, InsuranceScheme};

fn first_month() -> u32 {
    1
}

fn default_precision() -> u32 {
    2
}

/// An ad hoc payment on top of the base salary in a given month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalIncome {
    pub month: u32,
    pub amount: Decimal,
}

/// Caller-supplied bonus amount paid once in a chosen month, replacing the
/// computed schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualBonus {
    pub month: u32,
    pub amount: Decimal,
}

/// Which statutory bonuses are computed automatically, and any overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusOptions {
    pub auto_gratuity: bool,
    pub auto_severance: bool,
    pub auto_family_allowance: bool,
    pub gratuity_override: Option<ManualBonus>,
    pub severance_override: Option<ManualBonus>,
    pub family_allowance_override: Option<Decimal>,
}

impl Default for BonusOptions {
    fn default() -> Self {
        Self {
            auto_gratuity: true,
            auto_severance: true,
            auto_family_allowance: true,
            gratuity_override: None,
            severance_override: None,
            family_allowance_override: None,
        }
    }
}

impl BonusOptions {
    /// No statutory bonus is paid at all.
    pub fn none() -> Self {
        Self {
            auto_gratuity: false,
            auto_severance: false,
            auto_family_allowance: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyComposition {
    pub has_children: bool,
    pub child_count: u32,
    pub children_studying: bool,
}

/// Duration of the employment contract within the fiscal year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContractTerm {
    #[default]
    Indefinite,
    /// The contract ends after `end_month`; later months are not processed.
    Limited { end_month: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorFlags {
    pub public_sector: bool,
    pub schooling_bonus: bool,
    pub judicial_worker: bool,
    pub judicial_institution: Option<String>,
    pub directive_position: bool,
}

/// Everything a calculation needs from the caller.
///
/// Only `fiscal_year` and `monthly_income` are required when deserializing;
/// every other field falls back to its documented default. Defaults are
/// resolved once, by [`CalculationParameters::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationParameters {
    pub fiscal_year: i32,

    /// Base salary paid every month.
    pub monthly_income: Decimal,

    #[serde(default)]
    pub additional_income: Vec<AdditionalIncome>,

    /// First month to process, 1-based. Defaults to January.
    #[serde(default = "first_month")]
    pub start_month: u32,

    /// Withholding already paid before `start_month`.
    #[serde(default)]
    pub prior_withholding: Decimal,

    /// Decimal places used at every rounding step. Defaults to 2.
    #[serde(default = "default_precision")]
    pub precision: u32,

    #[serde(default)]
    pub deductible_expenses: DeductibleExpenses,

    #[serde(default)]
    pub bonuses: BonusOptions,

    #[serde(default)]
    pub insurance_scheme: InsuranceScheme,

    /// Month the worker joined; bonuses accrue from here. Defaults to January.
    #[serde(default = "first_month")]
    pub employment_start_month: u32,

    #[serde(default)]
    pub family: FamilyComposition,

    #[serde(default)]
    pub contract: ContractTerm,

    #[serde(default)]
    pub sector: SectorFlags,
}

impl CalculationParameters {
    /// Parameters for a full-year, indefinite contract starting in January
    /// with default bonus settings.
    pub fn new(
        fiscal_year: i32,
        monthly_income: Decimal,
    ) -> Self {
        Self {
            fiscal_year,
            monthly_income,
            additional_income: Vec::new(),
            start_month: first_month(),
            prior_withholding: Decimal::ZERO,
            precision: default_precision(),
            deductible_expenses: DeductibleExpenses::default(),
            bonuses: BonusOptions::default(),
            insurance_scheme: InsuranceScheme::default(),
            employment_start_month: first_month(),
            family: FamilyComposition::default(),
            contract: ContractTerm::default(),
            sector: SectorFlags::default(),
        }
    }
}
