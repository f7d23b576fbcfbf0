use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a bonus amount came from the statutory formula or a caller override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusSource {
    Computed,
    Manual,
}

/// Breakdown of a gratuity payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GratuityDetail {
    pub source: BonusSource,
    /// Months counted toward the payment; `None` for manual overrides.
    pub months_worked: Option<u32>,
    pub base: Decimal,
    /// Insurance-scheme surcharge on top of the base.
    pub surcharge: Decimal,
    pub total: Decimal,
}

/// Breakdown of a severance-style payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveranceDetail {
    pub source: BonusSource,
    /// Months counted toward the payment; `None` for manual overrides.
    pub months_worked: Option<u32>,
    pub base: Decimal,
    /// Thirty days of salary at the daily rate.
    pub day_component: Decimal,
    pub total: Decimal,
}

/// Divisor rule that produced a month's ordinary withholding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Installment {
    /// Annual tax divided by twelve (January to March).
    Twelfth,
    /// Tax not yet withheld through `cutoff`, divided by `divisor`.
    Remaining { divisor: u32, cutoff: u32 },
    /// Everything still owed; closes the year.
    TrueUp,
}

impl Installment {
    pub fn describe(&self) -> String {
        match self {
            Self::Twelfth => "annual / 12".to_string(),
            Self::Remaining { divisor, cutoff } => {
                format!("(annual - withheld through {cutoff}) / {divisor}")
            }
            Self::TrueUp => "annual - withheld".to_string(),
        }
    }
}

/// Tag attached to a month to explain what happened in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Observation {
    AdditionalIncome,
    Gratuity,
    Severance,
    FamilyAllowance,
    PublicSectorBonus,
    SchoolingBonus,
    JudicialBonus,
    ExtraordinaryWithholding,
    /// Ordinary withholding already covers the annual tax.
    AnnualTaxCovered,
    TrueUp,
    ContractEnd,
}

impl Observation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdditionalIncome => "additional-income",
            Self::Gratuity => "gratuity",
            Self::Severance => "severance",
            Self::FamilyAllowance => "family-allowance",
            Self::PublicSectorBonus => "public-bonus",
            Self::SchoolingBonus => "schooling-bonus",
            Self::JudicialBonus => "judicial-bonus",
            Self::ExtraordinaryWithholding => "extraordinary",
            Self::AnnualTaxCovered => "tax-covered",
            Self::TrueUp => "true-up",
            Self::ContractEnd => "contract-end",
        }
    }
}

/// One processed month of the breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    pub month: u32,

    pub base_income: Decimal,
    pub additional_income: Decimal,
    pub gratuity: Option<GratuityDetail>,
    pub severance: Option<SeveranceDetail>,
    pub family_allowance: Decimal,
    pub public_sector_bonus: Decimal,
    pub schooling_bonus: Decimal,
    pub judicial_bonus: Decimal,

    /// Everything paid this month.
    pub total_income: Decimal,

    /// Part of `total_income` that is withheld at the marginal rate.
    pub extraordinary_income: Decimal,

    /// Income earned in earlier processed months plus the scheduled income
    /// of this and the remaining months.
    pub projected_annual_income: Decimal,
    pub projected_net_income: Decimal,
    pub projected_annual_tax: Decimal,

    pub installment: Installment,
    pub ordinary_withholding: Decimal,
    pub extraordinary_withholding: Decimal,
    pub total_withholding: Decimal,

    /// Prior withholding plus every amount withheld through this month.
    pub cumulative_withholding: Decimal,

    pub observations: Vec<Observation>,
}

impl MonthlyRecord {
    pub fn gratuity_total(&self) -> Decimal {
        self.gratuity
            .as_ref()
            .map_or(Decimal::ZERO, |detail| detail.total)
    }

    pub fn severance_total(&self) -> Decimal {
        self.severance
            .as_ref()
            .map_or(Decimal::ZERO, |detail| detail.total)
    }
}
