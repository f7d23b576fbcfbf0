//! Resolution of caller parameters into the values the stages consume.
//!
//! Every default and every eligibility rule that depends only on the
//! parameters and the fiscal year is decided here, once, so the month loop
//! never has to re-check optional fields.

use std::ops::RangeInclusive;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::common::bounded_amount;
use crate::models::{CalculationParameters, ContractTerm, ManualBonus, TaxYearConfig};

/// Largest scale a `Decimal` can carry.
const MAX_PRECISION: u32 = 28;

const DECEMBER: u32 = 12;

/// Contiguous run of calendar months, possibly empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSpan {
    first: u32,
    last: u32,
}

impl MonthSpan {
    /// Span from `first` through `last`; empty when `first > last`.
    pub fn new(
        first: u32,
        last: u32,
    ) -> Self {
        if first > last {
            Self::empty()
        } else {
            Self { first, last }
        }
    }

    pub fn empty() -> Self {
        Self { first: 1, last: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.first > self.last
    }

    pub fn len(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.last - self.first + 1
        }
    }

    pub fn first(&self) -> Option<u32> {
        (!self.is_empty()).then_some(self.first)
    }

    pub fn last(&self) -> Option<u32> {
        (!self.is_empty()).then_some(self.last)
    }

    pub fn contains(
        &self,
        month: u32,
    ) -> bool {
        self.first <= month && month <= self.last
    }

    pub fn months(&self) -> RangeInclusive<u32> {
        self.first..=self.last
    }
}

/// How a gratuity or severance payment is scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BonusPolicy {
    /// Statutory months, statutory formula.
    Scheduled,
    /// A single caller-supplied amount in a caller-chosen month.
    Manual(ManualBonus),
    Off,
}

/// Judicial-worker bonus eligibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JudicialStatus {
    NotJudicial,
    Ineligible { reason: &'static str },
    Eligible { institution: String, amount: Decimal },
}

impl JudicialStatus {
    pub fn amount(&self) -> Decimal {
        match self {
            Self::Eligible { amount, .. } => *amount,
            _ => Decimal::ZERO,
        }
    }
}

/// Parameters with every default applied and every gate decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParameters {
    pub monthly_income: Decimal,

    /// Months processed by the breakdown (contract end honoured).
    pub months: MonthSpan,

    /// Start month through December, ignoring the contract end. Used for the
    /// deductible-expense qualification.
    pub full_year: MonthSpan,

    pub contract_limited: bool,
    pub prior_withholding: Decimal,
    pub precision: u32,
    pub employment_start_month: u32,

    /// Ad hoc additions by month, index 0 being January.
    pub additional_income: [Decimal; 12],

    pub surcharge_rate: Decimal,
    pub gratuity: BonusPolicy,
    pub severance: BonusPolicy,

    /// Monthly family allowance when payable.
    pub family_allowance: Option<Decimal>,

    /// July lump sum when payable.
    pub public_midyear_bonus: Option<Decimal>,

    /// Monthly schooling bonus when payable.
    pub schooling_bonus: Option<Decimal>,

    pub judicial: JudicialStatus,
}

impl ResolvedParameters {
    pub fn additional_income_for(
        &self,
        month: u32,
    ) -> Decimal {
        month
            .checked_sub(1)
            .and_then(|index| self.additional_income.get(index as usize))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

impl CalculationParameters {
    /// Applies defaults and eligibility rules against the year's
    /// configuration.
    ///
    /// Never fails: an out-of-range start month yields empty spans and a
    /// non-positive monthly income switches every bonus off. Amounts beyond
    /// [`AMOUNT_LIMIT`](super::common::AMOUNT_LIMIT) in magnitude are clamped
    /// to it.
    pub fn resolve(
        &self,
        config: &TaxYearConfig,
    ) -> ResolvedParameters {
        let monthly_income = bounded("monthly_income", self.monthly_income);
        let earns = monthly_income > Decimal::ZERO;
        if monthly_income < Decimal::ZERO {
            warn!(monthly_income = %monthly_income, "monthly income is negative; totals will be negative");
        }

        let (months, full_year) = self.month_spans();
        let employment_start_month = self.employment_start_month.max(1);

        let resolved = ResolvedParameters {
            monthly_income,
            months,
            full_year,
            contract_limited: matches!(self.contract, ContractTerm::Limited { .. }),
            prior_withholding: bounded("prior_withholding", self.prior_withholding),
            precision: self.precision.min(MAX_PRECISION),
            employment_start_month,
            additional_income: self.additions_by_month(full_year),
            surcharge_rate: config.surcharge_rate(self.insurance_scheme),
            gratuity: bonus_policy(
                earns,
                self.bonuses.auto_gratuity,
                self.bonuses.gratuity_override.as_ref(),
            ),
            severance: bonus_policy(
                earns,
                self.bonuses.auto_severance,
                self.bonuses.severance_override.as_ref(),
            ),
            family_allowance: self.family_allowance(earns, config),
            public_midyear_bonus: (earns
                && self.sector.public_sector
                && employment_start_month <= 7)
                .then_some(config.public_midyear_bonus),
            schooling_bonus: (earns && self.sector.schooling_bonus)
                .then_some(config.schooling_bonus),
            judicial: self.judicial_status(earns, config),
        };

        debug!(
            first_month = ?resolved.months.first(),
            last_month = ?resolved.months.last(),
            gratuity = ?resolved.gratuity,
            severance = ?resolved.severance,
            family_allowance = ?resolved.family_allowance,
            judicial = ?resolved.judicial,
            "resolved calculation parameters"
        );

        resolved
    }

    fn month_spans(&self) -> (MonthSpan, MonthSpan) {
        if !(1..=DECEMBER).contains(&self.start_month) {
            warn!(start_month = self.start_month, "start month out of range; no months processed");
            return (MonthSpan::empty(), MonthSpan::empty());
        }

        let full_year = MonthSpan::new(self.start_month, DECEMBER);
        let months = match self.contract {
            ContractTerm::Indefinite => full_year,
            ContractTerm::Limited { end_month } => {
                let span = MonthSpan::new(self.start_month, end_month.min(DECEMBER));
                if span.is_empty() {
                    warn!(
                        start_month = self.start_month,
                        end_month, "contract ends before the start month; no months processed"
                    );
                }
                span
            }
        };

        (months, full_year)
    }

    fn additions_by_month(
        &self,
        full_year: MonthSpan,
    ) -> [Decimal; 12] {
        let mut by_month = [Decimal::ZERO; 12];
        for addition in &self.additional_income {
            if !full_year.contains(addition.month) {
                warn!(
                    month = addition.month,
                    amount = %addition.amount,
                    "additional income outside the processed months is ignored"
                );
                continue;
            }
            let slot = &mut by_month[(addition.month - 1) as usize];
            *slot = slot.saturating_add(addition.amount);
        }
        by_month.map(|amount| bounded("additional_income", amount))
    }

    fn family_allowance(
        &self,
        earns: bool,
        config: &TaxYearConfig,
    ) -> Option<Decimal> {
        let family = &self.family;
        let eligible = (family.has_children && family.child_count > 0) || family.children_studying;
        if !earns || !eligible {
            return None;
        }

        match self.bonuses.family_allowance_override {
            Some(amount) if amount > Decimal::ZERO => {
                Some(bounded("family_allowance_override", amount))
            }
            _ if self.bonuses.auto_family_allowance => Some(config.family_allowance),
            _ => None,
        }
    }

    fn judicial_status(
        &self,
        earns: bool,
        config: &TaxYearConfig,
    ) -> JudicialStatus {
        let sector = &self.sector;
        if !sector.judicial_worker {
            return JudicialStatus::NotJudicial;
        }

        let institution = sector
            .judicial_institution
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());

        match institution {
            _ if !earns => JudicialStatus::Ineligible { reason: "no income" },
            None => JudicialStatus::Ineligible {
                reason: "no institution selected",
            },
            Some(_) if sector.directive_position => JudicialStatus::Ineligible {
                reason: "directive position",
            },
            Some(_) if self.monthly_income >= config.judicial_income_ceiling => {
                JudicialStatus::Ineligible {
                    reason: "income at or above ceiling",
                }
            }
            Some(name) => JudicialStatus::Eligible {
                institution: name.to_string(),
                amount: config.judicial_bonus,
            },
        }
    }
}

/// Clamps a caller amount into range, logging when it had to.
fn bounded(
    field: &'static str,
    amount: Decimal,
) -> Decimal {
    let clamped = bounded_amount(amount);
    if clamped != amount {
        warn!(field, amount = %amount, clamped = %clamped, "amount out of range; clamped");
    }
    clamped
}

fn bonus_policy(
    earns: bool,
    auto: bool,
    manual: Option<&ManualBonus>,
) -> BonusPolicy {
    if !earns {
        return BonusPolicy::Off;
    }

    match manual {
        Some(bonus) if bonus.amount > Decimal::ZERO && (1..=DECEMBER).contains(&bonus.month) => {
            BonusPolicy::Manual(ManualBonus {
                month: bonus.month,
                amount: bounded("bonus_override", bonus.amount),
            })
        }
        Some(bonus) => {
            warn!(month = bonus.month, amount = %bonus.amount, "manual bonus override ignored");
            if auto { BonusPolicy::Scheduled } else { BonusPolicy::Off }
        }
        None if auto => BonusPolicy::Scheduled,
        None => BonusPolicy::Off,
    }
}
