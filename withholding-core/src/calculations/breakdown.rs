//! Month-by-month breakdown.
//!
//! The processed span is folded left to right. Each step re-projects the
//! annual income, recomputes the annual tax and emits one immutable
//! [`MonthlyRecord`] together with the accumulator for the next month. The
//! summary is a reduction over the finished records.

use rust_decimal::Decimal;
use tracing::debug;

use super::brackets::TaxBracketSchedule;
use super::common::round_half_up;
use super::extraordinary::extraordinary_withholding;
use super::ordinary::{OrdinaryDistributor, OrdinaryLedger, installment_for};
use super::projection::{MonthInputs, reproject};
use super::resolve::ResolvedParameters;
use crate::models::{
    BonusKind, BonusPayment, BonusTotals, CalculationSummary, DeductibleExpenseSummary,
    Installment, MonthlyRecord, Observation, TaxYearConfig,
};

/// State carried from one month to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accumulator {
    pub ledger: OrdinaryLedger,
    /// Total income of the months already processed.
    pub earned_to_date: Decimal,
    /// Prior withholding plus ordinary and extraordinary withholding so far.
    pub withheld_to_date: Decimal,
}

impl Accumulator {
    pub fn start(prior_withholding: Decimal) -> Self {
        Self {
            ledger: OrdinaryLedger::default(),
            earned_to_date: Decimal::ZERO,
            withheld_to_date: prior_withholding,
        }
    }
}

/// Builds the monthly records and the summary for one calculation.
#[derive(Debug, Clone)]
pub struct BreakdownBuilder<'a> {
    resolved: &'a ResolvedParameters,
    schedule: TaxBracketSchedule<'a>,
    distributor: OrdinaryDistributor,
    deduction: Decimal,
}

impl<'a> BreakdownBuilder<'a> {
    pub fn new(
        config: &'a TaxYearConfig,
        resolved: &'a ResolvedParameters,
        deduction: Decimal,
    ) -> Self {
        Self {
            resolved,
            schedule: TaxBracketSchedule::new(config, resolved.precision),
            distributor: OrdinaryDistributor::new(resolved.prior_withholding, resolved.precision),
            deduction,
        }
    }

    /// Folds over `inputs`, which must be the scheduled months of the
    /// processed span in order.
    pub fn build(
        &self,
        inputs: &[MonthInputs],
    ) -> Vec<MonthlyRecord> {
        inputs
            .iter()
            .enumerate()
            .scan(
                Accumulator::start(self.resolved.prior_withholding),
                |acc, (index, month)| {
                    let (record, next) = self.step(*acc, month, &inputs[index..]);
                    *acc = next;
                    Some(record)
                },
            )
            .collect()
    }

    /// Processes one month. `remaining` starts with `inputs` itself.
    pub fn step(
        &self,
        acc: Accumulator,
        inputs: &MonthInputs,
        remaining: &[MonthInputs],
    ) -> (MonthlyRecord, Accumulator) {
        let month = inputs.month;
        let precision = self.resolved.precision;

        let projected_annual_income = reproject(acc.earned_to_date, remaining);
        let projected_net_income = self
            .schedule
            .net_taxable_income(projected_annual_income, self.deduction);
        let projected_annual_tax = self.schedule.annual_tax(projected_net_income);
        let marginal_rate = self.schedule.marginal_rate(projected_net_income);

        let is_final = self.resolved.months.last() == Some(month);
        let installment = installment_for(month, is_final);
        let ordinary_withholding =
            self.distributor
                .withholding(projected_annual_tax, installment, &acc.ledger, month);

        let extraordinary_income = inputs.extraordinary_income();
        let extraordinary_withholding =
            extraordinary_withholding(extraordinary_income, marginal_rate, precision);

        let total_income = round_half_up(inputs.total_income(), precision);
        let total_withholding = ordinary_withholding + extraordinary_withholding;
        let cumulative_withholding = acc.withheld_to_date + total_withholding;

        let covered = projected_annual_tax > Decimal::ZERO
            && self.distributor.withheld_before(&acc.ledger, month) >= projected_annual_tax;

        let record = MonthlyRecord {
            month,
            base_income: inputs.base_income,
            additional_income: inputs.additional_income,
            gratuity: inputs.gratuity.clone(),
            severance: inputs.severance.clone(),
            family_allowance: inputs.family_allowance,
            public_sector_bonus: inputs.public.midyear,
            schooling_bonus: inputs.public.schooling,
            judicial_bonus: inputs.public.judicial,
            total_income,
            extraordinary_income,
            projected_annual_income,
            projected_net_income,
            projected_annual_tax,
            installment,
            ordinary_withholding,
            extraordinary_withholding,
            total_withholding,
            cumulative_withholding,
            observations: self.observations(inputs, installment, extraordinary_withholding, covered, is_final),
        };

        debug!(
            month,
            rule = %installment.describe(),
            projected_annual_income = %projected_annual_income,
            annual_tax = %projected_annual_tax,
            ordinary = %ordinary_withholding,
            extraordinary = %extraordinary_withholding,
            "processed month"
        );

        let next = Accumulator {
            ledger: acc.ledger.record(month, ordinary_withholding),
            earned_to_date: acc.earned_to_date + total_income,
            withheld_to_date: cumulative_withholding,
        };

        (record, next)
    }

    fn observations(
        &self,
        inputs: &MonthInputs,
        installment: Installment,
        extraordinary_withholding: Decimal,
        covered: bool,
        is_final: bool,
    ) -> Vec<Observation> {
        [
            (inputs.additional_income != Decimal::ZERO, Observation::AdditionalIncome),
            (inputs.gratuity.is_some(), Observation::Gratuity),
            (inputs.severance.is_some(), Observation::Severance),
            (inputs.family_allowance > Decimal::ZERO, Observation::FamilyAllowance),
            (inputs.public.midyear > Decimal::ZERO, Observation::PublicSectorBonus),
            (inputs.public.schooling > Decimal::ZERO, Observation::SchoolingBonus),
            (inputs.public.judicial > Decimal::ZERO, Observation::JudicialBonus),
            (
                extraordinary_withholding > Decimal::ZERO,
                Observation::ExtraordinaryWithholding,
            ),
            (covered, Observation::AnnualTaxCovered),
            (installment == Installment::TrueUp, Observation::TrueUp),
            (
                is_final && self.resolved.contract_limited,
                Observation::ContractEnd,
            ),
        ]
        .into_iter()
        .filter_map(|(applies, observation)| applies.then_some(observation))
        .collect()
    }

    /// Reduces finished records to the calculation summary.
    pub fn summarize(
        &self,
        records: &[MonthlyRecord],
        deductible_expenses: DeductibleExpenseSummary,
    ) -> CalculationSummary {
        let annual_income: Decimal = records.iter().map(|r| r.total_income).sum();
        let net_taxable_income = if records.is_empty() {
            Decimal::ZERO
        } else {
            self.schedule
                .net_taxable_income(annual_income, self.deduction)
        };
        let ordinary_withholding: Decimal = records.iter().map(|r| r.ordinary_withholding).sum();
        let extraordinary_withholding: Decimal =
            records.iter().map(|r| r.extraordinary_withholding).sum();
        let annual_withholding = ordinary_withholding + extraordinary_withholding;

        let months_processed = records.len() as u32;
        let average_monthly_withholding = if months_processed == 0 {
            Decimal::ZERO
        } else {
            round_half_up(
                annual_withholding / Decimal::from(months_processed),
                self.resolved.precision,
            )
        };

        CalculationSummary {
            months_processed,
            annual_income,
            net_taxable_income,
            annual_tax: self.schedule.annual_tax(net_taxable_income),
            marginal_rate: self.schedule.marginal_rate(net_taxable_income),
            ordinary_withholding,
            extraordinary_withholding,
            annual_withholding,
            average_monthly_withholding,
            deductible_expenses,
            bonus_totals: bonus_totals(records),
            bonus_detail: bonus_detail(records),
        }
    }
}

fn bonus_totals(records: &[MonthlyRecord]) -> BonusTotals {
    records
        .iter()
        .fold(BonusTotals::default(), |totals, record| BonusTotals {
            gratuity: totals.gratuity + record.gratuity_total(),
            severance: totals.severance + record.severance_total(),
            family_allowance: totals.family_allowance + record.family_allowance,
            public_sector_bonus: totals.public_sector_bonus + record.public_sector_bonus,
            schooling_bonus: totals.schooling_bonus + record.schooling_bonus,
            judicial_bonus: totals.judicial_bonus + record.judicial_bonus,
        })
}

fn bonus_detail(records: &[MonthlyRecord]) -> Vec<BonusPayment> {
    records
        .iter()
        .flat_map(|record| {
            let gratuity = record.gratuity.as_ref().map(|detail| BonusPayment {
                kind: BonusKind::Gratuity,
                month: record.month,
                source: detail.source,
                months_worked: detail.months_worked,
                base: detail.base,
                supplement: detail.surcharge,
                total: detail.total,
            });
            let severance = record.severance.as_ref().map(|detail| BonusPayment {
                kind: BonusKind::Severance,
                month: record.month,
                source: detail.source,
                months_worked: detail.months_worked,
                base: detail.base,
                supplement: detail.day_component,
                total: detail.total,
            });
            gratuity.into_iter().chain(severance)
        })
        .collect()
}
