//! Annual gross income projection.
//!
//! Income is scheduled month by month (base salary, ad hoc additions and
//! every bonus due that month) and the projection is the sum over the
//! projected span:
//!
//! ```text
//! gross = base x months + additions + gratuities + severance payments
//!       + family allowance x months + public-sector bonuses
//! ```
//!
//! Re-projection from a later month adds the income already earned in
//! earlier processed months to the scheduled income still to come.

use rust_decimal::Decimal;
use tracing::debug;

use super::bonuses::{
    PublicSectorBonuses, family_allowance_for, gratuity_for, severance_for,
};
use super::common::round_half_up;
use super::resolve::{MonthSpan, ResolvedParameters};
use crate::models::{GratuityDetail, SeveranceDetail};

/// Income scheduled for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthInputs {
    pub month: u32,
    pub base_income: Decimal,
    pub additional_income: Decimal,
    pub gratuity: Option<GratuityDetail>,
    pub severance: Option<SeveranceDetail>,
    pub family_allowance: Decimal,
    pub public: PublicSectorBonuses,
}

impl MonthInputs {
    pub fn schedule(
        resolved: &ResolvedParameters,
        month: u32,
    ) -> Self {
        Self {
            month,
            base_income: round_half_up(resolved.monthly_income, resolved.precision),
            additional_income: round_half_up(
                resolved.additional_income_for(month),
                resolved.precision,
            ),
            gratuity: gratuity_for(resolved, month),
            severance: severance_for(resolved, month),
            family_allowance: family_allowance_for(resolved),
            public: PublicSectorBonuses::for_month(resolved, month),
        }
    }

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

    /// Everything paid in the month.
    pub fn total_income(&self) -> Decimal {
        self.base_income + self.extraordinary_income()
    }

    /// Everything beyond the base salary: ad hoc additions and every bonus
    /// paid in the month.
    pub fn extraordinary_income(&self) -> Decimal {
        self.additional_income
            + self.gratuity_total()
            + self.severance_total()
            + self.family_allowance
            + self.public.total()
    }
}

/// Schedules every month of `span`, in order.
pub fn schedule_span(
    resolved: &ResolvedParameters,
    span: MonthSpan,
) -> Vec<MonthInputs> {
    if span.is_empty() {
        return Vec::new();
    }
    span.months()
        .map(|month| MonthInputs::schedule(resolved, month))
        .collect()
}

/// Components of a projected annual gross income.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomeProjection {
    pub months: u32,
    pub base_income: Decimal,
    pub additional_income: Decimal,
    pub gratuity: Decimal,
    pub severance: Decimal,
    pub family_allowance: Decimal,
    pub public_sector_bonuses: Decimal,
}

impl IncomeProjection {
    pub fn from_months(inputs: &[MonthInputs]) -> Self {
        let projection = inputs
            .iter()
            .fold(Self::default(), |acc, month| Self {
                months: acc.months + 1,
                base_income: acc.base_income + month.base_income,
                additional_income: acc.additional_income + month.additional_income,
                gratuity: acc.gratuity + month.gratuity_total(),
                severance: acc.severance + month.severance_total(),
                family_allowance: acc.family_allowance + month.family_allowance,
                public_sector_bonuses: acc.public_sector_bonuses + month.public.total(),
            });

        debug!(
            months = projection.months,
            gross_income = %projection.gross_income(),
            gratuity = %projection.gratuity,
            severance = %projection.severance,
            "projected annual income"
        );

        projection
    }

    pub fn gross_income(&self) -> Decimal {
        self.base_income
            + self.additional_income
            + self.gratuity
            + self.severance
            + self.family_allowance
            + self.public_sector_bonuses
    }
}

/// Income already earned plus everything scheduled from the current month on.
pub fn reproject(
    earned_to_date: Decimal,
    remaining: &[MonthInputs],
) -> Decimal {
    earned_to_date
        + remaining
            .iter()
            .map(MonthInputs::total_income)
            .sum::<Decimal>()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::config::builtin_tax_year;
    use crate::models::{AdditionalIncome, BonusOptions, CalculationParameters};

    fn resolved(params: &CalculationParameters) -> ResolvedParameters {
        params.resolve(&builtin_tax_year(2025).unwrap())
    }

    #[test]
    fn base_salary_only_projects_twelve_months() {
        let mut params = CalculationParameters::new(2025, dec!(10000.00));
        params.bonuses = BonusOptions::none();
        let resolved = resolved(&params);

        let projection = IncomeProjection::from_months(&schedule_span(&resolved, resolved.months));

        assert_eq!(projection.months, 12);
        assert_eq!(projection.gross_income(), dec!(120000.00));
    }

    #[test]
    fn projection_includes_statutory_bonuses() {
        let params = CalculationParameters::new(2025, dec!(3000.00));
        let resolved = resolved(&params);

        let projection = IncomeProjection::from_months(&schedule_span(&resolved, resolved.months));

        // Gratuity: July 3500 + 315, December 6000 + 540
        assert_eq!(projection.gratuity, dec!(10355.00));
        // Severance: May 1250 + 250, November 2750 + 250
        assert_eq!(projection.severance, dec!(4500.00));
        assert_eq!(projection.gross_income(), dec!(50855.00));
    }

    #[test]
    fn projection_counts_only_remaining_months() {
        let mut params = CalculationParameters::new(2025, dec!(4000.00));
        params.bonuses = BonusOptions::none();
        params.start_month = 4;
        params.additional_income = vec![AdditionalIncome {
            month: 6,
            amount: dec!(1500.00),
        }];
        let resolved = resolved(&params);

        let projection = IncomeProjection::from_months(&schedule_span(&resolved, resolved.months));

        assert_eq!(projection.months, 9);
        assert_eq!(projection.base_income, dec!(36000.00));
        assert_eq!(projection.gross_income(), dec!(37500.00));
    }

    #[test]
    fn family_allowance_scales_with_months() {
        let mut params = CalculationParameters::new(2025, dec!(2000.00));
        params.bonuses.auto_gratuity = false;
        params.bonuses.auto_severance = false;
        params.family.children_studying = true;
        params.start_month = 7;
        let resolved = resolved(&params);

        let projection = IncomeProjection::from_months(&schedule_span(&resolved, resolved.months));

        assert_eq!(projection.family_allowance, dec!(678.00));
    }

    #[test]
    fn negative_income_propagates() {
        let mut params = CalculationParameters::new(2025, dec!(-100.00));
        params.bonuses = BonusOptions::none();
        let resolved = resolved(&params);

        let projection = IncomeProjection::from_months(&schedule_span(&resolved, resolved.months));

        assert_eq!(projection.gross_income(), dec!(-1200.00));
    }

    #[test]
    fn extraordinary_income_is_everything_but_salary() {
        let mut params = CalculationParameters::new(2025, dec!(3000.00));
        params.family.children_studying = true;
        params.additional_income = vec![AdditionalIncome {
            month: 7,
            amount: dec!(200.00),
        }];
        let july = MonthInputs::schedule(&resolved(&params), 7);

        // 200 addition + gratuity (3500 + 315) + 113 family allowance
        assert_eq!(july.extraordinary_income(), dec!(4128.00));
        assert_eq!(july.total_income(), dec!(7128.00));
    }

    #[test]
    fn reprojection_matches_projection_at_every_month() {
        let params = CalculationParameters::new(2025, dec!(3000.00));
        let resolved = resolved(&params);
        let inputs = schedule_span(&resolved, resolved.months);
        let gross = IncomeProjection::from_months(&inputs).gross_income();

        let mut earned = dec!(0);
        for (index, month) in inputs.iter().enumerate() {
            assert_eq!(reproject(earned, &inputs[index..]), gross);
            earned += month.total_income();
        }
    }

    #[test]
    fn empty_span_projects_nothing() {
        let mut params = CalculationParameters::new(2025, dec!(3000.00));
        params.start_month = 14;
        let resolved = resolved(&params);

        assert!(schedule_span(&resolved, resolved.months).is_empty());
        assert_eq!(IncomeProjection::from_months(&[]).gross_income(), dec!(0));
    }
}
