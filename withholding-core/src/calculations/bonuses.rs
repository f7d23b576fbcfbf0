//! Statutory bonus calculators.
//!
//! | Bonus              | Paid in            | Amount                                   |
//! |--------------------|--------------------|------------------------------------------|
//! | Gratuity           | July, December     | income x months worked / 6, plus surcharge |
//! | Severance payment  | May, November      | income / 12 x months worked, plus 30 days |
//! | Family allowance   | every month        | fixed per year                           |
//! | Public mid-year    | July               | fixed per year                           |
//! | Schooling          | every month        | fixed per year                           |
//! | Judicial           | January            | fixed per year                           |
//!
//! Months worked count from the employment-start month, inclusive. Nothing
//! is paid for a month before employment started.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use withholding_core::calculations::bonuses::{gratuity, severance};
//!
//! let july = gratuity(dec!(2500.00), 7, dec!(0.09), 2);
//! assert_eq!(july.base, dec!(2916.67));
//! assert_eq!(july.surcharge, dec!(262.50));
//! assert_eq!(july.total, dec!(3179.17));
//!
//! let may = severance(dec!(3000.00), 5, 2);
//! assert_eq!(may.total, dec!(1500.00));
//! ```

use rust_decimal::Decimal;

use super::common::round_half_up;
use super::resolve::{BonusPolicy, ResolvedParameters};
use crate::models::{BonusSource, GratuityDetail, SeveranceDetail};

pub const GRATUITY_MONTHS: [u32; 2] = [7, 12];
pub const SEVERANCE_MONTHS: [u32; 2] = [5, 11];
pub const PUBLIC_MIDYEAR_BONUS_MONTH: u32 = 7;
pub const JUDICIAL_BONUS_MONTH: u32 = 1;

/// Months worked through `month`, or `None` before employment started.
pub fn months_worked(
    month: u32,
    employment_start_month: u32,
) -> Option<u32> {
    if month < employment_start_month {
        return None;
    }
    Some((month - employment_start_month + 1).max(1))
}

/// Computes a gratuity payment.
///
/// base = income x months worked / 6, surcharge = base x `surcharge_rate`.
pub fn gratuity(
    monthly_income: Decimal,
    months_worked: u32,
    surcharge_rate: Decimal,
    precision: u32,
) -> GratuityDetail {
    let base = round_half_up(
        monthly_income * Decimal::from(months_worked) / Decimal::from(6),
        precision,
    );
    let surcharge = round_half_up(base * surcharge_rate, precision);

    GratuityDetail {
        source: BonusSource::Computed,
        months_worked: Some(months_worked),
        base,
        surcharge,
        total: base + surcharge,
    }
}

/// Computes a severance-style payment.
///
/// base = income / 12 x months worked, day component = income / 360 x 30.
pub fn severance(
    monthly_income: Decimal,
    months_worked: u32,
    precision: u32,
) -> SeveranceDetail {
    let base = round_half_up(
        monthly_income * Decimal::from(months_worked) / Decimal::from(12),
        precision,
    );
    let day_component = round_half_up(
        monthly_income * Decimal::from(30) / Decimal::from(360),
        precision,
    );

    SeveranceDetail {
        source: BonusSource::Computed,
        months_worked: Some(months_worked),
        base,
        day_component,
        total: base + day_component,
    }
}

/// Gratuity due in `month` under the resolved policy.
pub fn gratuity_for(
    resolved: &ResolvedParameters,
    month: u32,
) -> Option<GratuityDetail> {
    let worked = months_worked(month, resolved.employment_start_month)?;

    match &resolved.gratuity {
        BonusPolicy::Scheduled if GRATUITY_MONTHS.contains(&month) => Some(gratuity(
            resolved.monthly_income,
            worked,
            resolved.surcharge_rate,
            resolved.precision,
        )),
        BonusPolicy::Manual(bonus) if bonus.month == month => {
            let amount = round_half_up(bonus.amount, resolved.precision);
            Some(GratuityDetail {
                source: BonusSource::Manual,
                months_worked: None,
                base: amount,
                surcharge: Decimal::ZERO,
                total: amount,
            })
        }
        _ => None,
    }
}

/// Severance payment due in `month` under the resolved policy.
pub fn severance_for(
    resolved: &ResolvedParameters,
    month: u32,
) -> Option<SeveranceDetail> {
    let worked = months_worked(month, resolved.employment_start_month)?;

    match &resolved.severance {
        BonusPolicy::Scheduled if SEVERANCE_MONTHS.contains(&month) => Some(severance(
            resolved.monthly_income,
            worked,
            resolved.precision,
        )),
        BonusPolicy::Manual(bonus) if bonus.month == month => {
            let amount = round_half_up(bonus.amount, resolved.precision);
            Some(SeveranceDetail {
                source: BonusSource::Manual,
                months_worked: None,
                base: amount,
                day_component: Decimal::ZERO,
                total: amount,
            })
        }
        _ => None,
    }
}

/// Family allowance due in `month`; the same amount every month.
pub fn family_allowance_for(resolved: &ResolvedParameters) -> Decimal {
    resolved
        .family_allowance
        .map_or(Decimal::ZERO, |amount| round_half_up(amount, resolved.precision))
}

/// Public-sector bonuses due in a single month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublicSectorBonuses {
    pub midyear: Decimal,
    pub schooling: Decimal,
    pub judicial: Decimal,
}

impl PublicSectorBonuses {
    pub fn for_month(
        resolved: &ResolvedParameters,
        month: u32,
    ) -> Self {
        let midyear = match resolved.public_midyear_bonus {
            Some(amount) if month == PUBLIC_MIDYEAR_BONUS_MONTH => amount,
            _ => Decimal::ZERO,
        };
        let judicial = if month == JUDICIAL_BONUS_MONTH {
            resolved.judicial.amount()
        } else {
            Decimal::ZERO
        };

        Self {
            midyear: round_half_up(midyear, resolved.precision),
            schooling: round_half_up(
                resolved.schooling_bonus.unwrap_or(Decimal::ZERO),
                resolved.precision,
            ),
            judicial: round_half_up(judicial, resolved.precision),
        }
    }

    pub fn total(&self) -> Decimal {
        self.midyear + self.schooling + self.judicial
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::config::builtin_tax_year;
    use crate::models::{CalculationParameters, InsuranceScheme, ManualBonus};

    fn resolved(params: &CalculationParameters) -> ResolvedParameters {
        params.resolve(&builtin_tax_year(2025).unwrap())
    }

    // =========================================================================
    // months_worked tests
    // =========================================================================

    #[test]
    fn months_worked_counts_start_month_inclusive() {
        assert_eq!(months_worked(7, 1), Some(7));
        assert_eq!(months_worked(7, 7), Some(1));
        assert_eq!(months_worked(12, 3), Some(10));
    }

    #[test]
    fn months_worked_is_none_before_employment() {
        assert_eq!(months_worked(4, 5), None);
    }

    // =========================================================================
    // gratuity tests
    // =========================================================================

    #[test]
    fn gratuity_july_government_scheme() {
        let detail = gratuity(dec!(2500.00), 7, dec!(0.09), 2);

        assert_eq!(detail.base, dec!(2916.67));
        assert_eq!(detail.surcharge, dec!(262.50));
        assert_eq!(detail.total, dec!(3179.17));
    }

    #[test]
    fn gratuity_december_government_scheme() {
        let detail = gratuity(dec!(2500.00), 12, dec!(0.09), 2);

        assert_eq!(detail.base, dec!(5000.00));
        assert_eq!(detail.surcharge, dec!(450.00));
        assert_eq!(detail.total, dec!(5450.00));
    }

    #[test]
    fn gratuity_private_scheme_uses_lower_surcharge() {
        let mut params = CalculationParameters::new(2025, dec!(2500.00));
        params.insurance_scheme = InsuranceScheme::Private;

        let detail = gratuity_for(&resolved(&params), 12).unwrap();

        // Surcharge: 5000 * 0.0675 = 337.50
        assert_eq!(detail.surcharge, dec!(337.50));
        assert_eq!(detail.total, dec!(5337.50));
    }

    #[test]
    fn gratuity_only_paid_in_july_and_december() {
        let params = CalculationParameters::new(2025, dec!(2500.00));
        let resolved = resolved(&params);

        let paid: Vec<u32> = (1..=12)
            .filter(|month| gratuity_for(&resolved, *month).is_some())
            .collect();

        assert_eq!(paid, vec![7, 12]);
    }

    #[test]
    fn gratuity_not_paid_before_employment_start() {
        let mut params = CalculationParameters::new(2025, dec!(2500.00));
        params.employment_start_month = 9;
        let resolved = resolved(&params);

        assert_eq!(gratuity_for(&resolved, 7), None);
        // December: 4 months worked -> 2500 * 4 / 6 = 1666.67
        assert_eq!(gratuity_for(&resolved, 12).unwrap().base, dec!(1666.67));
    }

    #[test]
    fn manual_gratuity_paid_once_in_chosen_month() {
        let mut params = CalculationParameters::new(2025, dec!(2500.00));
        params.bonuses.gratuity_override = Some(ManualBonus {
            month: 8,
            amount: dec!(2000.00),
        });
        let resolved = resolved(&params);

        assert_eq!(gratuity_for(&resolved, 7), None);
        assert_eq!(gratuity_for(&resolved, 12), None);

        let detail = gratuity_for(&resolved, 8).unwrap();
        assert_eq!(detail.source, BonusSource::Manual);
        assert_eq!(detail.total, dec!(2000.00));
        assert_eq!(detail.months_worked, None);
    }

    #[test]
    fn gratuity_disabled_without_override() {
        let mut params = CalculationParameters::new(2025, dec!(2500.00));
        params.bonuses.auto_gratuity = false;

        assert_eq!(gratuity_for(&resolved(&params), 7), None);
    }

    // =========================================================================
    // severance tests
    // =========================================================================

    #[test]
    fn severance_may_example() {
        let detail = severance(dec!(3000.00), 5, 2);

        assert_eq!(detail.base, dec!(1250.00));
        assert_eq!(detail.day_component, dec!(250.00));
        assert_eq!(detail.total, dec!(1500.00));
    }

    #[test]
    fn severance_rounds_each_component() {
        let detail = severance(dec!(2500.00), 5, 2);

        // Base: 2500 * 5 / 12 = 1041.666... -> 1041.67
        assert_eq!(detail.base, dec!(1041.67));
        // Day component: 2500 * 30 / 360 = 208.333... -> 208.33
        assert_eq!(detail.day_component, dec!(208.33));
        assert_eq!(detail.total, dec!(1250.00));
    }

    #[test]
    fn severance_only_paid_in_may_and_november() {
        let params = CalculationParameters::new(2025, dec!(3000.00));
        let resolved = resolved(&params);

        let paid: Vec<u32> = (1..=12)
            .filter(|month| severance_for(&resolved, *month).is_some())
            .collect();

        assert_eq!(paid, vec![5, 11]);
    }

    // =========================================================================
    // family allowance / public sector tests
    // =========================================================================

    #[test]
    fn family_allowance_is_flat_regardless_of_child_count() {
        let mut params = CalculationParameters::new(2025, dec!(3000.00));
        params.family.has_children = true;
        params.family.child_count = 4;

        assert_eq!(family_allowance_for(&resolved(&params)), dec!(113.00));
    }

    #[test]
    fn public_bonuses_follow_their_months() {
        let mut params = CalculationParameters::new(2025, dec!(1500.00));
        params.sector.public_sector = true;
        params.sector.schooling_bonus = true;
        params.sector.judicial_worker = true;
        params.sector.judicial_institution = Some("Labour Court".to_string());
        let resolved = resolved(&params);

        let january = PublicSectorBonuses::for_month(&resolved, 1);
        let july = PublicSectorBonuses::for_month(&resolved, 7);
        let october = PublicSectorBonuses::for_month(&resolved, 10);

        assert_eq!(
            january,
            PublicSectorBonuses {
                midyear: dec!(0),
                schooling: dec!(400),
                judicial: dec!(1000),
            }
        );
        assert_eq!(july.total(), dec!(700));
        assert_eq!(october.total(), dec!(400));
    }
}
