//! Progressive tax-bracket function.
//!
//! The net taxable income selects one bracket and that bracket's rate is
//! applied to the whole net income. The same rate answers the marginal-rate
//! query used for extraordinary withholding.

use rust_decimal::Decimal;
use tracing::debug;

use super::common::{non_negative, round_half_up};
use crate::models::{TaxBracket, TaxYearConfig};

/// Bracket lookups for one fiscal year.
#[derive(Debug, Clone)]
pub struct TaxBracketSchedule<'a> {
    config: &'a TaxYearConfig,
    precision: u32,
}

impl<'a> TaxBracketSchedule<'a> {
    pub fn new(
        config: &'a TaxYearConfig,
        precision: u32,
    ) -> Self {
        Self { config, precision }
    }

    /// `max(0, gross - threshold - deduction)`.
    pub fn net_taxable_income(
        &self,
        gross_income: Decimal,
        deduction: Decimal,
    ) -> Decimal {
        round_half_up(
            non_negative(
                (gross_income - self.config.deduction_threshold()).saturating_sub(deduction),
            ),
            self.precision,
        )
    }

    /// Bracket holding `net_income`, or `None` when there is nothing to tax.
    pub fn bracket_for(
        &self,
        net_income: Decimal,
    ) -> Option<&'a TaxBracket> {
        if net_income <= Decimal::ZERO {
            return None;
        }
        let tax_unit = self.config.tax_unit;
        self.config
            .brackets
            .iter()
            .find(|bracket| bracket.covers(net_income, tax_unit))
    }

    /// Annual tax on `net_income`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use withholding_core::calculations::TaxBracketSchedule;
    /// use withholding_core::config::builtin_tax_year;
    ///
    /// let config = builtin_tax_year(2025).unwrap();
    /// let schedule = TaxBracketSchedule::new(&config, 2);
    ///
    /// // 82,550 is above 5 units (26,750) and below 20 units: 14%
    /// assert_eq!(schedule.annual_tax(dec!(82550.00)), dec!(11557.00));
    /// ```
    pub fn annual_tax(
        &self,
        net_income: Decimal,
    ) -> Decimal {
        let tax = round_half_up(net_income * self.marginal_rate(net_income), self.precision);
        debug!(net_income = %net_income, tax = %tax, "computed annual tax");
        tax
    }

    /// Rate of the bracket holding `net_income`; zero when nothing is taxable.
    pub fn marginal_rate(
        &self,
        net_income: Decimal,
    ) -> Decimal {
        self.bracket_for(net_income)
            .map_or(Decimal::ZERO, |bracket| bracket.rate)
    }
}
