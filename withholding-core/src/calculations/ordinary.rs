//! Ordinary monthly withholding.
//!
//! The annual tax is spread over the year with a fixed divisor schedule:
//!
//! | Month(s) | Installment                                  |
//! |----------|----------------------------------------------|
//! | 1-3      | annual tax / 12                              |
//! | 4        | (annual tax - withheld through month 3) / 9  |
//! | 5-7      | (annual tax - withheld through month 4) / 8  |
//! | 8        | (annual tax - withheld through month 7) / 5  |
//! | 9-11     | (annual tax - withheld through month 8) / 4  |
//! | 12       | annual tax - withheld through month 11       |
//!
//! "Withheld" always includes the withholding paid before the calculation
//! started. The last processed month closes the year whatever its number,
//! and no installment ever takes the running total past the annual tax.

use rust_decimal::Decimal;

use super::common::{non_negative, round_half_up};
use crate::models::Installment;

/// Divisor rule for `month`. `is_final` marks the last processed month.
pub fn installment_for(
    month: u32,
    is_final: bool,
) -> Installment {
    if is_final {
        return Installment::TrueUp;
    }
    match month {
        1..=3 => Installment::Twelfth,
        4 => Installment::Remaining { divisor: 9, cutoff: 3 },
        5..=7 => Installment::Remaining { divisor: 8, cutoff: 4 },
        8 => Installment::Remaining { divisor: 5, cutoff: 7 },
        9..=11 => Installment::Remaining { divisor: 4, cutoff: 8 },
        _ => Installment::TrueUp,
    }
}

/// Ordinary withholding recorded so far, by calendar month.
///
/// Extraordinary withholding never enters the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrdinaryLedger([Decimal; 12]);

impl OrdinaryLedger {
    /// Withholding recorded in months `1..=cutoff`.
    pub fn through(
        &self,
        cutoff: u32,
    ) -> Decimal {
        let end = (cutoff as usize).min(self.0.len());
        self.0[..end].iter().copied().sum()
    }

    /// Withholding recorded before `month`.
    pub fn before(
        &self,
        month: u32,
    ) -> Decimal {
        self.through(month.saturating_sub(1))
    }

    /// Returns a ledger with `amount` recorded against `month`.
    pub fn record(
        self,
        month: u32,
        amount: Decimal,
    ) -> Self {
        let mut months = self.0;
        if let Some(slot) = month
            .checked_sub(1)
            .and_then(|index| months.get_mut(index as usize))
        {
            *slot += amount;
        }
        Self(months)
    }
}

/// Computes each month's ordinary installment.
#[derive(Debug, Clone, Copy)]
pub struct OrdinaryDistributor {
    prior_withholding: Decimal,
    precision: u32,
}

impl OrdinaryDistributor {
    pub fn new(
        prior_withholding: Decimal,
        precision: u32,
    ) -> Self {
        Self {
            prior_withholding,
            precision,
        }
    }

    /// Prior withholding plus every ordinary installment before `month`.
    pub fn withheld_before(
        &self,
        ledger: &OrdinaryLedger,
        month: u32,
    ) -> Decimal {
        self.prior_withholding + ledger.before(month)
    }

    /// Ordinary withholding for `month` against the current annual tax.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use withholding_core::calculations::{OrdinaryDistributor, OrdinaryLedger, installment_for};
    ///
    /// let distributor = OrdinaryDistributor::new(dec!(0), 2);
    /// let ledger = OrdinaryLedger::default();
    ///
    /// let january = distributor.withholding(dec!(11557.00), installment_for(1, false), &ledger, 1);
    ///
    /// assert_eq!(january, dec!(963.08));
    /// ```
    pub fn withholding(
        &self,
        annual_tax: Decimal,
        installment: Installment,
        ledger: &OrdinaryLedger,
        month: u32,
    ) -> Decimal {
        if annual_tax <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let outstanding = non_negative(annual_tax - self.withheld_before(ledger, month));
        let amount = match installment {
            Installment::Twelfth => annual_tax / Decimal::from(12),
            Installment::Remaining { divisor, cutoff } => {
                let withheld = self.prior_withholding + ledger.through(cutoff);
                non_negative(annual_tax - withheld) / Decimal::from(divisor)
            }
            Installment::TrueUp => outstanding,
        };

        round_half_up(amount, self.precision).min(outstanding)
    }
}
