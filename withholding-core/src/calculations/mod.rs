//! Calculation stages of the withholding engine.
//!
//! Stages run in a fixed order: parameters are resolved once, income is
//! scheduled and projected, the deductible-expense credit and the annual tax
//! are computed, and the breakdown folds over the processed months applying
//! the ordinary and extraordinary withholding rules.

pub mod bonuses;
pub mod breakdown;
pub mod brackets;
pub mod common;
pub mod deductible;
pub mod extraordinary;
pub mod ordinary;
pub mod projection;
pub mod resolve;

pub use breakdown::{Accumulator, BreakdownBuilder};
pub use brackets::TaxBracketSchedule;
pub use deductible::{DeductibleExpenseEvaluator, validate_deductible_expenses};
pub use extraordinary::extraordinary_withholding;
pub use ordinary::{OrdinaryDistributor, OrdinaryLedger, installment_for};
pub use projection::{IncomeProjection, MonthInputs, reproject, schedule_span};
pub use resolve::{BonusPolicy, JudicialStatus, MonthSpan, ResolvedParameters};
