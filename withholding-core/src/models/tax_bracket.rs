use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a fiscal year's bracket table.
///
/// Bounds are expressed in multiples of the year's tax unit so the same table
/// shape survives a change of unit value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive upper bound in tax units; `None` for the open-ended top bracket.
    pub upper_units: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        upper_units: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self { upper_units, rate }
    }

    /// Upper bound converted to currency for the given unit value.
    pub fn upper_bound(
        &self,
        tax_unit: Decimal,
    ) -> Option<Decimal> {
        self.upper_units.map(|units| units * tax_unit)
    }

    /// Whether `net_income` falls at or below this bracket's upper bound.
    pub fn covers(
        &self,
        net_income: Decimal,
        tax_unit: Decimal,
    ) -> bool {
        match self.upper_bound(tax_unit) {
            Some(bound) => net_income <= bound,
            None => true,
        }
    }
}
