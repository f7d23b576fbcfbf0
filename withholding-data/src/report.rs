//! Plain-text rendering of a calculation result.

use std::fmt;

use rust_decimal::Decimal;
use withholding_core::{CalculationResult, ExpenseValidation, MonthlyRecord};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES.get(index as usize))
        .copied()
        .unwrap_or("???")
}

fn amount(
    value: Decimal,
    precision: usize,
) -> String {
    format!("{:>12}", format!("{value:.precision$}"))
}

fn month_line(
    record: &MonthlyRecord,
    precision: usize,
) -> String {
    let notes: Vec<&str> = record
        .observations
        .iter()
        .map(|observation| observation.as_str())
        .collect();

    format!(
        "{:<5}{}{}{}{}{}  {}",
        month_name(record.month),
        amount(record.total_income, precision),
        amount(record.extraordinary_income, precision),
        amount(record.ordinary_withholding, precision),
        amount(record.extraordinary_withholding, precision),
        amount(record.cumulative_withholding, precision),
        notes.join(", ")
    )
    .trim_end()
    .to_string()
}

/// Month-by-month table followed by the summary block.
pub struct TableReport<'a>(pub &'a CalculationResult);

impl fmt::Display for TableReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let result = self.0;
        let summary = &result.summary;
        let precision = result.parameters.precision.min(28) as usize;

        writeln!(
            f,
            "{:<5}{:>12}{:>12}{:>12}{:>12}{:>12}  Notes",
            "Month", "Income", "Extra inc.", "Ordinary", "Extra w/h", "Cumulative"
        )?;
        for record in &result.months {
            writeln!(f, "{}", month_line(record, precision))?;
        }
        if result.months.is_empty() {
            writeln!(f, "(no months processed)")?;
        }

        let deductible = &summary.deductible_expenses;
        let rows = [
            ("Annual income", summary.annual_income),
            ("Deductible expenses", deductible.deduction),
            ("Net taxable income", summary.net_taxable_income),
            ("Annual tax", summary.annual_tax),
            ("Ordinary withholding", summary.ordinary_withholding),
            ("Extraordinary withholding", summary.extraordinary_withholding),
            ("Annual withholding", summary.annual_withholding),
            ("Average per month", summary.average_monthly_withholding),
        ];

        writeln!(f)?;
        writeln!(f, "Fiscal year {}", result.parameters.fiscal_year)?;
        for (label, value) in rows {
            writeln!(f, "  {label:<27}{}", amount(value, precision))?;
        }
        writeln!(
            f,
            "  {:<27}{:>11}%",
            "Marginal rate",
            (summary.marginal_rate * Decimal::ONE_HUNDRED).normalize().to_string()
        )?;
        if !deductible.qualifies {
            writeln!(f, "  Income does not reach the deduction threshold")?;
        }

        for payment in &summary.bonus_detail {
            writeln!(
                f,
                "  {:<27}{}",
                format!("{:?} ({})", payment.kind, month_name(payment.month)),
                amount(payment.total, precision)
            )?;
        }

        Ok(())
    }
}

/// Validation errors and warnings, one per line.
pub struct ValidationReport<'a>(pub &'a ExpenseValidation);

impl fmt::Display for ValidationReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for error in &self.0.errors {
            writeln!(f, "error: {error}")?;
        }
        for warning in &self.0.warnings {
            writeln!(f, "warning: {warning}")?;
        }
        Ok(())
    }
}

/// Renders one line per month followed by the summary block.
pub fn render_table(result: &CalculationResult) -> String {
    TableReport(result).to_string()
}

/// Renders validation errors and warnings, one per line.
pub fn render_validation(validation: &ExpenseValidation) -> String {
    ValidationReport(validation).to_string()
}
